use std::sync::Once;

use transcriber_core::{
    update, AppState, Effect, JobRequest, Msg, SessionPhase, SubmitFailure,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

fn select_song(state: AppState, path: &str, name: &str) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::SongSelected {
            file_path: path.to_string(),
            file_name: name.to_string(),
        },
    )
}

fn submitted_state() -> AppState {
    let state = AppState::new();
    let (state, _effects) = select_song(state, "songs/a.mp3", "a.mp3");
    let (state, _effects) = update(state, Msg::StartClicked);
    state
}

#[test]
fn selection_updates_status_line() {
    init_logging();
    let state = AppState::new();
    assert!(state.view().show_welcome);

    let (mut state, effects) = select_song(state, "songs/a.mp3", "a.mp3");
    let view = state.view();

    assert!(effects.is_empty());
    assert_eq!(view.status_line, "Ready: a.mp3");
    assert!(!view.show_welcome);
    assert!(state.consume_dirty());
}

#[test]
fn selection_is_idempotent() {
    init_logging();
    let state = AppState::new();
    let (once, _) = select_song(state, "songs/a.mp3", "a.mp3");
    let (twice, effects) = select_song(once.clone(), "songs/a.mp3", "a.mp3");

    assert!(effects.is_empty());
    assert_eq!(once.view(), twice.view());
}

#[test]
fn start_without_selection_alerts_and_stays_local() {
    init_logging();
    let state = AppState::new();
    let (state, effects) = update(state, Msg::StartClicked);

    assert_eq!(
        effects,
        vec![Effect::ShowAlert {
            message: "Please upload or select a file first.".to_string(),
        }]
    );
    // No network effect of any kind was requested.
    assert!(!effects
        .iter()
        .any(|e| matches!(e, Effect::SubmitJob { .. })));
    assert_eq!(*state.phase(), SessionPhase::Idle);
    assert!(state.view().show_cta);
}

#[test]
fn start_with_empty_path_alerts_and_stays_local() {
    init_logging();
    let state = AppState::new();
    let (state, _effects) = select_song(state, "", "a.mp3");
    let (state, effects) = update(state, Msg::StartClicked);

    assert_eq!(
        effects,
        vec![Effect::ShowAlert {
            message: "Please upload or select a file first.".to_string(),
        }]
    );
    assert_eq!(*state.phase(), SessionPhase::Idle);
}

#[test]
fn start_submits_and_leaves_pre_submission_view_before_any_response() {
    init_logging();
    let state = AppState::new();
    let (state, _effects) = select_song(state, "songs/a.mp3", "a.mp3");
    let (mut state, effects) = update(state, Msg::StartClicked);

    assert_eq!(
        effects,
        vec![Effect::SubmitJob {
            request: JobRequest {
                file_path: "songs/a.mp3".to_string(),
                file_name: "a.mp3".to_string(),
                chord_algorithm: "nnls".to_string(),
                language: "zh".to_string(),
            },
        }]
    );
    assert_eq!(*state.phase(), SessionPhase::Submitting);
    let view = state.view();
    assert!(!view.show_cta);
    assert!(view.show_progress);
    assert!(state.consume_dirty());
}

#[test]
fn start_is_ignored_while_a_job_is_in_flight() {
    init_logging();
    let state = submitted_state();
    let (state, effects) = update(state, Msg::StartClicked);
    assert!(effects.is_empty());
    assert_eq!(*state.phase(), SessionPhase::Submitting);

    let (state, _effects) = update(
        state,
        Msg::SubmitAccepted {
            task_id: "42".to_string(),
        },
    );
    let (state, effects) = update(state, Msg::StartClicked);
    assert!(effects.is_empty());
    assert_eq!(
        *state.phase(),
        SessionPhase::Polling {
            task_id: "42".to_string(),
        }
    );
}

#[test]
fn accepted_submission_starts_polling_for_that_task() {
    init_logging();
    let state = submitted_state();
    let (state, effects) = update(
        state,
        Msg::SubmitAccepted {
            task_id: "42".to_string(),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::StartPolling {
            task_id: "42".to_string(),
        }]
    );
    assert_eq!(
        *state.phase(),
        SessionPhase::Polling {
            task_id: "42".to_string(),
        }
    );
}

#[test]
fn rejected_submission_alerts_with_server_message_and_restores_cta() {
    init_logging();
    let state = submitted_state();
    let (state, effects) = update(
        state,
        Msg::SubmitFailed {
            failure: SubmitFailure::Rejected {
                message: "No file path provided".to_string(),
            },
        },
    );

    assert_eq!(
        effects,
        vec![Effect::ShowAlert {
            message: "Error starting pipeline: No file path provided".to_string(),
        }]
    );
    assert_eq!(*state.phase(), SessionPhase::Idle);
    let view = state.view();
    assert!(view.show_cta);
    assert!(!view.show_progress);
}

#[test]
fn transport_failure_alerts_generically() {
    init_logging();
    let state = submitted_state();
    let (state, effects) = update(
        state,
        Msg::SubmitFailed {
            failure: SubmitFailure::Transport {
                message: "connection refused".to_string(),
            },
        },
    );

    assert_eq!(
        effects,
        vec![Effect::ShowAlert {
            message: "An error occurred while starting the pipeline.".to_string(),
        }]
    );
    assert_eq!(*state.phase(), SessionPhase::Idle);
}

#[test]
fn submission_outcomes_are_ignored_outside_submitting_phase() {
    init_logging();
    let state = AppState::new();
    let (state, effects) = update(
        state,
        Msg::SubmitAccepted {
            task_id: "42".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(*state.phase(), SessionPhase::Idle);

    let (state, effects) = update(
        state,
        Msg::SubmitFailed {
            failure: SubmitFailure::Transport {
                message: "late".to_string(),
            },
        },
    );
    assert!(effects.is_empty());
    assert_eq!(*state.phase(), SessionPhase::Idle);
}

#[test]
fn reselection_during_active_job_applies_to_next_submission() {
    init_logging();
    let state = submitted_state();
    let (state, _effects) = update(
        state,
        Msg::SubmitAccepted {
            task_id: "42".to_string(),
        },
    );
    let (state, effects) = select_song(state, "songs/b.mp3", "b.mp3");

    assert!(effects.is_empty());
    assert_eq!(state.view().status_line, "Ready: b.mp3");
    // The active job keeps its handle.
    assert_eq!(
        *state.phase(),
        SessionPhase::Polling {
            task_id: "42".to_string(),
        }
    );
}
