use crate::{AppState, Effect, JobRequest, JobState, Msg, SessionPhase, SubmitFailure};
use crate::state::Selection;

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SongSelected {
            file_path,
            file_name,
        } => {
            state.set_selection(Selection {
                file_path,
                file_name,
            });
            state.mark_dirty();
            Vec::new()
        }
        Msg::StartClicked => {
            match state.phase() {
                SessionPhase::Idle | SessionPhase::Completed { .. } => {}
                // One job at a time; an in-flight phase is the trigger disable.
                _ => return (state, Vec::new()),
            }
            let selection = match state.selection_cloned() {
                Some(selection) if !selection.file_path.is_empty() => selection,
                _ => {
                    // Local validation only; the engine is never contacted.
                    return (
                        state,
                        vec![Effect::ShowAlert {
                            message: "Please upload or select a file first.".to_string(),
                        }],
                    );
                }
            };
            state.clear_job_output();
            state.set_phase(SessionPhase::Submitting);
            state.mark_dirty();
            let params = state.params().clone();
            vec![Effect::SubmitJob {
                request: JobRequest {
                    file_path: selection.file_path,
                    file_name: selection.file_name,
                    chord_algorithm: params.chord_algorithm,
                    language: params.language,
                },
            }]
        }
        Msg::SubmitAccepted { task_id } => {
            if *state.phase() != SessionPhase::Submitting {
                return (state, Vec::new());
            }
            state.set_phase(SessionPhase::Polling {
                task_id: task_id.clone(),
            });
            state.mark_dirty();
            vec![Effect::StartPolling { task_id }]
        }
        Msg::SubmitFailed { failure } => {
            if *state.phase() != SessionPhase::Submitting {
                return (state, Vec::new());
            }
            state.set_phase(SessionPhase::Idle);
            state.mark_dirty();
            let message = match failure {
                SubmitFailure::Rejected { message } => {
                    format!("Error starting pipeline: {message}")
                }
                SubmitFailure::Transport { .. } => {
                    "An error occurred while starting the pipeline.".to_string()
                }
            };
            vec![Effect::ShowAlert { message }]
        }
        Msg::StatusReported {
            task_id,
            state: job_state,
            progress,
            current_step,
            error_message,
        } => {
            if !polling_task(&state, &task_id) {
                // Stale snapshot for a task that is no longer the active
                // handle; dropping it serializes out-of-order responses.
                return (state, Vec::new());
            }
            // Mirror the server verbatim; no monotonicity is enforced.
            state.set_progress(progress, current_step);
            state.mark_dirty();
            match job_state {
                JobState::Success => {
                    state.set_phase(SessionPhase::LoadingResult {
                        task_id: task_id.clone(),
                    });
                    vec![
                        Effect::StopPolling {
                            task_id: task_id.clone(),
                        },
                        Effect::FetchResult { task_id },
                    ]
                }
                JobState::Failure => {
                    state.set_phase(SessionPhase::Idle);
                    let detail = error_message.unwrap_or_else(|| "unknown error".to_string());
                    vec![
                        Effect::StopPolling { task_id },
                        Effect::ShowAlert {
                            message: format!("Pipeline Failed: {detail}"),
                        },
                    ]
                }
                JobState::Queued | JobState::Running => Vec::new(),
            }
        }
        Msg::PollingLost { task_id, message } => {
            if !polling_task(&state, &task_id) {
                return (state, Vec::new());
            }
            state.set_phase(SessionPhase::Idle);
            state.mark_dirty();
            vec![
                Effect::StopPolling { task_id },
                Effect::ShowAlert {
                    message: format!("Error polling pipeline status: {message}"),
                },
            ]
        }
        Msg::ResultLoaded { task_id, markdown } => {
            if !loading_task(&state, &task_id) {
                return (state, Vec::new());
            }
            state.set_result(markdown);
            state.set_phase(SessionPhase::Completed { task_id });
            state.mark_dirty();
            Vec::new()
        }
        Msg::ResultFailed { task_id, message } => {
            if !loading_task(&state, &task_id) {
                return (state, Vec::new());
            }
            state.set_phase(SessionPhase::Idle);
            state.mark_dirty();
            vec![Effect::ShowAlert {
                message: format!("Failed to load pipeline result: {message}"),
            }]
        }
        Msg::CancelClicked => {
            let task_id = match state.phase() {
                SessionPhase::Polling { task_id } => task_id.clone(),
                _ => return (state, Vec::new()),
            };
            state.set_phase(SessionPhase::Idle);
            state.mark_dirty();
            vec![Effect::StopPolling { task_id }]
        }
    };

    (state, effects)
}

fn polling_task(state: &AppState, task_id: &str) -> bool {
    matches!(state.phase(), SessionPhase::Polling { task_id: active } if active == task_id)
}

fn loading_task(state: &AppState, task_id: &str) -> bool {
    matches!(state.phase(), SessionPhase::LoadingResult { task_id: active } if active == task_id)
}
