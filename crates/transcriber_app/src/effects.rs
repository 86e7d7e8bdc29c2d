use std::path::PathBuf;

use transcriber_core::{Effect, JobState, Msg, SubmitFailure};
use transcriber_engine::{
    EngineEvent, EngineHandle, FragmentRenderer, Html2MdRenderer, JobRequest, SubmitError,
    TaskState,
};

/// Executes core effects against the engine and translates engine events
/// back into core messages.
pub struct EffectRunner {
    engine: EngineHandle,
    renderer: Html2MdRenderer,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self {
            engine,
            renderer: Html2MdRenderer,
        }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitJob { request } => {
                    log::info!(
                        "submitting {} ({}) algorithm={} language={}",
                        request.file_name,
                        request.file_path,
                        request.chord_algorithm,
                        request.language
                    );
                    self.engine.submit(JobRequest {
                        file_path: request.file_path,
                        file_name: request.file_name,
                        chord_algorithm: request.chord_algorithm,
                        language: request.language,
                    });
                }
                Effect::StartPolling { task_id } => {
                    log::info!("polling task {task_id}");
                    self.engine.start_polling(task_id);
                }
                Effect::StopPolling { task_id } => self.engine.stop_polling(task_id),
                Effect::FetchResult { task_id } => self.engine.fetch_result(task_id),
                Effect::ShowAlert { message } => crate::render::alert(&message),
            }
        }
    }

    pub fn upload(&self, local_path: PathBuf) {
        self.engine.upload(local_path);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.engine.try_recv()
    }

    /// Engine event → core message. Upload completions are handled before
    /// the state machine starts and yield `None` here.
    pub fn map_event(&self, event: EngineEvent) -> Option<Msg> {
        match event {
            EngineEvent::SubmitCompleted { result } => Some(match result {
                Ok(receipt) => Msg::SubmitAccepted {
                    task_id: receipt.task_id,
                },
                Err(SubmitError::Rejected(message)) => Msg::SubmitFailed {
                    failure: SubmitFailure::Rejected { message },
                },
                Err(SubmitError::Transport(err)) => Msg::SubmitFailed {
                    failure: SubmitFailure::Transport {
                        message: err.to_string(),
                    },
                },
            }),
            EngineEvent::StatusReceived { task_id, snapshot } => Some(Msg::StatusReported {
                task_id,
                state: map_state(snapshot.state),
                progress: snapshot.progress,
                current_step: snapshot.current_step,
                error_message: snapshot.error_message,
            }),
            EngineEvent::PollingLost { task_id, message } => {
                Some(Msg::PollingLost { task_id, message })
            }
            EngineEvent::ResultLoaded { task_id, result } => Some(match result {
                Ok(fragment) => Msg::ResultLoaded {
                    task_id,
                    markdown: self.renderer.render(&fragment),
                },
                Err(err) => Msg::ResultFailed {
                    task_id,
                    message: err.to_string(),
                },
            }),
            EngineEvent::UploadCompleted { .. } => {
                log::warn!("unexpected upload completion during an active job");
                None
            }
        }
    }
}

fn map_state(state: TaskState) -> JobState {
    match state {
        TaskState::Queued => JobState::Queued,
        TaskState::Running => JobState::Running,
        TaskState::Success => JobState::Success,
        TaskState::Failure => JobState::Failure,
    }
}
