use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use tokio_util::sync::CancellationToken;

use crate::api::{ClientSettings, PipelineApi, ReqwestPipelineApi};
use crate::poller::{poll_until_terminal, ChannelEventSink};
use crate::types::{ApiError, EngineEvent, JobRequest, TaskId};

enum EngineCommand {
    Upload { local_path: PathBuf },
    Submit { request: JobRequest },
    StartPolling { task_id: TaskId },
    StopPolling { task_id: TaskId },
    FetchResult { task_id: TaskId },
}

/// Handle to the engine thread. Commands go in over one channel, events come
/// back over another; the caller drains them with [`EngineHandle::try_recv`].
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let api = Arc::new(ReqwestPipelineApi::new(settings.clone())?);
        Ok(Self::with_api(api, settings))
    }

    /// Engine over an arbitrary API implementation; the seam tests use.
    pub fn with_api(api: Arc<dyn PipelineApi>, settings: ClientSettings) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel::<EngineEvent>();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            // The single active poll loop; the task id is the guard against
            // stopping a successor loop by mistake.
            let mut active_poll: Option<(TaskId, CancellationToken)> = None;
            while let Ok(command) = cmd_rx.recv() {
                handle_command(
                    &runtime,
                    api.clone(),
                    &settings,
                    command,
                    &event_tx,
                    &mut active_poll,
                );
            }
            // Handle dropped: stop whatever is still polling.
            if let Some((_, token)) = active_poll {
                token.cancel();
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn upload(&self, local_path: PathBuf) {
        let _ = self.cmd_tx.send(EngineCommand::Upload { local_path });
    }

    pub fn submit(&self, request: JobRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Submit { request });
    }

    pub fn start_polling(&self, task_id: impl Into<TaskId>) {
        let _ = self.cmd_tx.send(EngineCommand::StartPolling {
            task_id: task_id.into(),
        });
    }

    /// Idempotent; stopping a task that is not the active one is a no-op.
    pub fn stop_polling(&self, task_id: impl Into<TaskId>) {
        let _ = self.cmd_tx.send(EngineCommand::StopPolling {
            task_id: task_id.into(),
        });
    }

    pub fn fetch_result(&self, task_id: impl Into<TaskId>) {
        let _ = self.cmd_tx.send(EngineCommand::FetchResult {
            task_id: task_id.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

fn handle_command(
    runtime: &tokio::runtime::Runtime,
    api: Arc<dyn PipelineApi>,
    settings: &ClientSettings,
    command: EngineCommand,
    event_tx: &mpsc::Sender<EngineEvent>,
    active_poll: &mut Option<(TaskId, CancellationToken)>,
) {
    match command {
        EngineCommand::Upload { local_path } => {
            let event_tx = event_tx.clone();
            runtime.spawn(async move {
                let result = api.upload(&local_path).await;
                let _ = event_tx.send(EngineEvent::UploadCompleted { result });
            });
        }
        EngineCommand::Submit { request } => {
            let event_tx = event_tx.clone();
            runtime.spawn(async move {
                let result = api.start_job(&request).await;
                let _ = event_tx.send(EngineEvent::SubmitCompleted { result });
            });
        }
        EngineCommand::StartPolling { task_id } => {
            if let Some((previous, token)) = active_poll.take() {
                log::debug!("replacing poll loop for task {previous} with task {task_id}");
                token.cancel();
            }
            let token = CancellationToken::new();
            *active_poll = Some((task_id.clone(), token.clone()));

            let sink = ChannelEventSink::new(event_tx.clone());
            let interval = settings.poll_interval;
            let max_failures = settings.max_consecutive_poll_failures;
            runtime.spawn(async move {
                poll_until_terminal(api.as_ref(), &task_id, interval, max_failures, token, &sink)
                    .await;
            });
        }
        EngineCommand::StopPolling { task_id } => {
            if matches!(active_poll, Some((active, _)) if *active == task_id) {
                if let Some((_, token)) = active_poll.take() {
                    token.cancel();
                }
            }
        }
        EngineCommand::FetchResult { task_id } => {
            let event_tx = event_tx.clone();
            runtime.spawn(async move {
                let result = api.fetch_result(&task_id).await;
                let _ = event_tx.send(EngineEvent::ResultLoaded { task_id, result });
            });
        }
    }
}
