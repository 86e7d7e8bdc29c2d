use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::api::PipelineApi;
use crate::types::EngineEvent;

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Polls the status endpoint at a fixed period until the task reaches a
/// terminal state, the token is cancelled, or too many consecutive requests
/// fail. The first poll happens one full period after the call, matching a
/// repeating timer armed at submission time.
///
/// A lone failed tick is logged and skipped, never surfaced; only
/// `max_consecutive_failures` failures in a row end the loop with
/// [`EngineEvent::PollingLost`]. Any successful poll resets the counter.
pub async fn poll_until_terminal(
    api: &dyn PipelineApi,
    task_id: &str,
    interval: Duration,
    max_consecutive_failures: u32,
    cancel: CancellationToken,
    sink: &dyn EventSink,
) {
    let mut consecutive_failures = 0u32;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                log::debug!("status polling cancelled for task {task_id}");
                return;
            }
            _ = tokio::time::sleep(interval) => {}
        }

        match api.job_status(task_id).await {
            Ok(snapshot) => {
                consecutive_failures = 0;
                let terminal = snapshot.state.is_terminal();
                sink.emit(EngineEvent::StatusReceived {
                    task_id: task_id.to_string(),
                    snapshot,
                });
                if terminal {
                    return;
                }
            }
            Err(err) => {
                consecutive_failures += 1;
                log::warn!(
                    "status poll failed for task {task_id} ({consecutive_failures}/{max_consecutive_failures}): {err}"
                );
                if consecutive_failures >= max_consecutive_failures {
                    sink.emit(EngineEvent::PollingLost {
                        task_id: task_id.to_string(),
                        message: format!(
                            "{max_consecutive_failures} consecutive status requests failed"
                        ),
                    });
                    return;
                }
            }
        }
    }
}
