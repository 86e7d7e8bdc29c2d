use crate::state::{JobState, TaskId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked an input artifact (server-side path + display name).
    SongSelected {
        file_path: String,
        file_name: String,
    },
    /// User asked to start the pipeline for the current selection.
    StartClicked,
    /// Engine accepted the submission and returned a task handle.
    SubmitAccepted { task_id: TaskId },
    /// Engine could not obtain a task handle.
    SubmitFailed { failure: SubmitFailure },
    /// One status snapshot for a task, straight from the poller.
    StatusReported {
        task_id: TaskId,
        state: JobState,
        progress: u8,
        current_step: Option<String>,
        error_message: Option<String>,
    },
    /// Polling gave up after repeated transport failures.
    PollingLost { task_id: TaskId, message: String },
    /// Result fragment fetched and rendered for display.
    ResultLoaded { task_id: TaskId, markdown: String },
    /// Result fetch failed after the job succeeded.
    ResultFailed { task_id: TaskId, message: String },
    /// User cancelled the active job.
    CancelClicked,
}

/// Why a submission never produced a task handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitFailure {
    /// Server explicitly declined the job.
    Rejected { message: String },
    /// The request never completed or the response was unreadable.
    Transport { message: String },
}
