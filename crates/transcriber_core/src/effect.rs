use crate::state::TaskId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SubmitJob { request: JobRequest },
    StartPolling { task_id: TaskId },
    StopPolling { task_id: TaskId },
    FetchResult { task_id: TaskId },
    ShowAlert { message: String },
}

/// Everything the start endpoint needs. Immutable once built; consumed by
/// exactly one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    pub file_path: String,
    pub file_name: String,
    pub chord_algorithm: String,
    pub language: String,
}
