use thiserror::Error;

/// Opaque server-issued task identifier.
pub type TaskId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Queued,
    Running,
    Success,
    Failure,
}

impl TaskState {
    /// Maps a wire spelling onto a state. The server historically reported
    /// `PENDING`/`PROCESSING`; both generations are accepted.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "QUEUED" | "PENDING" => Some(Self::Queued),
            "RUNNING" | "PROCESSING" | "STARTED" => Some(Self::Running),
            "SUCCESS" => Some(Self::Success),
            "FAILURE" => Some(Self::Failure),
            _ => None,
        }
    }

    /// SUCCESS and FAILURE end polling permanently.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failure)
    }
}

/// One poll response. Each snapshot supersedes the previous; no history is
/// kept anywhere in the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub state: TaskState,
    pub progress: u8,
    pub current_step: Option<String>,
    pub error_message: Option<String>,
}

/// Successful submission: the handle the poller owns until a terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartReceipt {
    pub task_id: TaskId,
}

/// Successful upload of a local file to the server's media storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub file_path: String,
    pub file_url: String,
    pub file_name: Option<String>,
}

/// Everything the start endpoint needs for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    pub file_path: String,
    pub file_name: String,
    pub chord_algorithm: String,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    UploadCompleted {
        result: Result<UploadReceipt, ApiError>,
    },
    SubmitCompleted {
        result: Result<StartReceipt, SubmitError>,
    },
    StatusReceived {
        task_id: TaskId,
        snapshot: StatusSnapshot,
    },
    /// Polling ended early after too many consecutive transport failures.
    PollingLost {
        task_id: TaskId,
        message: String,
    },
    ResultLoaded {
        task_id: TaskId,
        result: Result<String, ApiError>,
    },
}

/// Transport and protocol faults on the pipeline API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("timeout")]
    Timeout,
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("anti-forgery token not found on the form page")]
    MissingCsrfToken,
    #[error("response too large (max {max_bytes}, actual {actual:?})")]
    TooLarge { max_bytes: u64, actual: Option<u64> },
    #[error("file not readable: {0}")]
    File(String),
    #[error("upload rejected: {0}")]
    UploadRejected(String),
}

/// Why a submission produced no task handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The server explicitly declined the job; the message is user-facing.
    #[error("pipeline rejected the job: {0}")]
    Rejected(String),
    #[error(transparent)]
    Transport(#[from] ApiError),
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::Timeout;
    }
    if err.is_decode() {
        return ApiError::Malformed(err.to_string());
    }
    ApiError::Network(err.to_string())
}
