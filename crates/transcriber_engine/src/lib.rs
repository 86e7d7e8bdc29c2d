//! Transcriber engine: pipeline API client and effect execution.
mod api;
mod convert;
mod csrf;
mod engine;
mod persist;
mod poller;
mod types;

pub use api::{ClientSettings, PipelineApi, ReqwestPipelineApi};
pub use convert::{FragmentRenderer, Html2MdRenderer};
pub use csrf::extract_csrf_token;
pub use engine::EngineHandle;
pub use persist::{write_result_atomic, PersistError};
pub use poller::{poll_until_terminal, ChannelEventSink, EventSink};
pub use types::{
    ApiError, EngineEvent, JobRequest, StartReceipt, StatusSnapshot, SubmitError, TaskId,
    TaskState, UploadReceipt,
};
