//! Transcriber core: pure job-lifecycle state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, JobRequest};
pub use msg::{Msg, SubmitFailure};
pub use state::{AppState, JobParams, JobState, Selection, SessionPhase, TaskId};
pub use update::update;
pub use view_model::AppViewModel;
