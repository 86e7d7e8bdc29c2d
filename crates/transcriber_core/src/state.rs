use crate::view_model::AppViewModel;

/// Opaque server-issued task identifier. Never parsed, only compared.
pub type TaskId = String;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub file_path: String,
    pub file_name: String,
}

/// User-chosen pipeline parameters, applied to every submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobParams {
    pub chord_algorithm: String,
    pub language: String,
}

impl Default for JobParams {
    fn default() -> Self {
        Self {
            chord_algorithm: "nnls".to_string(),
            language: "zh".to_string(),
        }
    }
}

/// Job state as reported by the server, one snapshot per poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Queued,
    Running,
    Success,
    Failure,
}

/// The one-active-job state machine. The task id embedded in the phase is
/// the exclusivity discipline: events carrying any other id are stale.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Submitting,
    Polling {
        task_id: TaskId,
    },
    LoadingResult {
        task_id: TaskId,
    },
    Completed {
        task_id: TaskId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    selection: Option<Selection>,
    params: JobParams,
    phase: SessionPhase,
    progress_percent: u8,
    current_step: Option<String>,
    status_line: String,
    result_markdown: Option<String>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_params(JobParams::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: JobParams) -> Self {
        Self {
            selection: None,
            params,
            phase: SessionPhase::Idle,
            progress_percent: 0,
            current_step: None,
            status_line: "No file selected".to_string(),
            result_markdown: None,
            dirty: true,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let (show_cta, show_progress, show_result) = match &self.phase {
            SessionPhase::Idle => (true, false, false),
            SessionPhase::Submitting
            | SessionPhase::Polling { .. }
            | SessionPhase::LoadingResult { .. } => (false, true, false),
            SessionPhase::Completed { .. } => (true, false, true),
        };
        AppViewModel {
            status_line: self.status_line.clone(),
            show_welcome: self.selection.is_none(),
            show_cta,
            show_progress,
            show_result,
            progress_percent: self.progress_percent,
            progress_label: format!("{}%", self.progress_percent),
            step_message: self
                .current_step
                .clone()
                .unwrap_or_else(|| "Processing...".to_string()),
            result_markdown: self.result_markdown.clone(),
        }
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn params(&self) -> &JobParams {
        &self.params
    }

    /// Returns the dirty flag and clears it; the render loop draws only
    /// when this yields true.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_selection(&mut self, selection: Selection) {
        self.status_line = format!("Ready: {}", selection.file_name);
        self.selection = Some(selection);
    }

    pub(crate) fn set_phase(&mut self, phase: SessionPhase) {
        self.phase = phase;
    }

    pub(crate) fn set_progress(&mut self, percent: u8, step: Option<String>) {
        self.progress_percent = percent.min(100);
        self.current_step = step;
    }

    pub(crate) fn set_result(&mut self, markdown: String) {
        self.result_markdown = Some(markdown);
    }

    pub(crate) fn clear_job_output(&mut self) {
        self.progress_percent = 0;
        self.current_step = None;
        self.result_markdown = None;
    }

    pub(crate) fn selection_cloned(&self) -> Option<Selection> {
        self.selection.clone()
    }
}
