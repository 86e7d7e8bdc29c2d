/// Render-ready projection of [`crate::AppState`].
///
/// Field names mirror the display surfaces the controller owns: the
/// call-to-action, the progress container (percent, bar value, step
/// message), the result container and the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub status_line: String,
    /// True while nothing has been selected yet.
    pub show_welcome: bool,
    pub show_cta: bool,
    pub show_progress: bool,
    pub show_result: bool,
    pub progress_percent: u8,
    /// Percent formatted for display, e.g. `"45%"`.
    pub progress_label: String,
    /// Step message with the `"Processing..."` fallback already applied.
    pub step_message: String,
    pub result_markdown: Option<String>,
}
