use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use transcriber_core::{update, AppState, JobParams, Msg, SessionPhase};
use transcriber_engine::{
    write_result_atomic, ClientSettings, EngineEvent, EngineHandle, UploadReceipt,
};

use crate::effects::EffectRunner;
use crate::render;

const EVENT_POLL: Duration = Duration::from_millis(20);

/// How the input artifact is chosen.
pub enum Input {
    /// A path the server already knows, with its display name.
    ServerPath { file_path: String, file_name: String },
    /// A local file to upload first; the server's path feeds the selection.
    Upload { local: PathBuf },
}

/// Drives one job from selection to a terminal state. Returns `Err` with a
/// short message when the job did not complete; the alert rendering has
/// already told the user the details.
pub fn run_pipeline(
    settings: ClientSettings,
    params: JobParams,
    input: Input,
    output: Option<PathBuf>,
) -> Result<(), String> {
    let engine = EngineHandle::new(settings).map_err(|err| err.to_string())?;
    let runner = EffectRunner::new(engine);

    let (file_path, file_name) = match input {
        Input::ServerPath {
            file_path,
            file_name,
        } => (file_path, file_name),
        Input::Upload { local } => {
            let receipt = upload_blocking(&runner, local)?;
            let name = receipt
                .file_name
                .clone()
                .unwrap_or_else(|| receipt.file_path.clone());
            (receipt.file_path, name)
        }
    };

    let mut state = AppState::with_params(params);
    dispatch(&mut state, &runner, Msg::SongSelected {
        file_path,
        file_name,
    });
    dispatch(&mut state, &runner, Msg::StartClicked);
    render_if_dirty(&mut state);

    loop {
        match runner.try_recv() {
            Some(event) => {
                if let Some(msg) = runner.map_event(event) {
                    dispatch(&mut state, &runner, msg);
                }
            }
            None => thread::sleep(EVENT_POLL),
        }
        render_if_dirty(&mut state);

        match state.phase() {
            SessionPhase::Completed { .. } => break,
            // Every failure path resets to Idle after its alert.
            SessionPhase::Idle => return Err("pipeline did not complete".to_string()),
            _ => {}
        }
    }

    if let Some(path) = output {
        let markdown = state
            .view()
            .result_markdown
            .ok_or_else(|| "no result to write".to_string())?;
        let written = write_result_atomic(&path, &markdown).map_err(|err| err.to_string())?;
        log::info!("result written to {:?}", written);
        println!("Result written to {}", written.display());
    }
    Ok(())
}

/// Uploads a local file and prints the server-side path for later runs.
pub fn run_upload(settings: ClientSettings, local: PathBuf) -> Result<(), String> {
    let engine = EngineHandle::new(settings).map_err(|err| err.to_string())?;
    let runner = EffectRunner::new(engine);

    let receipt = upload_blocking(&runner, local)?;
    println!("Uploaded: {}", receipt.file_path);
    if !receipt.file_url.is_empty() {
        println!("Served at: {}", receipt.file_url);
    }
    Ok(())
}

fn upload_blocking(runner: &EffectRunner, local: PathBuf) -> Result<UploadReceipt, String> {
    log::info!("uploading {:?}", local);
    runner.upload(local);
    loop {
        match runner.try_recv() {
            Some(EngineEvent::UploadCompleted { result }) => {
                return result.map_err(|err| format!("Upload failed: {err}"));
            }
            Some(other) => log::debug!("ignoring event while uploading: {other:?}"),
            None => thread::sleep(EVENT_POLL),
        }
    }
}

fn dispatch(state: &mut AppState, runner: &EffectRunner, msg: Msg) {
    let (next, effects) = update(std::mem::take(state), msg);
    *state = next;
    runner.run(effects);
}

fn render_if_dirty(state: &mut AppState) {
    if state.consume_dirty() {
        render::render(&state.view());
    }
}
