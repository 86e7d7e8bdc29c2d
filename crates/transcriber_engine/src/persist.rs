use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Atomically writes the rendered result to `path` by writing a temp file in
/// the destination directory and renaming it into place. The parent
/// directory is created if missing.
pub fn write_result_atomic(path: &Path, content: &str) -> Result<PathBuf, PersistError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    ensure_dir(&dir)?;

    let mut tmp = NamedTempFile::new_in(&dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;

    // Replace any previous run's file for the same destination.
    if path.exists() {
        fs::remove_file(path)?;
    }
    tmp.persist(path).map_err(|err| PersistError::Io(err.error))?;
    Ok(path.to_path_buf())
}

fn ensure_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|err| PersistError::OutputDir(err.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|err| PersistError::OutputDir(err.to_string()))?;
    }
    Ok(())
}
