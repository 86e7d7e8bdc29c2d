use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use transcriber_engine::ClientSettings;

const CONFIG_FILENAME: &str = "transcriber.ron";

/// Settings read from `./transcriber.ron`; every field has a default so a
/// partial file is fine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub poll_interval_ms: u64,
    pub max_consecutive_poll_failures: u32,
    pub chord_algorithm: String,
    pub language: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            poll_interval_ms: 2000,
            max_consecutive_poll_failures: 5,
            chord_algorithm: "nnls".to_string(),
            language: "zh".to_string(),
        }
    }
}

impl AppConfig {
    /// Engine settings from this config, with an optional base URL override
    /// from the command line.
    pub fn client_settings(&self, base_url_override: Option<String>) -> ClientSettings {
        ClientSettings {
            base_url: base_url_override.unwrap_or_else(|| self.base_url.clone()),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            max_consecutive_poll_failures: self.max_consecutive_poll_failures,
            ..ClientSettings::default()
        }
    }
}

/// Load the config from the working directory. Absent or unreadable files
/// fall back to defaults; a malformed file is reported and ignored.
pub fn load() -> AppConfig {
    load_from(Path::new(CONFIG_FILENAME))
}

fn load_from(path: &Path) -> AppConfig {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return AppConfig::default();
        }
        Err(err) => {
            log::warn!("Failed to read config from {:?}: {}", path, err);
            return AppConfig::default();
        }
    };

    match ron::from_str(&content) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("Failed to parse config from {:?}: {}", path, err);
            AppConfig::default()
        }
    }
}
