//! One-time bootstrap of the `.runner` settings file.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, SpawnError};

/// File name of the runner settings, fixed by the runner itself.
pub const SETTINGS_FILE: &str = ".runner";

/// The minimal settings the worker expects to find on disk.
///
/// Field defaults are declared here and nowhere else. The file is written
/// once, on first bootstrap, and never touched again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerSettings {
    pub is_hosted_server: bool,
    pub agent_name: String,
    pub work_folder: String,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            is_hosted_server: false,
            agent_name: "my-runner".to_string(),
            work_folder: "_work".to_string(),
        }
    }
}

/// Where the settings file lives: two directories above the worker binary.
///
/// For `.../runner/bin/Runner.Worker` that is `.../runner/.runner`.
pub fn settings_path(worker: &Path) -> PathBuf {
    worker
        .parent()
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new("."))
        .join(SETTINGS_FILE)
}

/// Create the settings file with defaults if it does not exist yet.
///
/// An existing file is left exactly as it is, even when racing another
/// bootstrap (`create_new` loses the race cleanly).
pub fn ensure_settings(worker: &Path) -> Result<PathBuf> {
    let path = settings_path(worker);

    let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::AlreadyExists => {
            debug!(path = %path.display(), "runner settings already present");
            return Ok(path);
        }
        Err(source) => return Err(SpawnError::Settings { path, source }),
    };

    let body = serde_json::to_string(&RunnerSettings::default())?;
    file.write_all(body.as_bytes())
        .map_err(|source| SpawnError::Settings {
            path: path.clone(),
            source,
        })?;

    info!(path = %path.display(), "wrote default runner settings");
    Ok(path)
}
