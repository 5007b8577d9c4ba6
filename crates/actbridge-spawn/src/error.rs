use std::path::PathBuf;

/// Errors that can occur while wiring up and running the worker.
#[derive(Debug, thiserror::Error)]
pub enum SpawnError {
    /// Failed to create a pipe pair.
    #[error("failed to create pipe: {0}")]
    Pipe(#[source] std::io::Error),

    /// The worker executable could not be started.
    #[error("failed to launch worker {worker}: {source}")]
    Spawn {
        worker: PathBuf,
        source: std::io::Error,
    },

    /// Waiting on the worker failed.
    #[error("failed waiting for worker: {0}")]
    Wait(#[source] std::io::Error),

    /// The runner settings file could not be created.
    #[error("failed to bootstrap runner settings at {path}: {source}")]
    Settings {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The default runner settings could not be serialized.
    #[error("failed to encode runner settings: {0}")]
    SettingsEncode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SpawnError>;
