use std::fmt;
use std::io;

use actbridge_spawn::SpawnError;

// The overall status is the worker's contract: acceptable task results map
// to 0, everything else — including bridge-side failures — maps to 1.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    CliError::new(FAILURE, format!("{context}: {err}"))
}

pub fn spawn_error(context: &str, err: SpawnError) -> CliError {
    CliError::new(FAILURE, format!("{context}: {err}"))
}
