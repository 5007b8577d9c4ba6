//! Worker process supervision for the bridge.
//!
//! Owns the pipe endpoints wired between the bridge and the worker, launches
//! the worker with the two ends it inherits by fd number, and waits out its
//! one-shot lifecycle: created → piped → running → exited. No retry, no
//! respawn — the worker's exit bounds the program.
//!
//! Unix only: the worker reopens its pipe ends from decimal descriptor
//! numbers passed on the command line, which has no Windows equivalent.

pub mod error;
#[cfg(unix)]
pub mod pipes;
pub mod settings;
#[cfg(unix)]
pub mod supervisor;

pub use error::{Result, SpawnError};
#[cfg(unix)]
pub use pipes::{ChildEnds, ParentEnds, PipePair, WorkerPipes};
pub use settings::{ensure_settings, settings_path, RunnerSettings, SETTINGS_FILE};
#[cfg(unix)]
pub use supervisor::{
    is_acceptable_result, WorkerChild, WorkerSupervisor, ACCEPTABLE_RESULTS, INTERPRETER,
    INTERPRETER_SUFFIX, SPAWN_MODE,
};
