use std::ffi::OsString;
use std::ops::RangeInclusive;
use std::os::fd::RawFd;
use std::path::{Path, PathBuf};
use std::process::{Child, Command};

use tracing::{debug, info};

use crate::error::{Result, SpawnError};
use crate::pipes::ChildEnds;

/// Mode token the worker expects as its first argument.
pub const SPAWN_MODE: &str = "spawnclient";

/// Worker paths ending in this suffix need the dotnet host to run.
pub const INTERPRETER_SUFFIX: &str = ".dll";

/// Interpreter binary prepended for [`INTERPRETER_SUFFIX`] workers.
pub const INTERPRETER: &str = "dotnet";

/// Worker exit codes that count as an acceptable task outcome.
///
/// This is the runner's own TaskResult family; everything outside it is a
/// failure of the overall invocation.
pub const ACCEPTABLE_RESULTS: RangeInclusive<i32> = 100..=105;

/// Exit code reported when the worker was killed by a signal.
pub const SIGNALED: i32 = -1;

/// Launches the worker process and waits for it. One shot per invocation.
pub struct WorkerSupervisor {
    worker: PathBuf,
}

impl WorkerSupervisor {
    /// Create a supervisor for the given worker executable.
    pub fn new(worker: impl Into<PathBuf>) -> Self {
        Self {
            worker: worker.into(),
        }
    }

    /// Launch the worker with the pipe ends it inherits.
    ///
    /// The worker receives `spawnclient <read-fd> <write-fd>` and reopens
    /// both pipes by number. The bridge's copies of these two ends are
    /// closed once the worker is running — the worker holds its own.
    pub fn spawn(&self, ends: ChildEnds) -> Result<WorkerChild> {
        let (program, args) = command_line(
            &self.worker,
            ends.inbound_read_fd(),
            ends.outbound_write_fd(),
        );

        info!(worker = %self.worker.display(), "launching worker");
        debug!(?program, ?args, "worker invocation");

        let child = Command::new(&program)
            .args(&args)
            .spawn()
            .map_err(|source| SpawnError::Spawn {
                worker: self.worker.clone(),
                source,
            })?;

        drop(ends);

        Ok(WorkerChild { child })
    }
}

/// A running worker process.
#[derive(Debug)]
pub struct WorkerChild {
    child: Child,
}

impl WorkerChild {
    /// Block until the worker exits and return its raw exit code.
    ///
    /// Signal terminations carry no code and report [`SIGNALED`], which lies
    /// outside [`ACCEPTABLE_RESULTS`].
    pub fn wait(mut self) -> Result<i32> {
        let status = self.child.wait().map_err(SpawnError::Wait)?;
        let code = status.code().unwrap_or(SIGNALED);
        info!(code, "worker exited");
        Ok(code)
    }

    /// OS process id of the worker.
    pub fn id(&self) -> u32 {
        self.child.id()
    }
}

/// Build the program and argument list for the worker invocation.
pub fn command_line(worker: &Path, read_fd: RawFd, write_fd: RawFd) -> (OsString, Vec<OsString>) {
    let mut args: Vec<OsString> = Vec::with_capacity(4);
    let program: OsString = if needs_interpreter(worker) {
        args.push(worker.as_os_str().to_os_string());
        INTERPRETER.into()
    } else {
        worker.as_os_str().to_os_string()
    };
    args.push(SPAWN_MODE.into());
    args.push(read_fd.to_string().into());
    args.push(write_fd.to_string().into());
    (program, args)
}

/// Whether a worker exit code maps to overall success.
pub fn is_acceptable_result(code: i32) -> bool {
    ACCEPTABLE_RESULTS.contains(&code)
}

fn needs_interpreter(worker: &Path) -> bool {
    worker
        .to_str()
        .is_some_and(|path| path.ends_with(INTERPRETER_SUFFIX))
}
