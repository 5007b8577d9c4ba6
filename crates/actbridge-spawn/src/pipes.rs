//! Owned pipe endpoints shared with the worker.
//!
//! Two unidirectional channels exist: `inbound` carries transcoded frames
//! toward the worker, `outbound` is reserved for the worker's own output and
//! is never read by the bridge. Each endpoint is owned by exactly one side;
//! the split below makes that ownership explicit instead of passing raw
//! descriptor numbers around.

use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};

use tracing::debug;

use crate::error::{Result, SpawnError};

/// Ownership over both ends of one unidirectional OS pipe.
#[derive(Debug)]
pub struct PipePair {
    pub read: OwnedFd,
    pub write: OwnedFd,
}

impl PipePair {
    /// Create a new pipe.
    ///
    /// The descriptors are inheritable: the worker reopens its ends by
    /// number after exec, so close-on-exec must stay off.
    pub fn open() -> io::Result<Self> {
        let mut fds = [0 as libc::c_int; 2];
        // SAFETY: `fds` is a valid writable 2-element array for pipe(2).
        let rc = unsafe { libc::pipe(fds.as_mut_ptr()) };
        if rc != 0 {
            return Err(io::Error::last_os_error());
        }
        // SAFETY: pipe(2) succeeded and returned two open descriptors that
        // nothing else owns yet.
        let (read, write) =
            unsafe { (OwnedFd::from_raw_fd(fds[0]), OwnedFd::from_raw_fd(fds[1])) };
        debug!(
            read = read.as_raw_fd(),
            write = write.as_raw_fd(),
            "opened pipe pair"
        );
        Ok(Self { read, write })
    }
}

/// The two pipe channels wired between the bridge and the worker.
#[derive(Debug)]
pub struct WorkerPipes {
    /// Carries transcoded frames toward the worker.
    pub inbound: PipePair,
    /// Reserved for the worker's own output; the bridge never reads it.
    pub outbound: PipePair,
}

impl WorkerPipes {
    /// Create both channels.
    pub fn open() -> Result<Self> {
        Ok(Self {
            inbound: PipePair::open().map_err(SpawnError::Pipe)?,
            outbound: PipePair::open().map_err(SpawnError::Pipe)?,
        })
    }

    /// Split into the ends the bridge keeps and the ends the worker
    /// inherits.
    ///
    /// The bridge-kept ends get close-on-exec here, so the worker sees
    /// exactly two descriptors: its read end of `inbound` and its write end
    /// of `outbound`.
    pub fn split(self) -> Result<(ParentEnds, ChildEnds)> {
        set_cloexec(&self.inbound.write).map_err(SpawnError::Pipe)?;
        set_cloexec(&self.outbound.read).map_err(SpawnError::Pipe)?;
        Ok((
            ParentEnds {
                inbound_write: self.inbound.write,
                outbound_read: self.outbound.read,
            },
            ChildEnds {
                inbound_read: self.inbound.read,
                outbound_write: self.outbound.write,
            },
        ))
    }
}

fn set_cloexec(fd: &OwnedFd) -> io::Result<()> {
    // SAFETY: `fd` is an open descriptor owned by the caller.
    let flags = unsafe { libc::fcntl(fd.as_raw_fd(), libc::F_GETFD) };
    if flags < 0 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: same descriptor, setting the flag word fcntl just returned.
    let rc = unsafe { libc::fcntl(fd.as_raw_fd(), libc::F_SETFD, flags | libc::FD_CLOEXEC) };
    if rc < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// The endpoints the bridge keeps.
#[derive(Debug)]
pub struct ParentEnds {
    /// Where the relay writes transcoded frames.
    pub inbound_write: OwnedFd,
    /// Far side of the worker's own output channel. Held open for the
    /// worker's lifetime, never read.
    pub outbound_read: OwnedFd,
}

/// The endpoints the worker inherits and reopens by decimal fd number.
#[derive(Debug)]
pub struct ChildEnds {
    pub inbound_read: OwnedFd,
    pub outbound_write: OwnedFd,
}

impl ChildEnds {
    /// Descriptor number the worker reads frames from.
    pub fn inbound_read_fd(&self) -> RawFd {
        self.inbound_read.as_raw_fd()
    }

    /// Descriptor number the worker writes its own output to.
    pub fn outbound_write_fd(&self) -> RawFd {
        self.outbound_write.as_raw_fd()
    }
}
