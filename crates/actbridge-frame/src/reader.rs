use std::io::{ErrorKind, Read};

use crate::codec::Message;
use crate::error::{FrameError, Result};

/// Reads complete messages from any `Read` stream.
///
/// Handles partial reads internally — callers always get complete messages.
/// Header fields are parsed big-endian, matching the upstream protocol.
pub struct MessageReader<T> {
    inner: T,
}

impl<T: Read> MessageReader<T> {
    /// Create a new message reader.
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Read the next complete message (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when the stream ends on a
    /// frame boundary. EOF anywhere inside a frame is `UnexpectedEof` — a
    /// short read is never surfaced as a message.
    pub fn read_message(&mut self) -> Result<Message> {
        let mut field = [0u8; 4];
        if !self.fill(&mut field, true)? {
            return Err(FrameError::ConnectionClosed);
        }
        let message_type = u32::from_be_bytes(field);

        self.fill(&mut field, false)?;
        let length = u32::from_be_bytes(field) as usize;

        let mut payload = vec![0u8; length];
        self.fill(&mut payload, false)?;

        Ok(Message::new(message_type, payload))
    }

    /// Fill `buf` exactly, accumulating partial reads.
    ///
    /// Returns `Ok(false)` only when `boundary` is set and the stream ends
    /// before the first byte — a clean close between frames.
    fn fill(&mut self, buf: &mut [u8], boundary: bool) -> Result<bool> {
        let mut filled = 0usize;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) if filled == 0 && boundary => return Ok(false),
                Ok(0) => {
                    return Err(FrameError::UnexpectedEof {
                        expected: buf.len(),
                        got: filled,
                    })
                }
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
        Ok(true)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
