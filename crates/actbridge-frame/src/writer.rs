use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::codec::{encode_message, Message};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Writes complete messages to any `Write` stream.
///
/// Header fields are emitted in host byte order — the worker side of the
/// pipe does not use the upstream protocol's big-endian convention.
pub struct MessageWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Write> MessageWriter<T> {
    /// Create a new message writer.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Write a complete message (blocking).
    pub fn write_message(&mut self, message: &Message) -> Result<()> {
        self.send(message.message_type, message.payload.as_ref())
    }

    /// Encode and send a payload with the given message type.
    ///
    /// The whole frame is flushed before returning — the next message is
    /// never started while this one is partially written.
    pub fn send(&mut self, message_type: u32, payload: &[u8]) -> Result<()> {
        self.buf.clear();
        encode_message(message_type, payload, &mut self.buf)?;

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;

    fn decode_native(wire: &[u8]) -> (u32, u32, &[u8]) {
        let message_type = u32::from_ne_bytes(wire[0..4].try_into().unwrap());
        let length = u32::from_ne_bytes(wire[4..8].try_into().unwrap());
        (message_type, length, &wire[8..])
    }

    #[test]
    fn write_single_message() {
        let mut writer = MessageWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.send(1, b"hello").unwrap();

        let wire = writer.into_inner().into_inner();
        let (message_type, length, payload) = decode_native(&wire);
        assert_eq!(message_type, 1);
        assert_eq!(length, 5);
        assert_eq!(payload, b"hello");
    }

    #[test]
    fn write_multiple_messages() {
        let mut writer = MessageWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.send(1, b"one").unwrap();
        writer.send(2, b"four").unwrap();

        let wire = writer.into_inner().into_inner();
        let (t1, l1, rest) = decode_native(&wire);
        assert_eq!((t1, l1), (1, 3));
        assert_eq!(&rest[..3], b"one");

        let (t2, l2, rest) = decode_native(&rest[3..]);
        assert_eq!((t2, l2), (2, 4));
        assert_eq!(rest, b"four");
    }

    #[test]
    fn write_message_method() {
        let mut writer = MessageWriter::new(Cursor::new(Vec::<u8>::new()));
        let message = Message::new(2, "abc");

        writer.write_message(&message).unwrap();

        let wire = writer.into_inner().into_inner();
        let (message_type, length, payload) = decode_native(&wire);
        assert_eq!(message_type, 2);
        assert_eq!(length, 3);
        assert_eq!(payload, b"abc");
    }

    #[test]
    fn partial_writes_are_completed() {
        let mut writer = MessageWriter::new(OneBytePerWrite { data: Vec::new() });
        writer.send(9, b"chunked").unwrap();

        let inner = writer.into_inner();
        let (message_type, length, payload) = decode_native(&inner.data);
        assert_eq!(message_type, 9);
        assert_eq!(length, 7);
        assert_eq!(payload, b"chunked");
    }

    #[test]
    fn connection_closed_when_write_returns_zero() {
        let mut writer = MessageWriter::new(ZeroWriter);
        let err = writer.send(1, b"x").unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn handles_interrupted_write_and_flush() {
        let writer_impl = InterruptedWriteThenFlush {
            wrote_once: false,
            flush_interrupted: false,
            data: Vec::new(),
        };

        let mut writer = MessageWriter::new(writer_impl);
        writer.send(5, b"retry").unwrap();

        let inner = writer.into_inner();
        assert!(!inner.data.is_empty());
    }

    #[test]
    fn flush_propagates() {
        let sink = FlushTrackingWriter::default();
        let flag = Arc::clone(&sink.flushed);
        let mut writer = MessageWriter::new(sink);

        writer.send(1, b"x").unwrap();

        assert!(flag.load(Ordering::SeqCst));
    }

    #[test]
    fn accessors_and_into_inner() {
        let mut writer = MessageWriter::new(Cursor::new(Vec::<u8>::new()));

        let _ = writer.get_ref();
        let _ = writer.get_mut();
        let _inner = writer.into_inner();
    }

    struct OneBytePerWrite {
        data: Vec<u8>,
    }

    impl Write for OneBytePerWrite {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if buf.is_empty() {
                return Ok(0);
            }
            self.data.push(buf[0]);
            Ok(1)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct ZeroWriter;

    impl Write for ZeroWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct InterruptedWriteThenFlush {
        wrote_once: bool,
        flush_interrupted: bool,
        data: Vec<u8>,
    }

    impl Write for InterruptedWriteThenFlush {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if !self.wrote_once {
                self.wrote_once = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            if !self.flush_interrupted {
                self.flush_interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct FlushTrackingWriter {
        flushed: Arc<AtomicBool>,
        data: Vec<u8>,
    }

    impl Write for FlushTrackingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }
}
