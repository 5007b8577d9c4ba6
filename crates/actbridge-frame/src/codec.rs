use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Frame header: type (4) + length (4) = 8 bytes, on both pipe directions.
pub const HEADER_SIZE: usize = 8;

/// A framed worker message.
///
/// Constructed only once the length prefix and the full payload have been
/// read — a short read never becomes a `Message`.
#[derive(Debug, Clone)]
pub struct Message {
    /// Protocol message type, forwarded unchanged.
    pub message_type: u32,
    /// The message payload.
    pub payload: Bytes,
}

impl Message {
    /// Create a new message.
    pub fn new(message_type: u32, payload: impl Into<Bytes>) -> Self {
        Self {
            message_type,
            payload: payload.into(),
        }
    }

    /// The total wire size of this message (header + payload).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }
}

/// Encode a message for the worker-facing pipe.
///
/// Wire format (host byte order, unlike the big-endian inbound stream):
/// ```text
/// ┌────────────┬────────────┬─────────────────┐
/// │ Type       │ Length     │ Payload          │
/// │ (4B host)  │ (4B host)  │ (Length bytes)   │
/// └────────────┴────────────┴─────────────────┘
/// ```
pub fn encode_message(message_type: u32, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.len() > u32::MAX as usize {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: u32::MAX as usize,
        });
    }
    dst.reserve(HEADER_SIZE + payload.len());
    dst.put_u32_ne(message_type);
    dst.put_u32_ne(payload.len() as u32);
    dst.put_slice(payload);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_emits_host_order_header() {
        let mut buf = BytesMut::new();
        encode_message(7, b"hello", &mut buf).unwrap();

        assert_eq!(buf.len(), HEADER_SIZE + 5);
        assert_eq!(buf[0..4], 7u32.to_ne_bytes());
        assert_eq!(buf[4..8], 5u32.to_ne_bytes());
        assert_eq!(&buf[8..], b"hello");
    }

    #[test]
    fn encode_empty_payload() {
        let mut buf = BytesMut::new();
        encode_message(0, b"", &mut buf).unwrap();

        assert_eq!(buf.len(), HEADER_SIZE);
        assert_eq!(buf[4..8], 0u32.to_ne_bytes());
    }

    #[test]
    fn message_wire_size() {
        let message = Message::new(1, Bytes::from_static(b"test"));
        assert_eq!(message.wire_size(), HEADER_SIZE + 4);
    }

    #[test]
    #[cfg(target_endian = "little")]
    fn host_order_differs_from_inbound_big_endian() {
        // The inbound stream is big-endian; the worker pipe is host order.
        // For any type value >= 256 the two byte sequences must differ.
        let mut buf = BytesMut::new();
        encode_message(256, b"", &mut buf).unwrap();

        assert_ne!(buf[0..4], 256u32.to_be_bytes());
        assert_eq!(buf[0..4], 256u32.to_le_bytes());
    }
}
