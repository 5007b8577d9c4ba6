//! Length-prefixed message framing for the worker bridge.
//!
//! Inbound frames carry a 4-byte big-endian type tag, a 4-byte big-endian
//! payload length, and a UTF-8 payload. Outbound frames keep the type tag
//! but re-emit both header fields in host byte order and the payload as
//! UTF-16 without a byte-order mark — the two ends of the worker pipe
//! deliberately speak different conventions.
//!
//! No partial reads, no partial writes, one message in flight at a time.

pub mod codec;
pub mod error;
pub mod reader;
pub mod transcode;
pub mod writer;

pub use codec::{encode_message, Message, HEADER_SIZE};
pub use error::{FrameError, Result};
pub use reader::MessageReader;
pub use transcode::{decode_text, encode_utf16_ne};
pub use writer::MessageWriter;
