/// Errors that can occur while reading, transcoding, or writing frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The stream ended before a full header field or payload was read.
    #[error("stream ended mid-frame ({got} of {expected} bytes)")]
    UnexpectedEof { expected: usize, got: usize },

    /// The payload is not valid UTF-8 text.
    #[error("payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// The payload does not fit the 4-byte length field.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream closed cleanly on a frame boundary.
    #[error("connection closed")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
