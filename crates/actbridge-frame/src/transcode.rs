//! UTF-8 → UTF-16 payload transcoding.
//!
//! The worker consumes UTF-16 in host byte order with no byte-order mark;
//! the upstream protocol carries UTF-8. Every payload is converted exactly
//! once, between read and write, regardless of message type.

use crate::error::Result;

/// Decode a payload as UTF-8 text.
///
/// Fails with [`FrameError`](crate::FrameError)`::InvalidUtf8` — fatal,
/// since message boundaries would be ambiguous after a partial decode.
pub fn decode_text(payload: &[u8]) -> Result<&str> {
    Ok(std::str::from_utf8(payload)?)
}

/// Encode text as UTF-16 code units in host byte order, without a BOM.
pub fn encode_utf16_ne(text: &str) -> Vec<u8> {
    let mut encoded = Vec::with_capacity(text.len() * 2);
    for unit in text.encode_utf16() {
        encoded.extend_from_slice(&unit.to_ne_bytes());
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrameError;

    #[test]
    fn hello_encodes_to_ten_bytes() {
        let encoded = encode_utf16_ne("Hello");
        assert_eq!(encoded.len(), 10);

        let expected: Vec<u8> = "Hello"
            .encode_utf16()
            .flat_map(|unit| unit.to_ne_bytes())
            .collect();
        assert_eq!(encoded, expected);
    }

    #[test]
    fn no_byte_order_mark_is_emitted() {
        let encoded = encode_utf16_ne("H");
        assert_eq!(encoded.len(), 2);
        assert_ne!(&encoded[0..2], &[0xFF, 0xFE]);
        assert_ne!(&encoded[0..2], &[0xFE, 0xFF]);
        assert_eq!(encoded, ('H' as u16).to_ne_bytes());
    }

    #[test]
    fn surrogate_pairs_survive() {
        // U+1D11E (musical G clef) needs two UTF-16 code units.
        let encoded = encode_utf16_ne("\u{1D11E}");
        assert_eq!(encoded.len(), 4);
        assert_eq!(&encoded[0..2], 0xD834u16.to_ne_bytes());
        assert_eq!(&encoded[2..4], 0xDD1Eu16.to_ne_bytes());
    }

    #[test]
    fn empty_text_encodes_to_nothing() {
        assert!(encode_utf16_ne("").is_empty());
    }

    #[test]
    fn decode_accepts_valid_utf8() {
        assert_eq!(decode_text("héllo".as_bytes()).unwrap(), "héllo");
    }

    #[test]
    fn decode_rejects_invalid_utf8() {
        let err = decode_text(&[0xC3, 0x28]).unwrap_err();
        assert!(matches!(err, FrameError::InvalidUtf8(_)));
    }
}
