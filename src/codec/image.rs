//! Whole-buffer encode/decode: header + payload.
//!
//! Checksum validation always runs before entry parsing, so best-effort
//! parsing can never hide storage-level corruption.

use std::collections::BTreeMap;

use super::checksum::{compute_checksum, encode_header, read_stored_checksum};
use super::errors::{CodecError, CodecResult};
use super::layout::Layout;
use super::payload::{encode_payload, parse_payload, ParseMode, ParsedPayload};

/// Decodes a full environment image.
///
/// The image length is taken as the store's target size.
pub fn decode_image(image: &[u8], layout: Layout, mode: ParseMode) -> CodecResult<ParsedPayload> {
    layout.payload_size(image.len())?;

    let (header, payload) = image.split_at(layout.header_size());
    let stored = read_stored_checksum(header);
    let computed = compute_checksum(payload);
    if stored != computed {
        return Err(CodecError::checksum_mismatch(stored, computed));
    }

    parse_payload(payload, mode)
}

/// Encodes entries into a full image of exactly `target_size` bytes.
pub fn encode_image(
    entries: &BTreeMap<String, String>,
    layout: Layout,
    target_size: usize,
) -> CodecResult<Vec<u8>> {
    let capacity = layout.payload_size(target_size)?;
    let payload = encode_payload(entries, capacity)?;
    let checksum = compute_checksum(&payload);

    let mut image = encode_header(checksum, layout.header_size());
    image.extend_from_slice(&payload);
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecErrorCode;

    fn single(key: &str, value: &str) -> BTreeMap<String, String> {
        let mut m = BTreeMap::new();
        m.insert(key.to_string(), value.to_string());
        m
    }

    #[test]
    fn test_encode_image_layout() {
        let image = encode_image(&single("a", "1"), Layout::default(), 12).unwrap();
        assert_eq!(image.len(), 12);

        let payload = b"a=1\0\0\xff\xff\xff";
        assert_eq!(&image[4..], payload);
        assert_eq!(&image[..4], &compute_checksum(payload).to_le_bytes());
    }

    #[test]
    fn test_encode_image_with_reserved_header() {
        let layout = Layout::new(8).unwrap();
        let image = encode_image(&single("a", "1"), layout, 16).unwrap();
        assert_eq!(image.len(), 16);
        assert_eq!(&image[4..8], &[0, 0, 0, 0]);

        let parsed = decode_image(&image, layout, ParseMode::Strict).unwrap();
        assert_eq!(parsed.entries, single("a", "1"));
    }

    #[test]
    fn test_decode_detects_corruption() {
        let mut image = encode_image(&single("a", "1"), Layout::default(), 12).unwrap();
        image[6] ^= 0x01;

        let err = decode_image(&image, Layout::default(), ParseMode::BestEffort).unwrap_err();
        assert_eq!(err.code(), CodecErrorCode::ChecksumMismatch);
    }

    #[test]
    fn test_decode_too_short() {
        let err = decode_image(&[0; 5], Layout::default(), ParseMode::Strict).unwrap_err();
        assert_eq!(err.code(), CodecErrorCode::SizeMismatch);
    }

    #[test]
    fn test_capacity_error_before_any_output() {
        let err = encode_image(&single("key", "value"), Layout::default(), 8).unwrap_err();
        assert_eq!(err.code(), CodecErrorCode::CapacityExceeded);
    }
}
