//! CRC32 checksum over the payload region
//!
//! The header stores the IEEE CRC-32 of every payload byte (filler
//! included) as a little-endian u32. Header bytes never feed the CRC.

use crc32fast::Hasher;

/// Width of the stored checksum in bytes.
pub const CHECKSUM_SIZE: usize = 4;

/// Computes a CRC32 checksum over the provided data.
///
/// This function is deterministic: the same input always produces the same output.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Reads the little-endian checksum from the start of a header.
///
/// The caller guarantees `header.len() >= CHECKSUM_SIZE`.
pub(crate) fn read_stored_checksum(header: &[u8]) -> u32 {
    u32::from_le_bytes([header[0], header[1], header[2], header[3]])
}

/// Builds a header of `header_size` bytes: checksum, then zero padding.
pub(crate) fn encode_header(checksum: u32, header_size: usize) -> Vec<u8> {
    let mut header = Vec::with_capacity(header_size);
    header.extend_from_slice(&checksum.to_le_bytes());
    header.resize(header_size, 0);
    header
}
