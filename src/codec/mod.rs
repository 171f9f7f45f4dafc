//! Binary codec for bootloader environment images
//!
//! Pure functions over byte buffers. No I/O, no logging.
//!
//! # Invariants Enforced
//!
//! - Checksum is verified before any entry is parsed
//! - Encoded output is exactly `target_size` bytes
//! - Entries are written in ascending key order
//! - Capacity overflow is an error, never a truncation

mod checksum;
mod errors;
mod image;
mod layout;
mod payload;

pub use checksum::{compute_checksum, CHECKSUM_SIZE};
pub use errors::{CodecError, CodecErrorCode, CodecResult, Severity};
pub use image::{decode_image, encode_image};
pub use layout::{Layout, DEFAULT_HEADER_SIZE};
pub use payload::{
    encode_payload, encoded_len, find_terminator, parse_payload, validate_entry, ParseMode,
    ParsedPayload, FILL_BYTE, TERMINATOR,
};
