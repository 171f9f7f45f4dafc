//! Buffer layout
//!
//! ```text
//! +------------------+
//! | Checksum         | (u32 LE, CRC-32 of payload)
//! +------------------+
//! | Reserved         | (header_size - 4 zero bytes)
//! +------------------+
//! | Payload          | (target_size - header_size bytes)
//! +------------------+
//! ```

use super::checksum::CHECKSUM_SIZE;
use super::errors::{CodecError, CodecResult};
use super::payload::TERMINATOR;

/// Header size used by single-copy environments without flags.
pub const DEFAULT_HEADER_SIZE: usize = 4;

/// Fixed header geometry of an environment image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    header_size: usize,
}

impl Layout {
    /// Creates a layout with the given header size.
    ///
    /// The header must at least hold the checksum.
    pub fn new(header_size: usize) -> CodecResult<Self> {
        if header_size < CHECKSUM_SIZE {
            return Err(CodecError::precondition(format!(
                "header_size {} is smaller than the {}-byte checksum",
                header_size, CHECKSUM_SIZE
            )));
        }
        if header_size.checked_add(TERMINATOR.len()).is_none() {
            return Err(CodecError::precondition(format!(
                "header_size {} leaves no room for a payload",
                header_size
            )));
        }
        Ok(Self { header_size })
    }

    /// Returns the header size in bytes.
    pub fn header_size(&self) -> usize {
        self.header_size
    }

    /// Smallest target size that can hold an empty environment.
    pub fn min_target_size(&self) -> usize {
        self.header_size + TERMINATOR.len()
    }

    /// Returns the payload capacity for a store of `target_size` bytes.
    pub fn payload_size(&self, target_size: usize) -> CodecResult<usize> {
        if target_size < self.min_target_size() {
            return Err(CodecError::too_small(self.min_target_size(), target_size));
        }
        Ok(target_size - self.header_size)
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            header_size: DEFAULT_HEADER_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecErrorCode;

    #[test]
    fn test_default_layout() {
        let layout = Layout::default();
        assert_eq!(layout.header_size(), 4);
        assert_eq!(layout.min_target_size(), 6);
        assert_eq!(layout.payload_size(12).unwrap(), 8);
    }

    #[test]
    fn test_header_smaller_than_checksum_rejected() {
        let err = Layout::new(3).unwrap_err();
        assert_eq!(err.code(), CodecErrorCode::PreconditionViolation);
        assert!(Layout::new(4).is_ok());
        assert!(Layout::new(5).is_ok());
    }

    #[test]
    fn test_oversized_header_rejected() {
        let err = Layout::new(usize::MAX).unwrap_err();
        assert_eq!(err.code(), CodecErrorCode::PreconditionViolation);

        let layout = Layout::new(usize::MAX - 2).unwrap();
        assert_eq!(layout.min_target_size(), usize::MAX);
        assert_eq!(
            layout.payload_size(10).unwrap_err().code(),
            CodecErrorCode::SizeMismatch
        );
    }

    #[test]
    fn test_undersized_target_rejected() {
        let layout = Layout::new(8).unwrap();
        assert_eq!(
            layout.payload_size(9).unwrap_err().code(),
            CodecErrorCode::SizeMismatch
        );
        assert_eq!(layout.payload_size(10).unwrap(), 2);
    }
}
