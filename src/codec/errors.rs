//! Codec error types
//!
//! Error codes:
//! - BOOTENV_SIZE_MISMATCH (ERROR severity)
//! - BOOTENV_MALFORMED_ENTRY (ERROR severity)
//! - BOOTENV_CHECKSUM_MISMATCH (FATAL severity)
//! - BOOTENV_MALFORMED_PAYLOAD (FATAL severity)
//! - BOOTENV_INVALID_ENCODING (FATAL severity)
//! - BOOTENV_CAPACITY_EXCEEDED (FATAL severity)
//! - BOOTENV_PRECONDITION_VIOLATION (FATAL severity)

use std::fmt;

/// Severity levels shared by all bootenv errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, caller may retry or recover
    Error,
    /// The store or the caller is in a state that must not be written back
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Codec-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecErrorCode {
    /// Buffer length does not fit the layout
    SizeMismatch,
    /// Stored CRC does not match the payload
    ChecksumMismatch,
    /// No end-of-list marker in the payload
    MalformedPayload,
    /// An entry lacks a valid `key=value` split
    MalformedEntry,
    /// A `key=value` entry is not valid UTF-8
    InvalidEncoding,
    /// Encoded entries do not fit the payload region
    CapacityExceeded,
    /// Caller handed the codec something it must never see
    PreconditionViolation,
}

impl CodecErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            CodecErrorCode::SizeMismatch => "BOOTENV_SIZE_MISMATCH",
            CodecErrorCode::ChecksumMismatch => "BOOTENV_CHECKSUM_MISMATCH",
            CodecErrorCode::MalformedPayload => "BOOTENV_MALFORMED_PAYLOAD",
            CodecErrorCode::MalformedEntry => "BOOTENV_MALFORMED_ENTRY",
            CodecErrorCode::InvalidEncoding => "BOOTENV_INVALID_ENCODING",
            CodecErrorCode::CapacityExceeded => "BOOTENV_CAPACITY_EXCEEDED",
            CodecErrorCode::PreconditionViolation => "BOOTENV_PRECONDITION_VIOLATION",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            CodecErrorCode::SizeMismatch => Severity::Error,
            CodecErrorCode::MalformedEntry => Severity::Error,
            CodecErrorCode::ChecksumMismatch => Severity::Fatal,
            CodecErrorCode::MalformedPayload => Severity::Fatal,
            CodecErrorCode::InvalidEncoding => Severity::Fatal,
            CodecErrorCode::CapacityExceeded => Severity::Fatal,
            CodecErrorCode::PreconditionViolation => Severity::Fatal,
        }
    }
}

impl fmt::Display for CodecErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Codec error with context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecError {
    code: CodecErrorCode,
    message: String,
    details: Option<String>,
    /// (stored, computed) for checksum mismatches
    checksums: Option<(u32, u32)>,
}

impl CodecError {
    fn new(code: CodecErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            checksums: None,
        }
    }

    fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Buffer length is wrong for the layout or the caller's expectation
    pub fn size_mismatch(expected: usize, actual: usize) -> Self {
        Self::new(CodecErrorCode::SizeMismatch, "Environment size mismatch")
            .with_details(format!("expected: {}, actual: {}", expected, actual))
    }

    /// Buffer is too short to hold a header and an empty payload
    pub fn too_small(minimum: usize, actual: usize) -> Self {
        Self::new(
            CodecErrorCode::SizeMismatch,
            "Environment too small for header and terminator",
        )
        .with_details(format!("minimum: {}, actual: {}", minimum, actual))
    }

    /// Stored checksum disagrees with the payload
    pub fn checksum_mismatch(stored: u32, computed: u32) -> Self {
        let mut err = Self::new(CodecErrorCode::ChecksumMismatch, "Bad CRC")
            .with_details(format!("stored: {:08x}, computed: {:08x}", stored, computed));
        err.checksums = Some((stored, computed));
        err
    }

    /// No double-NUL end-of-list marker was found
    pub fn missing_terminator(payload_len: usize) -> Self {
        Self::new(
            CodecErrorCode::MalformedPayload,
            "Payload has no end-of-list marker",
        )
        .with_details(format!("payload_len: {}", payload_len))
    }

    /// Entry bytes cannot be read as `key=value`
    pub fn malformed_entry(raw: &[u8]) -> Self {
        Self::new(
            CodecErrorCode::MalformedEntry,
            format!(
                "Cannot parse {:?} as key=value pair",
                String::from_utf8_lossy(raw)
            ),
        )
    }

    /// A `key=value` entry cannot be held as text without losing bytes
    pub fn invalid_encoding(raw: &[u8]) -> Self {
        Self::new(
            CodecErrorCode::InvalidEncoding,
            format!(
                "Entry {:?} is not valid UTF-8",
                String::from_utf8_lossy(raw)
            ),
        )
        .with_details(format!("bytes: {:02x?}", raw))
    }

    /// Encoded payload would not fit
    pub fn capacity_exceeded(required: usize, capacity: usize) -> Self {
        Self::new(
            CodecErrorCode::CapacityExceeded,
            "Entries do not fit in the environment",
        )
        .with_details(format!("required: {}, capacity: {}", required, capacity))
    }

    /// Contract violation (empty key, embedded NUL, undersized header)
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::new(CodecErrorCode::PreconditionViolation, message)
    }

    /// Returns the error code
    pub fn code(&self) -> CodecErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns `(stored, computed)` for a checksum mismatch
    pub fn checksums(&self) -> Option<(u32, u32)> {
        self.checksums
    }

    /// Returns whether this error is fatal
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity(), self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for CodecError {}

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;
