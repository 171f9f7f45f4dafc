//! Store error types
//!
//! Error codes:
//! - BOOTENV_IO_ERROR (ERROR severity)
//! - BOOTENV_SIZE_MISMATCH (ERROR severity)
//! - BOOTENV_MALFORMED_ENTRY (ERROR severity)
//! - BOOTENV_MALFORMED_LINE (ERROR severity)
//! - BOOTENV_CHECKSUM_MISMATCH (FATAL severity)
//! - BOOTENV_MALFORMED_PAYLOAD (FATAL severity)
//! - BOOTENV_INVALID_ENCODING (FATAL severity)
//! - BOOTENV_CAPACITY_EXCEEDED (FATAL severity)
//! - BOOTENV_PRECONDITION_VIOLATION (FATAL severity)

use std::fmt;
use std::io;

use crate::codec::{CodecError, CodecErrorCode, Severity};

/// Store error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvErrorCode {
    /// Source or sink unreachable
    IoError,
    /// Source length or sink length differs from the target size
    SizeMismatch,
    /// Stored CRC does not match the payload
    ChecksumMismatch,
    /// No end-of-list marker in a strict decode
    MalformedPayload,
    /// Entry without a `key=value` split in a strict decode
    MalformedEntry,
    /// A `key=value` entry in the source is not valid UTF-8
    InvalidEncoding,
    /// Import line without `=`
    MalformedLine,
    /// Empty key or other contract violation
    PreconditionViolation,
    /// Entries do not fit in the target size
    CapacityExceeded,
}

impl EnvErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            EnvErrorCode::IoError => "BOOTENV_IO_ERROR",
            EnvErrorCode::SizeMismatch => "BOOTENV_SIZE_MISMATCH",
            EnvErrorCode::ChecksumMismatch => "BOOTENV_CHECKSUM_MISMATCH",
            EnvErrorCode::MalformedPayload => "BOOTENV_MALFORMED_PAYLOAD",
            EnvErrorCode::MalformedEntry => "BOOTENV_MALFORMED_ENTRY",
            EnvErrorCode::MalformedLine => "BOOTENV_MALFORMED_LINE",
            EnvErrorCode::InvalidEncoding => "BOOTENV_INVALID_ENCODING",
            EnvErrorCode::PreconditionViolation => "BOOTENV_PRECONDITION_VIOLATION",
            EnvErrorCode::CapacityExceeded => "BOOTENV_CAPACITY_EXCEEDED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            EnvErrorCode::IoError
            | EnvErrorCode::SizeMismatch
            | EnvErrorCode::MalformedEntry
            | EnvErrorCode::MalformedLine => Severity::Error,
            EnvErrorCode::ChecksumMismatch
            | EnvErrorCode::MalformedPayload
            | EnvErrorCode::InvalidEncoding
            | EnvErrorCode::PreconditionViolation
            | EnvErrorCode::CapacityExceeded => Severity::Fatal,
        }
    }
}

impl From<CodecErrorCode> for EnvErrorCode {
    fn from(code: CodecErrorCode) -> Self {
        match code {
            CodecErrorCode::SizeMismatch => EnvErrorCode::SizeMismatch,
            CodecErrorCode::ChecksumMismatch => EnvErrorCode::ChecksumMismatch,
            CodecErrorCode::MalformedPayload => EnvErrorCode::MalformedPayload,
            CodecErrorCode::MalformedEntry => EnvErrorCode::MalformedEntry,
            CodecErrorCode::InvalidEncoding => EnvErrorCode::InvalidEncoding,
            CodecErrorCode::CapacityExceeded => EnvErrorCode::CapacityExceeded,
            CodecErrorCode::PreconditionViolation => EnvErrorCode::PreconditionViolation,
        }
    }
}

impl fmt::Display for EnvErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug)]
enum Cause {
    Io(io::Error),
    Codec(CodecError),
}

/// Store error with full context
#[derive(Debug)]
pub struct EnvError {
    code: EnvErrorCode,
    message: String,
    details: Option<String>,
    cause: Option<Cause>,
}

impl EnvError {
    fn new(code: EnvErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            cause: None,
        }
    }

    /// Create a new I/O error
    pub fn io_error(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            cause: Some(Cause::Io(source)),
            ..Self::new(EnvErrorCode::IoError, message)
        }
    }

    /// Create a size mismatch error
    pub fn size_mismatch(message: impl Into<String>, expected: u64, actual: u64) -> Self {
        Self {
            details: Some(format!("expected: {}, actual: {}", expected, actual)),
            ..Self::new(EnvErrorCode::SizeMismatch, message)
        }
    }

    /// Create a malformed import line error
    pub fn malformed_line(line_number: usize, line: &str) -> Self {
        Self {
            details: Some(format!("line: {}", line_number)),
            ..Self::new(
                EnvErrorCode::MalformedLine,
                format!("Invalid line: {:?}", line),
            )
        }
    }

    /// Create a precondition violation error
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::new(EnvErrorCode::PreconditionViolation, message)
    }

    /// Returns the error code
    pub fn code(&self) -> EnvErrorCode {
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
        match self.cause {
            Some(Cause::Codec(ref e)) => e.checksums(),
            _ => None,
        }
    }

    /// Returns whether this error is fatal
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl From<CodecError> for EnvError {
    fn from(e: CodecError) -> Self {
        Self {
            code: e.code().into(),
            message: e.message().to_string(),
            details: e.details().map(str::to_string),
            cause: Some(Cause::Codec(e)),
        }
    }
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity(), self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for EnvError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.cause {
            Some(Cause::Io(ref e)) => Some(e),
            Some(Cause::Codec(ref e)) => Some(e),
            None => None,
        }
    }
}

/// Result type for store operations
pub type EnvResult<T> = Result<T, EnvError>;
