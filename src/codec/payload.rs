//! Payload grammar
//!
//! ```text
//! payload = (key "=" value NUL)* NUL filler*
//! empty   = NUL NUL filler*
//! filler  = 0xFF
//! ```
//!
//! The first pair of consecutive NUL bytes ends the entry list. Anything
//! after it is filler on write and ignored on read.

use std::collections::BTreeMap;

use super::errors::{CodecError, CodecResult};

/// Value of every unused payload byte after the terminator.
pub const FILL_BYTE: u8 = 0xFF;

/// End-of-list marker.
pub const TERMINATOR: [u8; 2] = [0x00, 0x00];

const SEPARATOR: u8 = b'=';

/// How decode treats entries that are not `key=value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Any malformed entry or a missing terminator fails the decode
    #[default]
    Strict,
    /// Malformed entries are skipped; a missing terminator reads as empty
    BestEffort,
}

/// Result of parsing a payload region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPayload {
    /// Decoded entries, sorted by key
    pub entries: BTreeMap<String, String>,
    /// Raw candidates dropped in best-effort mode
    pub skipped: Vec<Vec<u8>>,
    /// Whether the end-of-list marker was absent
    pub unterminated: bool,
}

/// Finds the offset of the first double-NUL in the payload.
pub fn find_terminator(payload: &[u8]) -> Option<usize> {
    payload.windows(2).position(|w| w == TERMINATOR)
}

/// Splits one candidate on its first `=`.
///
/// Returns `Ok(None)` when there is no separator or the key is empty.
/// A well-formed entry that is not UTF-8 is an error in every mode:
/// skipping it would erase it from the sink on the next save.
fn split_entry(candidate: &[u8]) -> CodecResult<Option<(&str, &str)>> {
    let at = match candidate.iter().position(|b| *b == SEPARATOR) {
        Some(0) | None => return Ok(None),
        Some(at) => at,
    };
    let key = std::str::from_utf8(&candidate[..at])
        .map_err(|_| CodecError::invalid_encoding(candidate))?;
    let value = std::str::from_utf8(&candidate[at + 1..])
        .map_err(|_| CodecError::invalid_encoding(candidate))?;
    Ok(Some((key, value)))
}

/// Parses a payload region (header already stripped) into entries.
///
/// Later duplicates overwrite earlier ones. An entry with an empty value
/// removes the key, so no empty value ever reaches the mapping.
pub fn parse_payload(payload: &[u8], mode: ParseMode) -> CodecResult<ParsedPayload> {
    let mut parsed = ParsedPayload::default();

    let region = match find_terminator(payload) {
        Some(end) => &payload[..end],
        None => match mode {
            ParseMode::Strict => return Err(CodecError::missing_terminator(payload.len())),
            ParseMode::BestEffort => {
                parsed.unterminated = true;
                return Ok(parsed);
            }
        },
    };

    for candidate in region.split(|b| *b == 0) {
        if candidate.is_empty() || candidate[0] == 0 || candidate[0] == FILL_BYTE {
            continue;
        }

        match split_entry(candidate)? {
            Some((key, "")) => {
                parsed.entries.remove(key);
            }
            Some((key, value)) => {
                parsed.entries.insert(key.to_string(), value.to_string());
            }
            None => match mode {
                ParseMode::Strict => return Err(CodecError::malformed_entry(candidate)),
                ParseMode::BestEffort => parsed.skipped.push(candidate.to_vec()),
            },
        }
    }

    Ok(parsed)
}

/// Checks that an entry can be written without changing the grammar.
pub fn validate_entry(key: &str, value: &str) -> CodecResult<()> {
    if key.is_empty() {
        return Err(CodecError::precondition(format!(
            "empty key for value {:?}",
            value
        )));
    }
    if key.bytes().any(|b| b == SEPARATOR || b == 0) {
        return Err(CodecError::precondition(format!(
            "key {:?} contains '=' or NUL",
            key
        )));
    }
    if value.bytes().any(|b| b == 0) {
        return Err(CodecError::precondition(format!(
            "value of {:?} contains NUL",
            key
        )));
    }
    Ok(())
}

/// Number of payload bytes the entries occupy, terminator included.
pub fn encoded_len(entries: &BTreeMap<String, String>) -> usize {
    if entries.is_empty() {
        return TERMINATOR.len();
    }
    let body: usize = entries.iter().map(|(k, v)| k.len() + v.len() + 2).sum();
    body + 1
}

/// Encodes entries into exactly `capacity` payload bytes.
///
/// Entries are written in ascending key order, followed by the end-of-list
/// NUL and `FILL_BYTE` padding. Never truncates.
pub fn encode_payload(entries: &BTreeMap<String, String>, capacity: usize) -> CodecResult<Vec<u8>> {
    for (key, value) in entries {
        validate_entry(key, value)?;
        if value.is_empty() {
            return Err(CodecError::precondition(format!(
                "empty value for key {:?} reached the encoder",
                key
            )));
        }
    }

    let required = encoded_len(entries);
    if required > capacity {
        return Err(CodecError::capacity_exceeded(required, capacity));
    }

    let mut buf = Vec::with_capacity(capacity);
    for (key, value) in entries {
        buf.extend_from_slice(key.as_bytes());
        buf.push(SEPARATOR);
        buf.extend_from_slice(value.as_bytes());
        buf.push(0);
    }

    buf.push(0);
    // No entry wrote the first NUL of the marker
    if entries.is_empty() {
        buf.push(0);
    }

    buf.resize(capacity, FILL_BYTE);
    Ok(buf)
}
