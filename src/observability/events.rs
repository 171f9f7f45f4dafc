//! Observable events
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events in a store's lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Configuration file loaded
    ConfigLoaded,
    /// Empty store created
    EnvCreated,
    /// Store decoded from its source
    EnvOpened,
    /// Store written and synced
    EnvSaved,
    /// Text import finished
    EnvImported,
    /// Best-effort decode dropped a malformed entry
    EntrySkipped,
    /// Best-effort decode found no end-of-list marker
    PayloadUnterminated,
    /// Stored checksum disagrees with the payload (FATAL)
    ChecksumMismatch,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::EnvCreated => "ENV_CREATED",
            Event::EnvOpened => "ENV_OPENED",
            Event::EnvSaved => "ENV_SAVED",
            Event::EnvImported => "ENV_IMPORTED",
            Event::EntrySkipped => "ENTRY_SKIPPED",
            Event::PayloadUnterminated => "PAYLOAD_UNTERMINATED",
            Event::ChecksumMismatch => "CHECKSUM_MISMATCH",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::ChecksumMismatch)
    }

    /// Returns true if this event reports recovered damage
    pub fn is_warning(&self) -> bool {
        matches!(self, Event::EntrySkipped | Event::PayloadUnterminated)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::ConfigLoaded,
            Event::EnvCreated,
            Event::EnvOpened,
            Event::EnvSaved,
            Event::EnvImported,
            Event::EntrySkipped,
            Event::PayloadUnterminated,
            Event::ChecksumMismatch,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_fatal_events() {
        assert!(Event::ChecksumMismatch.is_fatal());
        assert!(!Event::EnvSaved.is_fatal());
        assert!(Event::EntrySkipped.is_warning());
    }
}
