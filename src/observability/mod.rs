//! Observability for bootenv
//!
//! Structured JSON logging of store lifecycle events. The codec never
//! logs; the store and the CLI do.
//!
//! ```ignore
//! use bootenv::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::EnvSaved, &[("path", "/boot/uboot.env")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

fn severity_for(event: Event) -> Severity {
    if event.is_fatal() {
        Severity::Fatal
    } else if event.is_warning() {
        Severity::Warn
    } else {
        Severity::Info
    }
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity_for(event), event.as_str(), fields);
}
