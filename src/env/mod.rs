//! Environment store
//!
//! Owns the decoded mapping and its fixed size, and performs the
//! byte-source / byte-sink I/O around the codec.
//!
//! # Design Principles
//!
//! - Size is fixed for the lifetime of a store
//! - Checksum failures are never relaxed
//! - Saves overwrite in place and fsync
//! - Empty values mean deletion, everywhere
//!
//! Single-threaded: callers sharing one sink must serialize access
//! themselves.

mod environment;
mod errors;
mod import;
mod store;

pub use environment::{Environment, Iter};
pub use errors::{EnvError, EnvErrorCode, EnvResult};
pub use import::{import, import_str};
pub use store::{EnvOptions, EnvStore};
