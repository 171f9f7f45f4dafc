//! CLI module for bootenv
//!
//! Provides command-line interface for:
//! - create: Write an empty environment of a fixed size
//! - print: Show variables
//! - set: Change or delete one variable
//! - import: Apply a `key=value` text file

mod args;
mod commands;
mod config;
mod errors;

pub use args::{Cli, Command, GlobalArgs};
pub use commands::{create, import, print, run, run_command, set};
pub use config::{Config, Settings};
pub use errors::{CliError, CliResult};
