//! CLI argument definitions using clap
//!
//! Commands:
//! - bootenv create --file <path> --size <bytes>
//! - bootenv print --file <path> [NAME...]
//! - bootenv set --file <path> NAME [VALUE]
//! - bootenv import --file <path> <INPUT>

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// bootenv - read and write fixed-size bootloader environments
#[derive(Parser, Debug)]
#[command(name = "bootenv")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command; they override the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Path to a JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Environment file or device
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Header size in bytes (checksum plus reserved bytes)
    #[arg(long, global = true)]
    pub header_size: Option<usize>,

    /// Skip malformed entries instead of failing
    #[arg(long, global = true)]
    pub best_effort: bool,

    /// Log lifecycle events to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an empty environment of a fixed size
    Create {
        /// Total size in bytes, header included
        #[arg(long)]
        size: Option<usize>,
    },

    /// Print all variables, or only the named ones
    Print {
        /// Variables to print
        names: Vec<String>,
    },

    /// Set a variable; omitting the value deletes it
    Set {
        /// Variable name
        name: String,
        /// New value
        value: Option<String>,
    },

    /// Import `key=value` lines from a text file ("-" for stdin)
    Import {
        /// Input text file
        input: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
