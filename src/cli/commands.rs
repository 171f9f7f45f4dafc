//! CLI command implementations
//!
//! Every command that changes the environment opens it, mutates it in
//! memory, and saves once at the end.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;

use super::args::{Cli, Command};
use super::config::Settings;
use super::errors::{CliError, CliResult};
use crate::env::EnvStore;

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let settings = Settings::resolve(&cli.global)?;
    run_command(&settings, cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(settings: &Settings, cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Create { size } => create(settings, size),
        Command::Print { names } => {
            let stdout = io::stdout();
            print(settings, &names, &mut stdout.lock())
        }
        Command::Set { name, value } => set(settings, &name, value.as_deref().unwrap_or("")),
        Command::Import { input } => import(settings, &input),
    }
}

/// Create an empty environment and write it out
pub fn create(settings: &Settings, size: Option<usize>) -> CliResult<()> {
    let size = size
        .or(settings.env_size)
        .ok_or_else(|| CliError::config_error("No size given (--size or env_size)"))?;

    let store = EnvStore::create_with_layout(&settings.env_path, size, settings.layout)?;
    store.save()?;
    Ok(())
}

/// Print all variables, or only `names`
///
/// Every name is printed that exists; the first missing one is reported
/// after the rest have been written.
pub fn print<W: Write>(settings: &Settings, names: &[String], out: &mut W) -> CliResult<()> {
    let store = EnvStore::open_with_options(&settings.env_path, settings.open_options())?;

    if names.is_empty() {
        out.write_all(store.render().as_bytes())?;
        return Ok(());
    }

    let mut missing = None;
    for name in names {
        if store.env().contains(name) {
            writeln!(out, "{}={}", name, store.get(name))?;
        } else if missing.is_none() {
            missing = Some(name.clone());
        }
    }

    match missing {
        Some(name) => Err(CliError::NotDefined(name)),
        None => Ok(()),
    }
}

/// Set (or with an empty value, delete) one variable
pub fn set(settings: &Settings, name: &str, value: &str) -> CliResult<()> {
    let mut store = EnvStore::open_with_options(&settings.env_path, settings.open_options())?;
    store.set(name, value)?;
    store.save()?;
    Ok(())
}

/// Import `key=value` lines from `input` ("-" reads stdin)
///
/// Nothing is saved if any line is malformed.
pub fn import(settings: &Settings, input: &Path) -> CliResult<()> {
    let mut store = EnvStore::open_with_options(&settings.env_path, settings.open_options())?;

    if input == Path::new("-") {
        let stdin = io::stdin();
        store.import(stdin.lock())?;
    } else {
        let file = File::open(input).map_err(|source| CliError::Input {
            path: input.to_path_buf(),
            source,
        })?;
        store.import(BufReader::new(file))?;
    }

    store.save()?;
    Ok(())
}
