//! Text import
//!
//! Reads `key=value` lines, the input format of `mkenvimage`:
//!
//! ```text
//! # comment
//! bootdelay=3
//! bootargs=console=ttyS0,115200
//! ```
//!
//! Lines go through [`Environment::set`], so an empty value deletes the
//! key just as it does for a direct set.

use std::io::BufRead;

use super::environment::Environment;
use super::errors::{EnvError, EnvErrorCode, EnvResult};
use crate::observability::{log_event_with_fields, Event};

/// Applies every assignment in `reader` to `env`.
///
/// Returns the number of applied lines. A line without `=`, or with an
/// empty key, aborts the import; lines applied before it stay applied.
pub fn import<R: BufRead>(env: &mut Environment, reader: R) -> EnvResult<usize> {
    let mut applied = 0;

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| EnvError::io_error("Failed to read import input", e))?;
        let line = line.strip_suffix('\r').unwrap_or(&line);
        let line_number = index + 1;

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| EnvError::malformed_line(line_number, line))?;

        env.set(key, value).map_err(|e| match e.code() {
            EnvErrorCode::PreconditionViolation => EnvError::malformed_line(line_number, line),
            _ => e,
        })?;
        applied += 1;
    }

    let applied_field = applied.to_string();
    log_event_with_fields(Event::EnvImported, &[("applied", applied_field.as_str())]);
    Ok(applied)
}

/// Imports from an in-memory string.
pub fn import_str(env: &mut Environment, text: &str) -> EnvResult<usize> {
    import(env, text.as_bytes())
}
