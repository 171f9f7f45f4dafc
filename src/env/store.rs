//! File-backed environment store
//!
//! - `create` creates (or truncates) the sink immediately; the first
//!   `save` writes the full image
//! - `open` reads the whole source and decodes it
//! - `save` overwrites in place and fsyncs
//!
//! Save never truncates, renames, or recreates the sink. The sink may be
//! a raw partition or a file on a FAT volume that a bootloader reads at a
//! fixed offset and length, so its size must never change.

use std::fs::{self, File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::environment::Environment;
use super::errors::{EnvError, EnvResult};
use super::import;
use crate::codec::{Layout, ParseMode};
use crate::observability::{log_event_with_fields, Event};

/// Options for opening an existing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnvOptions {
    /// Entry parsing mode; checksum validation is never relaxed
    pub mode: ParseMode,
    /// Required source length, if known
    pub expected_size: Option<usize>,
    /// Header geometry
    pub layout: Layout,
}

impl EnvOptions {
    /// Strict parsing, default layout, any size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip malformed entries instead of failing.
    pub fn best_effort(mut self) -> Self {
        self.mode = ParseMode::BestEffort;
        self
    }

    /// Sets the parse mode.
    pub fn mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }

    /// Fails the open unless the source is exactly `size` bytes.
    pub fn expected_size(mut self, size: usize) -> Self {
        self.expected_size = Some(size);
        self
    }

    /// Sets the header layout.
    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }
}

/// An environment bound to the file or device it is persisted in.
#[derive(Debug)]
pub struct EnvStore {
    path: PathBuf,
    env: Environment,
}

impl EnvStore {
    /// Creates an empty store of `size` bytes at `path` with the default layout.
    pub fn create(path: impl AsRef<Path>, size: usize) -> EnvResult<Self> {
        Self::create_with_layout(path, size, Layout::default())
    }

    /// Creates an empty store with an explicit layout.
    ///
    /// The sink is created (or truncated) now; nothing is written until
    /// `save`.
    pub fn create_with_layout(
        path: impl AsRef<Path>,
        size: usize,
        layout: Layout,
    ) -> EnvResult<Self> {
        let path = path.as_ref().to_path_buf();
        let env = Environment::with_layout(size, layout)?;

        File::create(&path).map_err(|e| {
            EnvError::io_error(format!("Failed to create {}", path.display()), e)
        })?;

        let display = path.display().to_string();
        let size_field = size.to_string();
        log_event_with_fields(
            Event::EnvCreated,
            &[("path", display.as_str()), ("size", size_field.as_str())],
        );

        Ok(Self { path, env })
    }

    /// Opens an existing store in strict mode.
    pub fn open(path: impl AsRef<Path>) -> EnvResult<Self> {
        Self::open_with_options(path, EnvOptions::default())
    }

    /// Opens an existing store, skipping malformed entries.
    pub fn open_best_effort(path: impl AsRef<Path>) -> EnvResult<Self> {
        Self::open_with_options(path, EnvOptions::new().best_effort())
    }

    /// Opens an existing store.
    ///
    /// # Errors
    ///
    /// - `IoError` if the source cannot be read
    /// - `SizeMismatch` if the source length is wrong
    /// - `ChecksumMismatch` in every mode
    /// - `InvalidEncoding` in every mode, for a `key=value` entry that is not UTF-8
    /// - `MalformedPayload` / `MalformedEntry` in strict mode
    pub fn open_with_options(path: impl AsRef<Path>, options: EnvOptions) -> EnvResult<Self> {
        let path = path.as_ref().to_path_buf();
        let display = path.display().to_string();

        let image = fs::read(&path)
            .map_err(|e| EnvError::io_error(format!("Failed to read {}", display), e))?;

        if let Some(expected) = options.expected_size {
            if image.len() != expected {
                return Err(EnvError::size_mismatch(
                    format!("Source {} has the wrong size", display),
                    expected as u64,
                    image.len() as u64,
                ));
            }
        }

        let (env, parsed) = match Environment::decode(&image, options.layout, options.mode) {
            Ok(decoded) => decoded,
            Err(e) => {
                if let Some((stored, computed)) = e.checksums() {
                    let stored = format!("{:08x}", stored);
                    let computed = format!("{:08x}", computed);
                    log_event_with_fields(
                        Event::ChecksumMismatch,
                        &[
                            ("computed", computed.as_str()),
                            ("path", display.as_str()),
                            ("stored", stored.as_str()),
                        ],
                    );
                }
                return Err(e);
            }
        };

        if parsed.unterminated {
            log_event_with_fields(Event::PayloadUnterminated, &[("path", display.as_str())]);
        }
        for raw in &parsed.skipped {
            let entry = String::from_utf8_lossy(raw);
            log_event_with_fields(
                Event::EntrySkipped,
                &[("entry", entry.as_ref()), ("path", display.as_str())],
            );
        }

        let entries = env.len().to_string();
        let size = env.target_size().to_string();
        log_event_with_fields(
            Event::EnvOpened,
            &[
                ("entries", entries.as_str()),
                ("path", display.as_str()),
                ("size", size.as_str()),
            ],
        );

        Ok(Self { path, env })
    }

    /// Returns the sink path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the in-memory environment.
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Returns the in-memory environment for mutation.
    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// Returns the fixed store size in bytes.
    pub fn target_size(&self) -> usize {
        self.env.target_size()
    }

    /// Returns the value of `key`, or `""` when it is not set.
    pub fn get(&self, key: &str) -> &str {
        self.env.get(key)
    }

    /// Sets `key`; an empty value deletes it. Fails on an empty key.
    pub fn set(&mut self, key: &str, value: &str) -> EnvResult<()> {
        self.env.set(key, value)
    }

    /// Renders `key=value\n` lines in key order.
    pub fn render(&self) -> String {
        self.env.render()
    }

    /// Imports `key=value` lines; see [`import::import`].
    pub fn import<R: std::io::BufRead>(&mut self, reader: R) -> EnvResult<usize> {
        import::import(&mut self.env, reader)
    }

    /// Encodes the environment and writes it over the sink in place.
    ///
    /// The image is built before the sink is touched, so a capacity error
    /// never leaves a partial write behind.
    ///
    /// # Errors
    ///
    /// - `CapacityExceeded` if the entries do not fit
    /// - `SizeMismatch` if the sink already holds a different number of bytes
    /// - `IoError` on open, write, or fsync failure
    pub fn save(&self) -> EnvResult<()> {
        let image = self.env.to_bytes()?;
        let display = self.path.display().to_string();

        // No create, no truncate
        let mut file = OpenOptions::new()
            .write(true)
            .open(&self.path)
            .map_err(|e| EnvError::io_error(format!("Failed to open {}", display), e))?;

        // Block devices report zero; freshly created files are empty
        let current_len = file
            .metadata()
            .map_err(|e| EnvError::io_error("Failed to read sink metadata", e))?
            .len();
        if current_len != 0 && current_len != image.len() as u64 {
            return Err(EnvError::size_mismatch(
                format!("Sink {} would change size", display),
                image.len() as u64,
                current_len,
            ));
        }

        file.seek(SeekFrom::Start(0))
            .map_err(|e| EnvError::io_error(format!("Failed to seek {}", display), e))?;
        file.write_all(&image)
            .map_err(|e| EnvError::io_error(format!("Failed to write {}", display), e))?;

        // fsync - mandatory for durability
        file.sync_all()
            .map_err(|e| EnvError::io_error(format!("fsync failed for {}", display), e))?;

        let entries = self.env.len().to_string();
        let used = self.env.used_bytes().to_string();
        log_event_with_fields(
            Event::EnvSaved,
            &[
                ("entries", entries.as_str()),
                ("path", display.as_str()),
                ("used", used.as_str()),
            ],
        );

        Ok(())
    }
}
