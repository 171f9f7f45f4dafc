//! In-memory environment
//!
//! An owned, sorted mapping plus the fixed size of the image it came
//! from (or will be written to). Keys are never empty and values are
//! never empty: setting an empty value deletes the key.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

use super::errors::EnvResult;
use crate::codec::{self, Layout, ParseMode, ParsedPayload};

/// A decoded bootloader environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    target_size: usize,
    layout: Layout,
    entries: BTreeMap<String, String>,
}

impl Environment {
    /// Creates an empty environment of `target_size` bytes with the default layout.
    pub fn new(target_size: usize) -> EnvResult<Self> {
        Self::with_layout(target_size, Layout::default())
    }

    /// Creates an empty environment with an explicit layout.
    pub fn with_layout(target_size: usize, layout: Layout) -> EnvResult<Self> {
        layout.payload_size(target_size)?;
        Ok(Self {
            target_size,
            layout,
            entries: BTreeMap::new(),
        })
    }

    /// Decodes an image; its length becomes the target size.
    pub fn from_bytes(image: &[u8], layout: Layout, mode: ParseMode) -> EnvResult<Self> {
        Ok(Self::decode(image, layout, mode)?.0)
    }

    /// Decodes an image, also returning what best-effort parsing dropped.
    pub(crate) fn decode(
        image: &[u8],
        layout: Layout,
        mode: ParseMode,
    ) -> EnvResult<(Self, ParsedPayload)> {
        let mut parsed = codec::decode_image(image, layout, mode)?;
        let env = Self {
            target_size: image.len(),
            layout,
            entries: std::mem::take(&mut parsed.entries),
        };
        Ok((env, parsed))
    }

    /// Encodes the full image (header + payload), exactly `target_size` bytes.
    pub fn to_bytes(&self) -> EnvResult<Vec<u8>> {
        Ok(codec::encode_image(
            &self.entries,
            self.layout,
            self.target_size,
        )?)
    }

    /// Total image size in bytes, header included.
    pub fn target_size(&self) -> usize {
        self.target_size
    }

    /// Returns the header layout.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Payload bytes available for entries and terminator.
    pub fn capacity(&self) -> usize {
        self.target_size - self.layout.header_size()
    }

    /// Payload bytes the current entries would occupy.
    pub fn used_bytes(&self) -> usize {
        codec::encoded_len(&self.entries)
    }

    /// Returns the value of `key`, or `""` when it is not set.
    pub fn get(&self, key: &str) -> &str {
        self.entries.get(key).map(String::as_str).unwrap_or("")
    }

    /// Returns whether `key` is set.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Sets `key` to `value`. An empty value removes the key.
    ///
    /// # Errors
    ///
    /// `PreconditionViolation` if the key is empty, or if either side
    /// contains bytes the payload grammar cannot carry (`=` in the key,
    /// NUL anywhere).
    pub fn set(&mut self, key: &str, value: &str) -> EnvResult<()> {
        codec::validate_entry(key, value)?;

        if value.is_empty() {
            self.entries.remove(key);
        } else {
            self.entries.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    /// Removes `key`, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in ascending key order, the order they are encoded in.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Renders `key=value\n` lines in encode order.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.used_bytes());
        for (key, value) in self.iter() {
            out.push_str(key);
            out.push('=');
            out.push_str(value);
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Iterator over `(key, value)` pairs in ascending key order.
pub struct Iter<'a> {
    inner: btree_map::Iter<'a, String, String>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a Environment {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
