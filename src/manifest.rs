//! Order manifests recording the creation order of directory entries.
//!
//! Directory listings come back in no particular order and creation timestamps do not survive
//! copies on most filesystems, so every directory written by the serializer carries a small JSON
//! sidecar listing its entries in the order they were made. The reconstructor reads it back to
//! restore document order; the combination encoder keeps it in sync when it renames entries.

use crate::error::{Error, IoContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name of the sidecar stored in every materialized directory.
pub const MANIFEST_NAME: &str = ".mdtree.json";

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
/// Persisted entry order of one directory.
pub struct Manifest {
    /// Entry names in creation order.
    #[serde(default)]
    pub entries: Vec<String>,
    /// Text that preceded the first heading; only stored in the tree root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preamble: Option<String>,
}

impl Manifest {
    /// Read the manifest of `dir`, or `None` when the directory has none.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest exists but cannot be read or parsed.
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(MANIFEST_NAME);
        if !path.is_file() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path).at("read", &path)?;
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| Error::Manifest { path, source })
    }

    /// Write the manifest into `dir`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, dir: &Path) -> Result<()> {
        let path = dir.join(MANIFEST_NAME);
        let json = serde_json::to_string_pretty(self).map_err(|source| Error::Manifest {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json).at("write", &path)
    }

    /// Record an entry at the end of the creation order.
    pub fn push(&mut self, name: impl Into<String>) {
        self.entries.push(name.into());
    }

    #[must_use]
    /// Position of `name` in the creation order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry == name)
    }

    /// Rename an entry of `dir` in place, keeping its position.
    ///
    /// Directories without a manifest are left alone: their order falls back to timestamps.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be read or written back.
    pub fn rename_entry(dir: &Path, old: &str, new: &str) -> Result<()> {
        let Some(mut manifest) = Self::load(dir)? else {
            return Ok(());
        };
        if let Some(i) = manifest.position(old) {
            new.clone_into(&mut manifest.entries[i]);
            manifest.save(dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/manifest.rs"]
mod tests;
