//! Ordered directory listings and depth-first walks over a materialized tree.
//!
//! Entries are returned in manifest order. Anything the manifest does not know about (or every
//! entry, when a directory has no manifest) follows by creation time, then by name.

use crate::error::{IoContext, Result};
use crate::manifest::{Manifest, MANIFEST_NAME};
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// What a directory entry represents in the projection.
pub enum EntryKind {
    /// A section directory.
    Dir,
    /// A leaf artifact carrying the configured extension.
    Leaf,
    /// Anything else; ignored by the codec.
    Other,
}

#[derive(Clone, Debug)]
/// One child of a directory in the projection.
pub struct Entry {
    /// File name of the entry.
    pub name: String,
    /// Full path of the entry.
    pub path: PathBuf,
    /// Role of the entry.
    pub kind: EntryKind,
}

impl Entry {
    #[must_use]
    /// File name with the leaf extension removed; directories return their full name.
    pub fn stem(&self, extension: &str) -> &str {
        if self.kind != EntryKind::Leaf {
            return &self.name;
        }
        self.name
            .strip_suffix(extension)
            .and_then(|rest| rest.strip_suffix('.'))
            .unwrap_or(&self.name)
    }
}

#[must_use]
/// Leaf extension as used in file names: `.txt` and `txt` both mean `txt`.
pub fn leaf_extension(extension: &str) -> &str {
    extension.trim_start_matches('.')
}

/// List the entries of `dir` in document order.
///
/// # Errors
///
/// Returns an error if the directory or its manifest cannot be read.
pub fn list_entries(dir: &Path, extension: &str) -> Result<Vec<Entry>> {
    let manifest = Manifest::load(dir)?.unwrap_or_default();
    let mut ranked = Vec::new();

    for item in fs::read_dir(dir).at("list", dir)? {
        let item = item.at("list", dir)?;
        let name = item.file_name().to_string_lossy().into_owned();
        if name == MANIFEST_NAME {
            continue;
        }

        let path = item.path();
        let kind = if path.is_dir() {
            EntryKind::Dir
        } else if path.is_file() && is_leaf_name(&name, extension) {
            EntryKind::Leaf
        } else {
            EntryKind::Other
        };
        let created = item
            .metadata()
            .ok()
            .and_then(|meta| meta.created().or_else(|_| meta.modified()).ok());

        ranked.push(Ranked {
            position: manifest.position(&name),
            created,
            entry: Entry { name, path, kind },
        });
    }

    ranked.sort_by(Ranked::cmp);
    Ok(ranked.into_iter().map(|r| r.entry).collect())
}

/// `name` is `<stem>.<extension>` with a non-empty stem.
fn is_leaf_name(name: &str, extension: &str) -> bool {
    name.strip_suffix(extension)
        .and_then(|rest| rest.strip_suffix('.'))
        .is_some_and(|stem| !stem.is_empty())
}

struct Ranked {
    position: Option<usize>,
    created: Option<SystemTime>,
    entry: Entry,
}

impl Ranked {
    fn cmp(a: &Self, b: &Self) -> Ordering {
        let listed = |r: &Self| r.position.unwrap_or(usize::MAX);
        listed(a)
            .cmp(&listed(b))
            .then_with(|| a.created.cmp(&b.created))
            .then_with(|| a.entry.name.cmp(&b.entry.name))
    }
}

/// Visit every directory under (and including) `dir`, children before parents.
///
/// Each directory's subdirectories are walked in listing order before `visit` sees the
/// directory itself together with its entries.
///
/// # Errors
///
/// Propagates listing failures and any error returned by `visit`.
pub fn walk_post_order<F>(dir: &Path, extension: &str, visit: &mut F) -> Result<()>
where
    F: FnMut(&Path, &[Entry]) -> Result<()>,
{
    let entries = list_entries(dir, extension)?;
    for entry in entries.iter().filter(|e| e.kind == EntryKind::Dir) {
        walk_post_order(&entry.path, extension, visit)?;
    }
    visit(dir, &entries)
}

/// Visit every directory under (and including) `dir`, parents before children.
///
/// # Errors
///
/// Propagates listing failures and any error returned by `visit`.
pub fn walk_pre_order<F>(dir: &Path, extension: &str, visit: &mut F) -> Result<()>
where
    F: FnMut(&Path, &[Entry]) -> Result<()>,
{
    let entries = list_entries(dir, extension)?;
    visit(dir, &entries)?;
    for entry in entries.iter().filter(|e| e.kind == EntryKind::Dir) {
        walk_pre_order(&entry.path, extension, visit)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/entries.rs"]
mod tests;
