//! Combination marking for sections that share a title across the tree.
//!
//! A filesystem cannot hold two same-named siblings, and the serializer already keeps siblings
//! apart with `_N` suffixes. Titles that repeat in *different* places are a separate matter: the
//! passes here tag every occurrence with `.comb<N>` so the reconstructor can merge them back under
//! one heading. There is a directory-level pass and a leaf-level pass; a layout uses exactly one.

use crate::entries::{leaf_extension, walk_post_order, Entry, EntryKind};
use crate::error::{IoContext, Result};
use crate::manifest::Manifest;
use indexmap::IndexMap;
use regex::Regex;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, warn};

static COMB: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*)\.comb\d+$").expect("combination pattern is valid"));

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// A name carrying a `.comb<N>` marker, split into its parts.
pub struct CombName<'a> {
    /// The shared title.
    pub base: &'a str,
}

impl<'a> CombName<'a> {
    #[must_use]
    /// Split `name` if it ends in `.comb<N>`.
    pub fn parse(name: &'a str) -> Option<Self> {
        let base = COMB.captures(name)?.get(1)?.as_str();
        Some(Self { base })
    }

    #[must_use]
    /// Whether `name` already carries a marker.
    pub fn is_marked(name: &str) -> bool {
        COMB.is_match(name)
    }
}

#[must_use]
/// The marked form of `base` for occurrence `index`.
pub fn comb_name(base: &str, index: usize) -> String {
    format!("{base}.comb{index}")
}

/// Rename every directory whose name occurs more than once to `<name>.comb<index>`.
///
/// Occurrences are numbered in bottom-up order: a directory's subdirectory names are collected
/// after all of its descendants. Renames run deepest first so that nested duplicates are
/// still reachable through the paths collected before any rename.
///
/// # Errors
///
/// Returns the first listing, rename or manifest failure.
pub fn combine_folders(root: &Path, extension: &str) -> Result<usize> {
    let extension = leaf_extension(extension);
    let mut seen: IndexMap<String, Vec<PathBuf>> = IndexMap::new();
    walk_post_order(root, extension, &mut |_, entries| {
        for entry in entries.iter().filter(|e| e.kind == EntryKind::Dir) {
            if !CombName::is_marked(&entry.name) {
                seen.entry(entry.name.clone())
                    .or_default()
                    .push(entry.path.clone());
            }
        }
        Ok(())
    })?;

    let mut renames: Vec<(PathBuf, String)> = seen
        .iter()
        .filter(|(_, paths)| paths.len() > 1)
        .flat_map(|(name, paths)| {
            paths
                .iter()
                .enumerate()
                .map(move |(i, path)| (path.clone(), comb_name(name, i)))
        })
        .collect();
    renames.sort_by_key(|(path, _)| Reverse(path.components().count()));

    let mut renamed = 0;
    for (path, new_name) in &renames {
        if rename_entry(path, new_name)? {
            renamed += 1;
        }
    }
    Ok(renamed)
}

/// Rename every leaf artifact whose base name occurs more than once to
/// `<base>.comb<index>.<extension>`.
///
/// One traversal counts base names, a second one renames, so a rename can never disturb a count.
/// Artifacts that already carry a marker are neither counted nor renamed, which makes the pass
/// idempotent.
///
/// # Errors
///
/// Returns the first listing, rename or manifest failure.
pub fn combine_leaves(root: &Path, extension: &str) -> Result<usize> {
    let extension = leaf_extension(extension);
    let mut counts: HashMap<String, usize> = HashMap::new();
    walk_post_order(root, extension, &mut |_, entries| {
        for stem in unmarked_leaves(entries, extension) {
            *counts.entry(stem.to_string()).or_default() += 1;
        }
        Ok(())
    })?;

    let mut next_index: HashMap<String, usize> = HashMap::new();
    let mut renamed = 0;
    walk_post_order(root, extension, &mut |dir, entries| {
        for stem in unmarked_leaves(entries, extension) {
            if counts.get(stem).copied().unwrap_or(0) < 2 {
                continue;
            }
            let index = next_index.entry(stem.to_string()).or_default();
            let new_name = format!("{}.{extension}", comb_name(stem, *index));
            *index += 1;
            if rename_entry(&dir.join(format!("{stem}.{extension}")), &new_name)? {
                renamed += 1;
            }
        }
        Ok(())
    })?;
    Ok(renamed)
}

fn unmarked_leaves<'e>(entries: &'e [Entry], extension: &'e str) -> impl Iterator<Item = &'e str> {
    entries
        .iter()
        .filter(|e| e.kind == EntryKind::Leaf)
        .map(move |e| e.stem(extension))
        .filter(|stem| !CombName::is_marked(stem))
}

/// Rename `path` within its directory and keep the parent manifest in step.
///
/// Returns `false` without touching anything when the target name is already taken.
fn rename_entry(path: &Path, new_name: &str) -> Result<bool> {
    let (Some(parent), Some(old_name)) = (path.parent(), path.file_name()) else {
        return Ok(false);
    };
    let old_name = old_name.to_string_lossy().into_owned();
    let target = parent.join(new_name);
    if target.exists() {
        warn!(
            from = %path.display(),
            to = %target.display(),
            "combination target already exists, leaving entry as is"
        );
        return Ok(false);
    }

    fs::rename(path, &target).at("rename", path)?;
    Manifest::rename_entry(parent, &old_name, new_name)?;
    debug!(from = %path.display(), to = new_name, "marked combination entry");
    Ok(true)
}

#[cfg(test)]
#[path = "tests/combine.rs"]
mod tests;
