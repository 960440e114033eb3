//! Rebuilds a markdown document from a materialized tree.
//!
//! Directories are visited in manifest order and turned into headings by the active layout.
//! Combination groups (entries marked `.comb<N>` that share a base name) are collected up front
//! for the whole tree, or per directory when the merge scope says so, and emitted once at the
//! first member encountered.

use crate::combine::CombName;
use crate::entries::{leaf_extension, walk_pre_order, Entry, EntryKind};
use crate::error::{Error, IoContext, Result};
use crate::layouts::Layout;
use crate::manifest::Manifest;
use clap::ValueEnum;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Deepest heading level markdown supports.
pub const MAX_LEVEL: usize = 6;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
/// How far apart combination members may be and still merge.
pub enum MergeScope {
    /// Members anywhere in the tree merge under the first one encountered.
    #[default]
    Tree,
    /// Only members that are siblings merge.
    Directory,
}

#[derive(Clone, Debug)]
/// Settings for a recompile run.
pub struct RecompileOptions {
    /// Heading level of the top-level entries (1 for `#`).
    pub start_level: usize,
    /// Emit the root directory's own name as the first heading.
    pub root_heading: bool,
    /// Reach of combination merging.
    pub scope: MergeScope,
    /// Extension of leaf artifacts.
    pub extension: String,
}

impl Default for RecompileOptions {
    fn default() -> Self {
        Self {
            start_level: 1,
            root_heading: false,
            scope: MergeScope::default(),
            extension: "txt".to_string(),
        }
    }
}

/// Reconstruct the document stored under `root`.
///
/// # Errors
///
/// Returns [`Error::InputUnavailable`] when `root` is not a directory, otherwise the first
/// listing, read or manifest failure.
pub fn reconstruct(root: &Path, layout: &dyn Layout, options: &RecompileOptions) -> Result<String> {
    if !root.is_dir() {
        return Err(Error::InputUnavailable {
            what: "folder structure",
            path: root.to_path_buf(),
        });
    }
    let level = checked_level(options.start_level);
    let extension = leaf_extension(&options.extension);

    let groups = match options.scope {
        MergeScope::Tree => CombGroups::scan_tree(root, extension)?,
        MergeScope::Directory => CombGroups::default(),
    };
    let mut recompiler = Recompiler {
        root,
        layout,
        extension,
        scope: options.scope,
        groups,
        out: Emitter::default(),
    };

    if let Some(preamble) = Manifest::load(root)?.and_then(|m| m.preamble) {
        recompiler.content(&preamble);
    }
    if options.root_heading {
        recompiler.heading(level, &root_name(root));
        recompiler.descend(root, level + 1)?;
    } else {
        recompiler.descend(root, level)?;
    }

    info!(root = %root.display(), "reconstructed document");
    Ok(recompiler.out.finish())
}

/// Clamp a requested start level into `1..=MAX_LEVEL`.
fn checked_level(level: usize) -> usize {
    if (1..=MAX_LEVEL).contains(&level) {
        return level;
    }
    let clamped = level.clamp(1, MAX_LEVEL);
    warn!(requested = level, used = clamped, "heading level out of range");
    clamped
}

fn root_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .or_else(|| {
            root.canonicalize()
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        })
        .unwrap_or_else(|| root.display().to_string())
}

/// Traversal state shared between the reconstructor and the active layout.
pub struct Recompiler<'a> {
    root: &'a Path,
    layout: &'a dyn Layout,
    extension: &'a str,
    scope: MergeScope,
    groups: CombGroups,
    out: Emitter,
}

impl Recompiler<'_> {
    #[must_use]
    /// Extension of leaf artifacts.
    pub fn extension(&self) -> &str {
        self.extension
    }

    #[must_use]
    /// Whether `dir` is the root the run started from.
    pub fn is_root(&self, dir: &Path) -> bool {
        dir == self.root
    }

    /// Emit `dir` through the active layout with its entries at `level`.
    ///
    /// # Errors
    ///
    /// Propagates failures from the layout.
    pub fn descend(&mut self, dir: &Path, level: usize) -> Result<()> {
        let layout = self.layout;
        layout.emit_dir(self, dir, level)
    }

    /// Emit a heading line.
    pub fn heading(&mut self, level: usize, title: &str) {
        self.out.heading(level, title);
    }

    /// Emit a block of body text.
    pub fn content(&mut self, text: &str) {
        self.out.content(text);
    }

    /// Emit the contents of a leaf artifact as body text.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn content_from(&mut self, path: &Path) -> Result<()> {
        let text = fs::read_to_string(path).at("read", path)?;
        self.content(&text);
        Ok(())
    }

    #[must_use]
    /// Combination groups among `entries`, when merging is limited to siblings.
    pub fn sibling_groups(&self, entries: &[Entry]) -> Option<CombGroups> {
        match self.scope {
            MergeScope::Directory => {
                let mut groups = CombGroups::default();
                groups.collect(entries);
                Some(groups)
            }
            MergeScope::Tree => None,
        }
    }

    /// Claim the group `base` for emission, from `siblings` if given, else from the whole tree.
    pub fn claim(&mut self, siblings: Option<&mut CombGroups>, base: &str) -> Claim {
        siblings.unwrap_or(&mut self.groups).claim(base)
    }
}

#[derive(Debug, PartialEq, Eq)]
/// Outcome of meeting a combination member during traversal.
pub enum Claim {
    /// First member met: emit one heading and every member's subtree.
    Emit(Vec<PathBuf>),
    /// The group was already emitted elsewhere.
    Taken,
    /// The group has a single member and is decoded as an ordinary entry.
    Lonely,
}

#[derive(Debug, Default)]
/// Combination members keyed by base name, in first-seen order.
pub struct CombGroups {
    members: IndexMap<String, Vec<PathBuf>>,
    emitted: HashSet<String>,
}

impl CombGroups {
    /// Collect the marked directories of the whole tree in document order.
    ///
    /// # Errors
    ///
    /// Returns the first listing failure.
    pub fn scan_tree(root: &Path, extension: &str) -> Result<Self> {
        let mut groups = Self::default();
        walk_pre_order(root, extension, &mut |_, entries| {
            groups.collect(entries);
            Ok(())
        })?;
        Ok(groups)
    }

    /// Add the marked directories among `entries`.
    pub fn collect(&mut self, entries: &[Entry]) {
        for entry in entries.iter().filter(|e| e.kind == EntryKind::Dir) {
            if let Some(comb) = CombName::parse(&entry.name) {
                self.members
                    .entry(comb.base.to_string())
                    .or_default()
                    .push(entry.path.clone());
            }
        }
    }

    #[must_use]
    /// Members of the group `base`, in first-seen order.
    pub fn members(&self, base: &str) -> &[PathBuf] {
        self.members.get(base).map_or(&[], Vec::as_slice)
    }

    /// Mark `base` as emitted and hand out its members, unless it was emitted already.
    pub fn claim(&mut self, base: &str) -> Claim {
        if self.emitted.contains(base) {
            return Claim::Taken;
        }
        let members = self.members(base);
        if members.len() < 2 {
            return Claim::Lonely;
        }
        let members = members.to_vec();
        self.emitted.insert(base.to_string());
        Claim::Emit(members)
    }
}

/// Accumulates output lines, separating adjacent body blocks with a blank line.
#[derive(Debug, Default)]
struct Emitter {
    lines: Vec<String>,
    after_content: bool,
}

impl Emitter {
    fn heading(&mut self, level: usize, title: &str) {
        if level > MAX_LEVEL {
            warn!(level, title, "section nested deeper than markdown allows, flattening");
        }
        let markers = "#".repeat(level.clamp(1, MAX_LEVEL));
        self.lines.push(format!("{markers} {title}"));
        self.after_content = false;
    }

    fn content(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if self.after_content {
            self.lines.push(String::new());
        }
        self.lines.push(text.to_string());
        self.after_content = true;
    }

    fn finish(self) -> String {
        self.lines.join("\n").trim().to_string()
    }
}

#[cfg(test)]
#[path = "tests/reconstruct.rs"]
mod tests;
