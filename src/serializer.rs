//! Materializes a [`Node`] tree as directories and leaf artifacts.
//!
//! The layout decides what each node becomes on disk; this module supplies the mechanics every
//! layout shares: unique sibling names (`_1`, `_2`, …), the per-directory order manifest, and
//! the optional pacing delay between writes.

use crate::entries::leaf_extension;
use crate::error::{Error, IoContext, Result};
use crate::layouts::Layout;
use crate::manifest::{Manifest, MANIFEST_NAME};
use crate::node::Node;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, Default)]
/// Fixed delay applied after every directory creation and leaf write.
///
/// Purely cosmetic: it lets an operator watch the tree appear. Disabled pacing is a no-op.
pub struct Pacer {
    delay: Option<Duration>,
}

impl Pacer {
    #[must_use]
    /// Pace writes by `delay`, or not at all when `None`.
    pub fn new(delay: Option<Duration>) -> Self {
        Self { delay }
    }

    #[must_use]
    /// A pacer that never sleeps.
    pub fn off() -> Self {
        Self::default()
    }

    #[must_use]
    /// The configured delay, if any.
    pub fn delay(&self) -> Option<Duration> {
        self.delay
    }

    /// Sleep for the configured delay.
    pub fn pause(&self) {
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
    }
}

/// Write `tree` beneath `dest` using `layout`.
///
/// The root node itself is not materialized: its children become the top-level entries of
/// `dest` and its body (the document preamble) is kept in the root manifest.
///
/// # Errors
///
/// Returns the first I/O failure; whatever was written before it stays on disk.
pub fn serialize(
    tree: &Node,
    dest: &Path,
    layout: &dyn Layout,
    extension: &str,
    pacer: &Pacer,
) -> Result<()> {
    let mut root = DirWriter::open(dest, leaf_extension(extension), pacer)?;
    if tree.has_content() {
        root.set_preamble(&tree.body);
    }
    for child in &tree.children {
        layout.materialize(child, &mut root)?;
    }
    root.finish()?;
    info!(dest = %dest.display(), nodes = tree.count_nodes() - 1, "materialized tree");
    Ok(())
}

#[must_use]
/// Number of directories and leaf artifacts `serialize` will create for `tree`.
pub fn count_artifacts(tree: &Node, layout: &dyn Layout) -> usize {
    tree.children
        .iter()
        .map(|child| layout.count_artifacts(child))
        .sum()
}

/// Read a markdown document from disk.
///
/// # Errors
///
/// Returns [`Error::InputUnavailable`] when the file does not exist and [`Error::Io`] when it
/// cannot be read.
pub fn read_document(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(Error::InputUnavailable {
            what: "markdown file",
            path: path.to_path_buf(),
        });
    }
    fs::read_to_string(path).at("read", path)
}

/// Map a heading onto a name the filesystem accepts as a single path component.
#[must_use]
pub fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
        .collect();
    match cleaned.as_str() {
        "" => "Untitled".to_string(),
        "." | ".." | MANIFEST_NAME => format!("_{cleaned}"),
        _ => cleaned,
    }
}

/// An open directory of the projection, tracking taken names and creation order.
pub struct DirWriter<'a> {
    path: PathBuf,
    extension: &'a str,
    pacer: &'a Pacer,
    used: HashSet<String>,
    manifest: Manifest,
}

impl<'a> DirWriter<'a> {
    /// Open `path` for writing, creating it if needed.
    ///
    /// Entries already present count as taken names, and an existing manifest is extended
    /// rather than replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or listed.
    pub fn open(path: &Path, extension: &'a str, pacer: &'a Pacer) -> Result<Self> {
        fs::create_dir_all(path).at("create", path)?;
        let manifest = Manifest::load(path)?.unwrap_or_default();

        let mut used = HashSet::from([MANIFEST_NAME.to_string()]);
        for item in fs::read_dir(path).at("list", path)? {
            let item = item.at("list", path)?;
            used.insert(item.file_name().to_string_lossy().into_owned());
        }

        Ok(Self {
            path: path.to_path_buf(),
            extension,
            pacer,
            used,
            manifest,
        })
    }

    #[must_use]
    /// Final path component of this directory.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Create a subdirectory for a section named `name` and open it.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn create_dir(&mut self, name: &str) -> Result<DirWriter<'a>> {
        let name = self.unique(&sanitize(name), "");
        let path = self.path.join(&name);
        fs::create_dir(&path).at("create", &path)?;
        debug!(path = %path.display(), "created directory");
        self.record(name);
        self.pacer.pause();
        DirWriter::open(&path, self.extension, self.pacer)
    }

    /// Write `body`, trimmed, to a leaf artifact named after `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_leaf(&mut self, name: &str, body: &str) -> Result<PathBuf> {
        let suffix = format!(".{}", self.extension);
        let stem = self.unique(&sanitize(name), &suffix);
        let file_name = format!("{stem}{suffix}");
        let path = self.path.join(&file_name);
        fs::write(&path, body.trim()).at("write", &path)?;
        debug!(path = %path.display(), "wrote leaf artifact");
        self.record(file_name);
        self.pacer.pause();
        Ok(path)
    }

    /// Mark the leaf artifact `name` as taken without writing it.
    pub fn reserve_leaf(&mut self, name: &str) {
        self.used.insert(format!("{name}.{}", self.extension));
    }

    /// Keep the document preamble in this directory's manifest.
    pub fn set_preamble(&mut self, text: &str) {
        self.manifest.preamble = Some(text.trim().to_string());
    }

    /// Persist the creation order of this directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be written.
    pub fn finish(self) -> Result<()> {
        self.manifest.save(&self.path)
    }

    /// First of `base`, `base_1`, `base_2`, … whose file name (with `suffix`) is still free.
    fn unique(&self, base: &str, suffix: &str) -> String {
        let mut candidate = base.to_string();
        let mut counter = 1;
        while self.used.contains(&format!("{candidate}{suffix}")) {
            candidate = format!("{base}_{counter}");
            counter += 1;
        }
        candidate
    }

    fn record(&mut self, name: String) {
        self.used.insert(name.clone());
        self.manifest.push(name);
    }
}

#[cfg(test)]
#[path = "tests/serializer.rs"]
mod tests;
