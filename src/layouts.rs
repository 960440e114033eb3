//! Layout trait and implementations for the two on-disk encodings.
//!
//! A layout decides how a section and its body map onto directories and leaf artifacts, which
//! combination pass marks repeated titles, and how a directory is read back. Encoders and
//! decoders of different layouts are not compatible, so the layout is always an explicit choice
//! rather than something sniffed from the tree.

pub mod files;
pub mod folders;

use crate::error::Result;
use crate::node::Node;
use crate::reconstruct::Recompiler;
use crate::serializer::DirWriter;
use clap::ValueEnum;
use std::path::Path;

/// A paired encoder and decoder for one on-disk encoding.
pub trait Layout {
    /// Write `node` and its subtree into `parent`.
    ///
    /// # Errors
    ///
    /// Returns the first I/O failure.
    fn materialize(&self, node: &Node, parent: &mut DirWriter<'_>) -> Result<()>;

    /// Number of directories and leaf artifacts `materialize` creates for `node`.
    fn count_artifacts(&self, node: &Node) -> usize;

    /// Mark repeated titles under `root` with `.comb<N>`, returning how many entries changed.
    ///
    /// # Errors
    ///
    /// Returns the first listing, rename or manifest failure.
    fn combine(&self, root: &Path, extension: &str) -> Result<usize>;

    /// Emit the contents of `dir`, with headings for its entries at `level`.
    ///
    /// # Errors
    ///
    /// Returns the first listing or read failure.
    fn emit_dir(&self, recompiler: &mut Recompiler<'_>, dir: &Path, level: usize) -> Result<()>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
/// Selects one of the available layouts.
pub enum LayoutKind {
    /// Every section is a directory; its body sits inside as a companion leaf. Repeated titles
    /// are marked on directories.
    #[default]
    Folders,
    /// Childless sections are bare leaf artifacts; sections with children are directories.
    /// Repeated titles are marked on leaf artifacts.
    Files,
}

impl LayoutKind {
    #[must_use]
    /// The layout implementation for this choice.
    pub fn layout(self) -> &'static dyn Layout {
        match self {
            Self::Folders => &folders::FolderLayout,
            Self::Files => &files::FileLayout,
        }
    }
}
