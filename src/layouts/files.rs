//! File layout: childless sections are bare leaf artifacts instead of directories.
//!
//! A section with subsections still gets a directory, and its own body is stored inside as a
//! leaf carrying the directory's name. Repeated titles are marked on leaf artifacts
//! (`sec.comb0.txt`); a marked leaf contributes its text to whatever heading precedes it.

use crate::combine::{combine_leaves, CombName};
use crate::entries::{list_entries, EntryKind};
use crate::error::Result;
use crate::layouts::Layout;
use crate::node::Node;
use crate::reconstruct::Recompiler;
use crate::serializer::DirWriter;
use std::path::Path;

/// Leaf-per-section layout with leaf-level combination marking.
pub struct FileLayout;

impl Layout for FileLayout {
    fn materialize(&self, node: &Node, parent: &mut DirWriter<'_>) -> Result<()> {
        if node.children.is_empty() {
            parent.write_leaf(&node.name, &node.body)?;
            return Ok(());
        }

        // The leaf named after the directory holds the section's own body, so no child may
        // take that name even when the body is empty.
        let mut dir = parent.create_dir(&node.name)?;
        let own_name = dir.name();
        if node.has_content() {
            dir.write_leaf(&own_name, &node.body)?;
        } else {
            dir.reserve_leaf(&own_name);
        }
        for child in &node.children {
            self.materialize(child, &mut dir)?;
        }
        dir.finish()
    }

    fn count_artifacts(&self, node: &Node) -> usize {
        if node.children.is_empty() {
            return 1;
        }
        1 + usize::from(node.has_content())
            + node
                .children
                .iter()
                .map(|child| self.count_artifacts(child))
                .sum::<usize>()
    }

    fn combine(&self, root: &Path, extension: &str) -> Result<usize> {
        combine_leaves(root, extension)
    }

    fn emit_dir(&self, recompiler: &mut Recompiler<'_>, dir: &Path, level: usize) -> Result<()> {
        let extension = recompiler.extension().to_string();
        let own_name = if recompiler.is_root(dir) {
            None
        } else {
            dir.file_name().map(|n| n.to_string_lossy().into_owned())
        };

        for entry in list_entries(dir, &extension)? {
            match entry.kind {
                EntryKind::Dir => {
                    recompiler.heading(level, &entry.name);
                    recompiler.descend(&entry.path, level + 1)?;
                }
                EntryKind::Leaf => {
                    let stem = entry.stem(&extension);
                    let is_body = own_name.as_deref() == Some(stem);
                    if !is_body && CombName::parse(stem).is_none() {
                        recompiler.heading(level, stem);
                    }
                    recompiler.content_from(&entry.path)?;
                }
                EntryKind::Other => {}
            }
        }
        Ok(())
    }
}
