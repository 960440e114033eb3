//! Folder layout: one directory per section, body as a companion leaf inside it.
//!
//! Repeated titles are marked on directories (`Intro.comb0`, `Intro.comb1`). On the way back,
//! marked directories sharing a base name collapse into one heading whose content is each
//! member's subtree, in the order the members first appear.

use crate::combine::{combine_folders, CombName};
use crate::entries::{list_entries, EntryKind};
use crate::error::Result;
use crate::layouts::Layout;
use crate::node::Node;
use crate::reconstruct::{Claim, Recompiler};
use crate::serializer::DirWriter;
use std::path::Path;
use tracing::warn;

/// Directory-per-section layout with directory-level combination marking.
pub struct FolderLayout;

impl Layout for FolderLayout {
    fn materialize(&self, node: &Node, parent: &mut DirWriter<'_>) -> Result<()> {
        let mut dir = parent.create_dir(&node.name)?;
        if node.has_content() {
            dir.write_leaf(&node.name, &node.body)?;
        }
        for child in &node.children {
            self.materialize(child, &mut dir)?;
        }
        dir.finish()
    }

    fn count_artifacts(&self, node: &Node) -> usize {
        1 + usize::from(node.has_content())
            + node
                .children
                .iter()
                .map(|child| self.count_artifacts(child))
                .sum::<usize>()
    }

    fn combine(&self, root: &Path, extension: &str) -> Result<usize> {
        combine_folders(root, extension)
    }

    fn emit_dir(&self, recompiler: &mut Recompiler<'_>, dir: &Path, level: usize) -> Result<()> {
        let entries = list_entries(dir, recompiler.extension())?;
        let mut siblings = recompiler.sibling_groups(&entries);

        for entry in &entries {
            match entry.kind {
                EntryKind::Dir => match CombName::parse(&entry.name) {
                    Some(comb) => match recompiler.claim(siblings.as_mut(), comb.base) {
                        Claim::Emit(members) => {
                            recompiler.heading(level, comb.base);
                            for member in &members {
                                recompiler.descend(member, level + 1)?;
                            }
                        }
                        Claim::Taken => {}
                        Claim::Lonely => {
                            warn!(
                                path = %entry.path.display(),
                                "combination entry has no partner, keeping its full name"
                            );
                            recompiler.heading(level, &entry.name);
                            recompiler.descend(&entry.path, level + 1)?;
                        }
                    },
                    None => {
                        recompiler.heading(level, &entry.name);
                        recompiler.descend(&entry.path, level + 1)?;
                    }
                },
                EntryKind::Leaf => recompiler.content_from(&entry.path)?,
                EntryKind::Other => {}
            }
        }
        Ok(())
    }
}
