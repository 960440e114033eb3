//! mdtree: decompile markdown headings into a folder tree and recompile it back.
//!
//! The forward direction parses a document into a [`Node`] tree and materializes it through a
//! [`Layout`]; an optional combination pass then marks titles that repeat across the tree. The
//! reverse direction walks a materialized tree in recorded order and merges marked entries back
//! under one heading.
#![allow(clippy::multiple_crate_versions)]

pub mod combine;
pub mod config;
pub mod entries;
pub mod error;
pub mod layouts;
pub mod manifest;
pub mod node;
pub mod parser;
pub mod reconstruct;
pub mod serializer;

pub use error::{Error, Result};
pub use layouts::{Layout, LayoutKind};
pub use node::Node;
pub use parser::parse;
pub use reconstruct::{reconstruct, MergeScope, RecompileOptions};
pub use serializer::{count_artifacts, read_document, serialize, Pacer};

#[cfg(test)]
#[path = "tests/roundtrip.rs"]
mod tests;
