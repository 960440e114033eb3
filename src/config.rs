//! Configuration to acknowledge developer preferences as well as set defaults.
//!
//! Specifically, we try to find an mdtree.toml, and if present we load settings from there.
//! This provides the layout, leaf extension, pacing delay, merge scope and start level.

use crate::layouts::LayoutKind;
use crate::reconstruct::MergeScope;
use clap::ValueEnum;
use facet::Facet;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// File looked up in the working directory.
pub const CONFIG_FILE: &str = "mdtree.toml";

#[derive(Facet, Clone, Debug)]
/// User preferences loaded from mdtree.toml or falling back to defaults.
pub struct Config {
    #[facet(default = "folders".to_string())]
    /// On-disk encoding: "folders" or "files".
    pub layout: String,
    #[facet(default = "txt".to_string())]
    /// Extension of leaf artifacts, without the dot.
    pub leaf_extension: String,
    #[facet(default = 1000)]
    /// Pause after each write when pacing is requested, in milliseconds.
    pub delay_ms: u64,
    #[facet(default = "tree".to_string())]
    /// Reach of combination merging: "tree" or "directory".
    pub merge_scope: String,
    #[facet(default = 1)]
    /// Heading level for top-level entries when recompiling.
    pub start_level: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: "folders".to_string(),
            leaf_extension: "txt".to_string(),
            delay_ms: 1000,
            merge_scope: "tree".to_string(),
            start_level: 1,
        }
    }
}

impl Config {
    #[must_use]
    /// Load configuration from mdtree.toml if present.
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    #[must_use]
    /// Load configuration from `path`, using defaults if it is missing or unreadable.
    pub fn load_from(path: &Path) -> Self {
        let Ok(contents) = fs::read_to_string(path) else {
            return Self::default();
        };
        if let Ok(config) = facet_toml::from_str::<Self>(&contents) {
            return config;
        }
        warn!(path = %path.display(), "could not parse config, using defaults");
        Self::default()
    }

    #[must_use]
    /// The configured layout, or the default one if the name is unknown.
    pub fn layout_kind(&self) -> LayoutKind {
        LayoutKind::from_str(&self.layout, true).unwrap_or_else(|_| {
            warn!(layout = %self.layout, "unknown layout, using folders");
            LayoutKind::default()
        })
    }

    #[must_use]
    /// The configured merge scope, or the default one if the name is unknown.
    pub fn merge_scope(&self) -> MergeScope {
        MergeScope::from_str(&self.merge_scope, true).unwrap_or_else(|_| {
            warn!(scope = %self.merge_scope, "unknown merge scope, using tree");
            MergeScope::default()
        })
    }

    #[must_use]
    /// The pacing delay as a duration.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
