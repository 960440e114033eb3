use super::Config;
use crate::layouts::LayoutKind;
use crate::reconstruct::MergeScope;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_missing_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let cfg = Config::load_from(&dir.path().join("mdtree.toml"));

    assert_eq!(cfg.layout_kind(), LayoutKind::Folders);
    assert_eq!(cfg.leaf_extension, "txt");
    assert_eq!(cfg.delay(), Duration::from_secs(1));
    assert_eq!(cfg.merge_scope(), MergeScope::Tree);
    assert_eq!(cfg.start_level, 1);
}

#[test]
fn test_file_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mdtree.toml");
    fs::write(
        &path,
        r#"
layout = "files"
leaf_extension = "md"
delay_ms = 250
merge_scope = "directory"
start_level = 2
"#,
    )
    .unwrap();

    let cfg = Config::load_from(&path);
    assert_eq!(cfg.layout_kind(), LayoutKind::Files);
    assert_eq!(cfg.leaf_extension, "md");
    assert_eq!(cfg.delay(), Duration::from_millis(250));
    assert_eq!(cfg.merge_scope(), MergeScope::Directory);
    assert_eq!(cfg.start_level, 2);
}

#[test]
fn test_unknown_names_fall_back() {
    let cfg = Config {
        layout: "spiral".to_string(),
        merge_scope: "galaxy".to_string(),
        ..Config::default()
    };

    assert_eq!(cfg.layout_kind(), LayoutKind::Folders);
    assert_eq!(cfg.merge_scope(), MergeScope::Tree);
}

#[test]
fn test_names_are_case_insensitive() {
    let cfg = Config {
        layout: "Files".to_string(),
        ..Config::default()
    };
    assert_eq!(cfg.layout_kind(), LayoutKind::Files);
}
