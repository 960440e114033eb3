use super::{leaf_extension, list_entries, walk_post_order, walk_pre_order, EntryKind};
use crate::manifest::Manifest;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn names(dir: &Path) -> Vec<String> {
    list_entries(dir, "txt")
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect()
}

#[test]
fn test_manifest_order_beats_alphabetical() {
    let dir = TempDir::new().unwrap();
    for name in ["alpha", "beta", "gamma"] {
        fs::create_dir(dir.path().join(name)).unwrap();
    }
    let manifest = Manifest {
        entries: vec!["gamma".into(), "alpha".into(), "beta".into()],
        preamble: None,
    };
    manifest.save(dir.path()).unwrap();

    assert_eq!(names(dir.path()), vec!["gamma", "alpha", "beta"]);
}

#[test]
fn test_unlisted_entries_follow_listed_ones() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("listed")).unwrap();
    fs::create_dir(dir.path().join("added-later")).unwrap();
    let manifest = Manifest {
        entries: vec!["listed".into(), "gone".into()],
        preamble: None,
    };
    manifest.save(dir.path()).unwrap();

    assert_eq!(names(dir.path()), vec!["listed", "added-later"]);
}

#[test]
fn test_manifest_file_is_hidden_and_kinds_resolved() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("Section")).unwrap();
    fs::write(dir.path().join("Section.txt"), "body").unwrap();
    fs::write(dir.path().join("notes.md"), "ignored").unwrap();
    Manifest {
        entries: vec!["Section".into(), "Section.txt".into(), "notes.md".into()],
        preamble: None,
    }
    .save(dir.path())
    .unwrap();

    let entries = list_entries(dir.path(), "txt").unwrap();
    let kinds: Vec<_> = entries.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![EntryKind::Dir, EntryKind::Leaf, EntryKind::Other]
    );
    assert_eq!(entries[1].stem("txt"), "Section");
    assert_eq!(entries[0].stem("txt"), "Section");
}

#[test]
fn test_stem_keeps_inner_dots() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("sec.comb1.txt"), "x").unwrap();

    let entries = list_entries(dir.path(), "txt").unwrap();
    assert_eq!(entries[0].stem("txt"), "sec.comb1");
}

fn nested_tree() -> TempDir {
    // root/{a/{b}, c}
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("a").join("b")).unwrap();
    fs::create_dir(dir.path().join("c")).unwrap();
    Manifest {
        entries: vec!["a".into(), "c".into()],
        preamble: None,
    }
    .save(dir.path())
    .unwrap();
    dir
}

#[test]
fn test_post_order_visits_children_first() {
    let dir = nested_tree();
    let mut seen: Vec<PathBuf> = Vec::new();
    walk_post_order(dir.path(), "txt", &mut |path, _| {
        seen.push(path.strip_prefix(dir.path()).unwrap().to_path_buf());
        Ok(())
    })
    .unwrap();

    let expected: Vec<PathBuf> = vec!["a/b".into(), "a".into(), "c".into(), "".into()];
    assert_eq!(seen, expected);
}

#[test]
fn test_pre_order_visits_parents_first() {
    let dir = nested_tree();
    let mut seen: Vec<PathBuf> = Vec::new();
    walk_pre_order(dir.path(), "txt", &mut |path, _| {
        seen.push(path.strip_prefix(dir.path()).unwrap().to_path_buf());
        Ok(())
    })
    .unwrap();

    let expected: Vec<PathBuf> = vec!["".into(), "a".into(), "a/b".into(), "c".into()];
    assert_eq!(seen, expected);
}

#[test]
fn test_multi_dot_extension_is_a_leaf() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("notes.tar.gz"), "x").unwrap();
    fs::write(dir.path().join("notes.gz"), "x").unwrap();
    fs::write(dir.path().join(".tar.gz"), "x").unwrap();

    let kinds: Vec<(String, EntryKind)> = list_entries(dir.path(), "tar.gz")
        .unwrap()
        .into_iter()
        .map(|e| (e.name, e.kind))
        .collect();
    assert!(kinds.contains(&("notes.tar.gz".to_string(), EntryKind::Leaf)));
    assert!(kinds.contains(&("notes.gz".to_string(), EntryKind::Other)));
    assert!(kinds.contains(&(".tar.gz".to_string(), EntryKind::Other)));
}

#[test]
fn test_leading_dot_is_dropped_from_extension() {
    assert_eq!(leaf_extension(".txt"), "txt");
    assert_eq!(leaf_extension("txt"), "txt");
    assert_eq!(leaf_extension("tar.gz"), "tar.gz");
}
