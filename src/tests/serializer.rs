use super::{count_artifacts, read_document, sanitize, serialize, Pacer};
use crate::error::Error;
use crate::layouts::LayoutKind;
use crate::manifest::Manifest;
use crate::node::Node;
use crate::parser::parse;
use std::fs;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn write(tree: &Node, kind: LayoutKind) -> TempDir {
    let dir = TempDir::new().unwrap();
    serialize(tree, dir.path(), kind.layout(), "txt", &Pacer::off()).unwrap();
    dir
}

#[test]
fn test_sibling_duplicates_get_numeric_suffix() {
    let tree = parse("# Intro\none\n# Intro\ntwo\n# Intro\nthree\n");
    let dir = write(&tree, LayoutKind::Folders);

    let root = dir.path();
    assert!(root.join("Intro").is_dir());
    assert!(root.join("Intro_1").is_dir());
    assert!(root.join("Intro_2").is_dir());
    assert_eq!(
        fs::read_to_string(root.join("Intro_1").join("Intro.txt")).unwrap(),
        "two"
    );
}

#[test]
fn test_folder_layout_companion_leaf() {
    let tree = parse("# A\n\n  foo  \n\n## B\n## C\nbar\n");
    let dir = write(&tree, LayoutKind::Folders);

    let a = dir.path().join("A");
    assert_eq!(fs::read_to_string(a.join("A.txt")).unwrap(), "foo");
    assert!(a.join("B").is_dir());
    assert!(!a.join("B").join("B.txt").exists(), "empty body, no leaf");
    assert_eq!(
        fs::read_to_string(a.join("C").join("C.txt")).unwrap(),
        "bar"
    );
}

#[test]
fn test_manifest_records_creation_order() {
    let tree = parse("# Zeta\nz\n## Beta\n## Alpha\n");
    let dir = write(&tree, LayoutKind::Folders);

    let root = Manifest::load(dir.path()).unwrap().unwrap();
    assert_eq!(root.entries, vec!["Zeta"]);

    let zeta = Manifest::load(&dir.path().join("Zeta")).unwrap().unwrap();
    assert_eq!(zeta.entries, vec!["Zeta.txt", "Beta", "Alpha"]);
}

#[test]
fn test_preamble_kept_in_root_manifest() {
    let tree = parse("before the first heading\n# A\n");
    let dir = write(&tree, LayoutKind::Folders);

    let root = Manifest::load(dir.path()).unwrap().unwrap();
    assert_eq!(root.preamble.as_deref(), Some("before the first heading"));
}

#[test]
fn test_existing_entries_are_not_overwritten() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("Intro")).unwrap();

    let tree = parse("# Intro\nnew\n");
    serialize(
        &tree,
        dir.path(),
        LayoutKind::Folders.layout(),
        "txt",
        &Pacer::off(),
    )
    .unwrap();

    assert!(dir.path().join("Intro_1").join("Intro.txt").is_file());
    assert!(!dir.path().join("Intro").join("Intro.txt").exists());
}

#[test]
fn test_file_layout_leaves_and_directories() {
    let tree = parse("# A\nfoo\n## B\nbar\n## C\n# D\n");
    let dir = write(&tree, LayoutKind::Files);

    let root = dir.path();
    let a = root.join("A");
    assert!(a.is_dir());
    assert_eq!(fs::read_to_string(a.join("A.txt")).unwrap(), "foo");
    assert_eq!(fs::read_to_string(a.join("B.txt")).unwrap(), "bar");
    assert_eq!(fs::read_to_string(a.join("C.txt")).unwrap(), "");
    assert!(root.join("D.txt").is_file());
    assert!(!root.join("D").exists());
}

#[test]
fn test_file_layout_child_named_like_parent() {
    let tree = parse("# A\nparent body\n## A\nchild body\n");
    let dir = write(&tree, LayoutKind::Files);

    let a = dir.path().join("A");
    assert_eq!(fs::read_to_string(a.join("A.txt")).unwrap(), "parent body");
    assert_eq!(fs::read_to_string(a.join("A_1.txt")).unwrap(), "child body");
}

#[test]
fn test_file_layout_child_named_like_bodiless_parent() {
    let tree = parse("# A\n## A\ntext\n");
    let dir = write(&tree, LayoutKind::Files);

    let a = dir.path().join("A");
    assert!(!a.join("A.txt").exists());
    assert_eq!(fs::read_to_string(a.join("A_1.txt")).unwrap(), "text");
}

#[test]
fn test_unsafe_heading_names_are_sanitized() {
    assert_eq!(sanitize("In/Out"), "In_Out");
    assert_eq!(sanitize(r"C:\path"), "C:_path");
    assert_eq!(sanitize(""), "Untitled");
    assert_eq!(sanitize(".."), "_..");
    assert_eq!(sanitize("Plain title"), "Plain title");
    assert_eq!(sanitize(".mdtree.json"), "_.mdtree.json");

    let tree = parse("# In/Out\nx\n");
    let dir = write(&tree, LayoutKind::Folders);
    assert!(dir.path().join("In_Out").join("In_Out.txt").is_file());
}

#[test]
fn test_count_artifacts_per_layout() {
    // A(body) -> B(body), C ; D
    let tree = parse("# A\nfoo\n## B\nbar\n## C\n# D\n");

    // Folders: 4 directories + 2 leaves.
    assert_eq!(count_artifacts(&tree, LayoutKind::Folders.layout()), 6);
    // Files: directory A + its body leaf + leaves B, C, D.
    assert_eq!(count_artifacts(&tree, LayoutKind::Files.layout()), 5);
}

#[test]
fn test_io_failure_is_reported() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "occupied").unwrap();

    let tree = parse("# A\n");
    let err = serialize(
        &tree,
        &blocker,
        LayoutKind::Folders.layout(),
        "txt",
        &Pacer::off(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Io { .. }), "got {err:?}");
}

#[test]
fn test_missing_document_is_input_unavailable() {
    let dir = TempDir::new().unwrap();
    let err = read_document(&dir.path().join("absent.md")).unwrap_err();
    assert!(matches!(err, Error::InputUnavailable { .. }), "got {err:?}");
}

#[test]
fn test_pacer_sleeps_only_when_enabled() {
    assert_eq!(Pacer::off().delay(), None);

    let pacer = Pacer::new(Some(Duration::from_millis(5)));
    let start = Instant::now();
    pacer.pause();
    assert!(start.elapsed() >= Duration::from_millis(5));
}
