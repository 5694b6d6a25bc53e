use std::fs;

use prism_project::{FileTree, NodeKind, Project, ProjectStore, TreeError};
use tempfile::tempdir;

#[test]
fn stored_project_opens_as_a_tree() {
    let dir = tempdir().unwrap();
    let demo = dir.path().join("demo");
    fs::create_dir_all(demo.join("pkg")).unwrap();
    fs::write(demo.join("a.py"), "").unwrap();

    let store_path = dir.path().join("projects.json");
    let mut store = ProjectStore::load(&store_path).unwrap();
    store.add(Project::from_folder(&demo)).unwrap();

    let reloaded = ProjectStore::load(&store_path).unwrap();
    let project = &reloaded.projects()[0];
    assert_eq!(project.name, "demo");

    let tree = FileTree::open(&project.path).unwrap();
    let rows = tree.visible_rows().unwrap();
    let listing: Vec<_> = rows
        .iter()
        .map(|row| (row.node.name.as_str(), row.node.kind))
        .collect();
    assert_eq!(
        listing,
        vec![("pkg", NodeKind::Directory), ("a.py", NodeKind::File)]
    );
}

#[test]
fn deleted_project_folder_cannot_be_opened() {
    let dir = tempdir().unwrap();
    let gone = dir.path().join("gone");
    assert!(matches!(FileTree::open(&gone), Err(TreeError::NotFound(_))));
}

#[test]
fn create_and_delete_round_trip_bumps_revision() {
    let dir = tempdir().unwrap();
    let mut tree = FileTree::open(dir.path()).unwrap();
    let before = tree.revision();

    let created = tree.create_file("notes.txt").unwrap();
    assert!(created.path().is_file());
    assert_eq!(tree.delete(created.path()).unwrap(), NodeKind::File);
    assert!(!created.path().exists());
    assert_eq!(tree.revision(), before + 2);
}
