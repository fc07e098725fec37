//! Scratch repositories for tests.

use git2::{Oid, Repository};
use std::path::Path;
use tempfile::TempDir;

/// Create an empty repository in a temporary directory.
pub fn init_repo() -> (TempDir, Repository) {
    let dir = tempfile::tempdir().unwrap();
    let repo = Repository::init(dir.path()).unwrap();
    let mut config = repo.config().unwrap();
    config.set_str("user.name", "tester").unwrap();
    config.set_str("user.email", "tester@example.com").unwrap();
    (dir, repo)
}

/// Write `text` to `file`, stage it, and commit with `text` as the message.
/// The commit's parent is the current HEAD, if any.
pub fn commit_file(repo: &Repository, file: &str, text: &str) -> Oid {
    let workdir = repo.workdir().unwrap();
    std::fs::write(workdir.join(file), text).unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new(file)).unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();

    let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    let signature = repo.signature().unwrap();
    repo.commit(Some("HEAD"), &signature, &signature, text, &tree, &parents)
        .unwrap()
}
