//! Branch management and content browsing on an open repository.

use crate::error::Error;
use crate::graph::format_time;
use git2::build::CheckoutBuilder;
use git2::{BranchType, Delta, ObjectType, Repository, TreeWalkMode, TreeWalkResult};
use itertools::Itertools;
use serde_derive::Serialize;
use std::path::Path;

/// Details of a single commit, including the files it touched
/// relative to its first parent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitDetails {
    pub hash: String,
    pub author: String,
    pub email: String,
    pub date: String,
    pub subject: String,
    pub body: String,
    pub files: Vec<FileChange>,
    pub files_changed: usize,
    pub insertions: usize,
    pub deletions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChange {
    pub path: String,
    pub status: ChangeStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
    Other,
}

/// Check out a local branch, updating the working tree and HEAD.
pub fn checkout_branch(repository: &Repository, name: &str) -> Result<(), Error> {
    let branch = repository
        .find_branch(name, BranchType::Local)
        .map_err(|_| Error::BranchNotFound(name.to_string()))?;
    let reference = branch.into_reference();
    let object = reference.peel(ObjectType::Commit)?;

    let mut checkout = CheckoutBuilder::new();
    checkout.safe();
    repository.checkout_tree(&object, Some(&mut checkout))?;
    match reference.name() {
        Some(refname) => repository.set_head(refname)?,
        None => repository.set_head_detached(object.id())?,
    }
    Ok(())
}

/// Check out a commit, leaving the repository with a detached HEAD.
pub fn checkout_commit(repository: &Repository, hash: &str) -> Result<(), Error> {
    let commit = resolve_commit(repository, hash)?;
    let mut checkout = CheckoutBuilder::new();
    checkout.safe();
    repository.checkout_tree(commit.as_object(), Some(&mut checkout))?;
    repository.set_head_detached(commit.id())?;
    Ok(())
}

/// Delete a local branch. Without `force`, a branch whose tip is not
/// reachable from HEAD is refused.
pub fn delete_branch(repository: &Repository, name: &str, force: bool) -> Result<(), Error> {
    let mut branch = repository
        .find_branch(name, BranchType::Local)
        .map_err(|_| Error::BranchNotFound(name.to_string()))?;
    if branch.is_head() {
        return Err(Error::BranchCheckedOut(name.to_string()));
    }

    if !force {
        let tip = branch
            .get()
            .target()
            .ok_or_else(|| Error::BranchNotFound(name.to_string()))?;
        let head = repository.head()?.peel_to_commit()?.id();
        let merged = tip == head || repository.graph_descendant_of(head, tip)?;
        if !merged {
            return Err(Error::BranchNotMerged(name.to_string()));
        }
    }

    branch.delete()?;
    Ok(())
}

/// Rename a local branch; fails if the new name already exists.
pub fn rename_branch(repository: &Repository, old_name: &str, new_name: &str) -> Result<(), Error> {
    let mut branch = repository
        .find_branch(old_name, BranchType::Local)
        .map_err(|_| Error::BranchNotFound(old_name.to_string()))?;
    branch.rename(new_name, false)?;
    Ok(())
}

/// Details of a commit, with the diff against its first parent
/// (or the empty tree for a root commit).
pub fn commit_details(repository: &Repository, hash: &str) -> Result<CommitDetails, Error> {
    let commit = resolve_commit(repository, hash)?;
    let tree = commit.tree()?;
    let parent_tree = match commit.parent(0) {
        Ok(parent) => Some(parent.tree()?),
        Err(_) => None,
    };

    let diff = repository.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;
    let stats = diff.stats()?;
    let files = diff
        .deltas()
        .map(|delta| {
            let path = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_default();
            let status = match delta.status() {
                Delta::Added => ChangeStatus::Added,
                Delta::Modified => ChangeStatus::Modified,
                Delta::Deleted => ChangeStatus::Deleted,
                Delta::Renamed => ChangeStatus::Renamed,
                _ => ChangeStatus::Other,
            };
            FileChange { path, status }
        })
        .collect();

    let author = commit.author();
    Ok(CommitDetails {
        hash: commit.id().to_string(),
        author: author.name().unwrap_or("").to_string(),
        email: author.email().unwrap_or("").to_string(),
        date: format_time(commit.time()),
        subject: commit.summary().unwrap_or("").to_string(),
        body: commit.body().unwrap_or("").to_string(),
        files,
        files_changed: stats.files_changed(),
        insertions: stats.insertions(),
        deletions: stats.deletions(),
    })
}

/// Content of a file as of a given commit.
pub fn file_at_commit(repository: &Repository, path: &str, hash: &str) -> Result<String, Error> {
    let commit = resolve_commit(repository, hash)?;
    let tree = commit.tree()?;
    let entry = tree.get_path(Path::new(path)).map_err(|_| Error::FileNotFound {
        commit: hash.to_string(),
        path: path.to_string(),
    })?;
    let blob = entry
        .to_object(repository)?
        .into_blob()
        .map_err(|_| Error::FileNotFound {
            commit: hash.to_string(),
            path: path.to_string(),
        })?;
    Ok(String::from_utf8_lossy(blob.content()).into_owned())
}

/// All file paths in the tree of a commit (HEAD if none is given).
pub fn file_tree(repository: &Repository, hash: Option<&str>) -> Result<Vec<String>, Error> {
    let commit = match hash {
        Some(hash) => resolve_commit(repository, hash)?,
        None => repository.head()?.peel_to_commit()?,
    };
    let tree = commit.tree()?;

    let mut paths = Vec::new();
    tree.walk(TreeWalkMode::PreOrder, |root, entry| {
        if entry.kind() == Some(ObjectType::Blob) {
            if let Some(name) = entry.name() {
                paths.push(format!("{}{}", root, name));
            }
        }
        TreeWalkResult::Ok
    })?;
    Ok(paths.into_iter().sorted().collect())
}

fn resolve_commit<'r>(repository: &'r Repository, hash: &str) -> Result<git2::Commit<'r>, Error> {
    let object = repository
        .revparse_single(hash)
        .map_err(|_| Error::CommitNotFound(hash.to_string()))?;
    object
        .peel_to_commit()
        .map_err(|_| Error::CommitNotFound(hash.to_string()))
}
