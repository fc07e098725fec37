//! Repository snapshots: commits, branches and tags as the graph sees them.

use crate::error::Error;
use chrono::{TimeZone, Utc};
use git2::{BranchType, Commit, Oid, Repository};
use serde_derive::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// A snapshot of a repository's commit graph.
///
/// Built fresh per request; commits are listed in reverse-chronological
/// topological order, starting from every local and remote branch tip.
pub struct GitGraph {
    pub repository: Repository,
    pub commits: Vec<CommitInfo>,
    pub branches: Vec<BranchInfo>,
    pub current_branch: String,
}

impl GitGraph {
    pub fn new(path: &str, limit: usize) -> Result<Self, Error> {
        let repository = crate::open_repo(path)?;

        let current_branch = current_branch_name(&repository);
        let branches = collect_branches(&repository, current_branch.as_deref())?;

        let mut branch_map: HashMap<String, Vec<String>> = HashMap::new();
        for branch in &branches {
            branch_map
                .entry(branch.commit.clone())
                .or_default()
                .push(branch.name.clone());
        }
        let tag_map = collect_tags(&repository);

        let mut revwalk = repository.revwalk()?;
        revwalk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)?;
        if repository.head().is_ok() {
            revwalk.push_head()?;
        }
        for branch in &branches {
            if let Ok(oid) = Oid::from_str(&branch.commit) {
                let _ = revwalk.push(oid);
            }
        }

        let mut commits = Vec::new();
        for oid in revwalk.take(limit) {
            let oid = oid?;
            let commit = repository.find_commit(oid)?;
            commits.push(CommitInfo::new(&commit, &branch_map, &tag_map));
        }

        debug!(
            "collected {} commits and {} branches from {}",
            commits.len(),
            branches.len(),
            path
        );

        Ok(GitGraph {
            repository,
            commits,
            branches,
            current_branch: current_branch.unwrap_or_else(|| "HEAD".to_string()),
        })
    }

    /// Serializable summary of the snapshot.
    pub fn info(&self) -> RepoInfo {
        let path = self
            .repository
            .workdir()
            .unwrap_or_else(|| self.repository.path())
            .to_string_lossy()
            .to_string();
        RepoInfo {
            path,
            current_branch: self.current_branch.clone(),
            branches: self.branches.clone(),
            total_commits: self.commits.len(),
            commits: self.commits.clone(),
        }
    }
}

/// A single commit as exposed to the layout engine and the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitInfo {
    pub hash: String,
    pub message: String,
    pub author: String,
    pub date: String,
    pub parents: Vec<String>,
    pub branches: Vec<String>,
    pub tags: Vec<String>,
}

impl CommitInfo {
    fn new(
        commit: &Commit,
        branches: &HashMap<String, Vec<String>>,
        tags: &HashMap<String, Vec<String>>,
    ) -> Self {
        let hash = commit.id().to_string();
        CommitInfo {
            message: commit.summary().unwrap_or("").to_string(),
            author: commit.author().name().unwrap_or("").to_string(),
            date: format_time(commit.time()),
            parents: commit.parent_ids().map(|id| id.to_string()).collect(),
            branches: branches.get(&hash).cloned().unwrap_or_default(),
            tags: tags.get(&hash).cloned().unwrap_or_default(),
            hash,
        }
    }
}

/// A branch pointer. Remote branches are reduced to their short name;
/// a remote branch shadowed by a local branch of the same name is dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchInfo {
    pub name: String,
    pub commit: String,
    pub is_remote: bool,
    pub is_current: bool,
}

/// Full snapshot summary returned by the `info` endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoInfo {
    pub path: String,
    pub current_branch: String,
    pub branches: Vec<BranchInfo>,
    pub commits: Vec<CommitInfo>,
    pub total_commits: usize,
}

pub(crate) fn format_time(time: git2::Time) -> String {
    Utc.timestamp_opt(time.seconds(), 0)
        .single()
        .map(|t| t.to_rfc3339())
        .unwrap_or_default()
}

fn current_branch_name(repository: &Repository) -> Option<String> {
    let head = repository.head().ok()?;
    if head.is_branch() {
        head.shorthand().map(str::to_string)
    } else {
        None
    }
}

fn collect_branches(
    repository: &Repository,
    current: Option<&str>,
) -> Result<Vec<BranchInfo>, Error> {
    let mut branches = Vec::new();

    for entry in repository.branches(Some(BranchType::Local))? {
        let (branch, _) = entry?;
        let name = match branch.name()? {
            Some(name) => name.to_string(),
            None => continue,
        };
        let target = match branch.get().target() {
            Some(target) => target,
            None => continue,
        };
        let is_current = current == Some(name.as_str());
        branches.push(BranchInfo {
            name,
            commit: target.to_string(),
            is_remote: false,
            is_current,
        });
    }

    for entry in repository.branches(Some(BranchType::Remote))? {
        let (branch, _) = entry?;
        let name = match branch.name()? {
            Some(name) => name.to_string(),
            None => continue,
        };
        if name.ends_with("/HEAD") {
            continue;
        }
        let target = match branch.get().target() {
            Some(target) => target,
            None => continue,
        };
        let short = name
            .split_once('/')
            .map(|(_, rest)| rest.to_string())
            .unwrap_or(name);
        if branches.iter().any(|b| !b.is_remote && b.name == short) {
            continue;
        }
        branches.push(BranchInfo {
            name: short,
            commit: target.to_string(),
            is_remote: true,
            is_current: false,
        });
    }

    Ok(branches)
}

/// Tags resolved to the commit they (eventually) point at.
/// Tags that cannot be resolved are skipped.
fn collect_tags(repository: &Repository) -> HashMap<String, Vec<String>> {
    let mut map: HashMap<String, Vec<String>> = HashMap::new();
    if let Ok(names) = repository.tag_names(None) {
        for name in names.iter().flatten() {
            if let Ok(object) = repository.revparse_single(&format!("refs/tags/{}", name)) {
                if let Ok(commit) = object.peel_to_commit() {
                    map.entry(commit.id().to_string())
                        .or_default()
                        .push(name.to_string());
                }
            }
        }
    }
    map
}
