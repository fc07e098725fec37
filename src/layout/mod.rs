//! Commit graph layout: topological leveling and 2D positioning.
//!
//! The layout is a pure function of the commit/branch snapshot and the
//! geometry settings. Every commit is assigned a *level*, the length of the
//! longest parent chain from a root commit; levels become columns on the
//! canvas and commits within a level are stacked in input order.

use crate::graph::{BranchInfo, CommitInfo};
use crate::settings::LayoutSettings;
use serde_derive::Serialize;
use std::collections::{HashMap, HashSet};

pub mod svg;

/// A positioned commit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub hash: String,
    pub level: usize,
    pub x: f32,
    pub y: f32,
    /// The commit the client selected, if any.
    pub selected: bool,
    /// At least one branch points at this commit.
    pub decorated: bool,
}

/// A straight line from a parent commit to one of its children.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub parent: String,
    pub child: String,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    /// Either endpoint is the selected commit.
    pub highlighted: bool,
}

/// A branch name anchored next to its target commit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub is_current: bool,
}

/// The complete drawable layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub labels: Vec<Label>,
}

/// Level computation state for a single layout pass.
///
/// `in_progress` breaks cycles: a hash revisited while its own level is
/// being computed contributes 0 to the maximum instead of recursing.
/// Cycles cannot occur in a valid commit DAG, but malformed input must
/// not hang the layout.
struct LevelContext<'a> {
    index: HashMap<&'a str, &'a CommitInfo>,
    levels: HashMap<&'a str, usize>,
    in_progress: HashSet<&'a str>,
}

impl<'a> LevelContext<'a> {
    fn new(commits: &'a [CommitInfo]) -> Self {
        Self {
            index: commits.iter().map(|c| (c.hash.as_str(), c)).collect(),
            levels: HashMap::new(),
            in_progress: HashSet::new(),
        }
    }

    /// Longest path from a root to `hash`, memoized.
    ///
    /// Parents missing from the snapshot are skipped; a commit with no
    /// resolvable parents is a root at level 0.
    fn level_of(&mut self, hash: &'a str) -> usize {
        if let Some(&level) = self.levels.get(hash) {
            return level;
        }
        if !self.in_progress.insert(hash) {
            return 0;
        }

        let level = match self.index.get(hash).copied() {
            Some(info) => {
                let parents: Vec<&'a str> = info
                    .parents
                    .iter()
                    .map(String::as_str)
                    .filter(|parent| self.index.contains_key(parent))
                    .collect();
                if parents.is_empty() {
                    0
                } else {
                    let mut max = 0;
                    for parent in parents {
                        max = max.max(self.level_of(parent));
                    }
                    max + 1
                }
            }
            None => 0,
        };

        self.in_progress.remove(hash);
        self.levels.insert(hash, level);
        level
    }
}

/// Compute positions, edges and branch labels for a snapshot.
///
/// All levels are spread over `width` between the horizontal margins, so the
/// whole graph fits the canvas regardless of its depth. Slot order within a
/// level follows the input order of `commits`; crossing edges for complex
/// merge topologies are accepted. Dangling parent hashes and branch targets
/// are skipped silently.
pub fn compute_layout(
    commits: &[CommitInfo],
    branches: &[BranchInfo],
    settings: &LayoutSettings,
    width: f32,
    selected: Option<&str>,
) -> Layout {
    if commits.is_empty() {
        return Layout::default();
    }

    let mut context = LevelContext::new(commits);
    let mut max_level = 0;
    let levels: Vec<usize> = commits
        .iter()
        .map(|commit| {
            let level = context.level_of(&commit.hash);
            max_level = max_level.max(level);
            level
        })
        .collect();

    let level_width =
        (width - settings.margin_left - settings.margin_right) / (max_level + 1) as f32;

    let mut slots: HashMap<usize, usize> = HashMap::new();
    let mut positions: HashMap<&str, (f32, f32)> = HashMap::new();
    let mut nodes = Vec::with_capacity(commits.len());
    for (commit, &level) in commits.iter().zip(&levels) {
        let slot = slots.entry(level).or_insert(0);
        let x = settings.margin_left + level as f32 * level_width;
        let y = settings.margin_top + *slot as f32 * settings.commit_spacing;
        *slot += 1;
        positions.insert(commit.hash.as_str(), (x, y));
        nodes.push(Node {
            hash: commit.hash.clone(),
            level,
            x,
            y,
            selected: selected == Some(commit.hash.as_str()),
            decorated: !commit.branches.is_empty(),
        });
    }

    let mut edges = Vec::new();
    for commit in commits {
        let (x2, y2) = match positions.get(commit.hash.as_str()) {
            Some(&position) => position,
            None => continue,
        };
        for parent in &commit.parents {
            if let Some(&(x1, y1)) = positions.get(parent.as_str()) {
                let highlighted = selected
                    .map(|s| s == commit.hash.as_str() || s == parent.as_str())
                    .unwrap_or(false);
                edges.push(Edge {
                    parent: parent.clone(),
                    child: commit.hash.clone(),
                    x1,
                    y1,
                    x2,
                    y2,
                    highlighted,
                });
            }
        }
    }

    let mut labels = Vec::new();
    for branch in branches {
        if let Some(&(x, y)) = positions.get(branch.commit.as_str()) {
            labels.push(Label {
                name: branch.name.clone(),
                x: x + settings.label_offset_x,
                y: y + settings.label_offset_y,
                is_current: branch.is_current,
            });
        }
    }

    Layout {
        nodes,
        edges,
        labels,
    }
}
