//! Handlers for the `/api/git` routes.

use crate::api::AppState;
use crate::error::Error;
use crate::graph::{BranchInfo, CommitInfo, GitGraph, RepoInfo};
use crate::layout::{self, Layout};
use crate::repo;
use crate::settings::Settings;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use lazy_static::lazy_static;
use regex::Regex;
use serde_derive::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

lazy_static! {
    static ref HASH_PATTERN: Regex = Regex::new(r"^[0-9a-fA-F]{4,40}$").unwrap();
}

fn checked_hash(hash: &str) -> Result<&str, Error> {
    if HASH_PATTERN.is_match(hash) {
        Ok(hash)
    } else {
        Err(Error::InvalidHash(hash.to_string()))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoRequest {
    pub repo_path: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRequest {
    pub repo_path: String,
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRequest {
    pub repo_path: String,
    pub hash: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRequest {
    pub repo_path: String,
    pub file_path: String,
    pub commit_hash: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    pub content: String,
    pub file_path: String,
    pub commit_hash: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeRequest {
    pub repo_path: String,
    pub commit_hash: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteBranchRequest {
    pub repo_path: String,
    pub branch_name: String,
    #[serde(default)]
    pub force: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameBranchRequest {
    pub repo_path: String,
    pub old_name: String,
    pub new_name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutBranchRequest {
    pub repo_path: String,
    pub branch_name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphRequest {
    pub repo_path: String,
    pub limit: Option<usize>,
    pub selected: Option<String>,
    pub width: Option<f32>,
}

#[derive(Deserialize)]
pub struct SvgQuery {
    pub repo: String,
    pub selected: Option<String>,
    pub limit: Option<usize>,
}

fn snapshot(settings: &Settings, path: &str, limit: Option<usize>) -> Result<GitGraph, Error> {
    GitGraph::new(path, limit.unwrap_or(settings.server.commit_limit))
}

fn computed_layout(settings: &Settings, graph: &GitGraph, selected: Option<&str>, width: Option<f32>) -> Layout {
    layout::compute_layout(
        &graph.commits,
        &graph.branches,
        &settings.layout,
        width.unwrap_or(settings.layout.canvas_width),
        selected,
    )
}

pub async fn info(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RepoRequest>,
) -> Result<Json<RepoInfo>, Error> {
    let graph = snapshot(&state.settings, &req.repo_path, None)?;
    Ok(Json(graph.info()))
}

pub async fn history(
    State(state): State<Arc<AppState>>,
    Json(req): Json<HistoryRequest>,
) -> Result<Json<Vec<CommitInfo>>, Error> {
    let mut graph = snapshot(&state.settings, &req.repo_path, req.limit)?;
    Ok(Json(std::mem::take(&mut graph.commits)))
}

pub async fn branches(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RepoRequest>,
) -> Result<Json<Vec<BranchInfo>>, Error> {
    let mut graph = snapshot(&state.settings, &req.repo_path, None)?;
    Ok(Json(std::mem::take(&mut graph.branches)))
}

pub async fn commit(
    Json(req): Json<CommitRequest>,
) -> Result<Json<repo::CommitDetails>, Error> {
    let repository = crate::open_repo(&req.repo_path)?;
    let details = repo::commit_details(&repository, checked_hash(&req.hash)?)?;
    Ok(Json(details))
}

pub async fn file(Json(req): Json<FileRequest>) -> Result<Json<FileResponse>, Error> {
    let repository = crate::open_repo(&req.repo_path)?;
    let content = repo::file_at_commit(&repository, &req.file_path, checked_hash(&req.commit_hash)?)?;
    Ok(Json(FileResponse {
        content,
        file_path: req.file_path,
        commit_hash: req.commit_hash,
    }))
}

pub async fn tree(Json(req): Json<TreeRequest>) -> Result<Json<Vec<String>>, Error> {
    let repository = crate::open_repo(&req.repo_path)?;
    let hash = match &req.commit_hash {
        Some(hash) => Some(checked_hash(hash)?),
        None => None,
    };
    Ok(Json(repo::file_tree(&repository, hash)?))
}

pub async fn delete_branch(Json(req): Json<DeleteBranchRequest>) -> Result<Json<Value>, Error> {
    let repository = crate::open_repo(&req.repo_path)?;
    repo::delete_branch(&repository, &req.branch_name, req.force)?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Branch {} deleted successfully", req.branch_name),
    })))
}

pub async fn rename_branch(Json(req): Json<RenameBranchRequest>) -> Result<Json<Value>, Error> {
    let repository = crate::open_repo(&req.repo_path)?;
    repo::rename_branch(&repository, &req.old_name, &req.new_name)?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Branch {} renamed to {}", req.old_name, req.new_name),
    })))
}

pub async fn checkout_commit(Json(req): Json<CommitRequest>) -> Result<Json<Value>, Error> {
    let repository = crate::open_repo(&req.repo_path)?;
    repo::checkout_commit(&repository, checked_hash(&req.hash)?)?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Checked out commit {}", req.hash),
    })))
}

pub async fn checkout_branch(Json(req): Json<CheckoutBranchRequest>) -> Result<Json<Value>, Error> {
    let repository = crate::open_repo(&req.repo_path)?;
    repo::checkout_branch(&repository, &req.branch_name)?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Checked out branch {}", req.branch_name),
    })))
}

pub async fn graph(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GraphRequest>,
) -> Result<Json<Layout>, Error> {
    let graph = snapshot(&state.settings, &req.repo_path, req.limit)?;
    let layout = computed_layout(&state.settings, &graph, req.selected.as_deref(), req.width);
    Ok(Json(layout))
}

pub async fn graph_svg(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SvgQuery>,
) -> Result<impl IntoResponse, Error> {
    let graph = snapshot(&state.settings, &query.repo, query.limit)?;
    let layout = computed_layout(&state.settings, &graph, query.selected.as_deref(), None);
    let svg = crate::layout::svg::print_svg(&layout, &state.settings.layout)?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}

#[cfg(test)]
mod tests {
    use super::checked_hash;

    #[test]
    fn hash_validation() {
        assert!(checked_hash("abc123").is_ok());
        assert!(checked_hash("ABCDEF00").is_ok());
        assert!(checked_hash(&"a".repeat(40)).is_ok());
        assert!(checked_hash("abc").is_err());
        assert!(checked_hash(&"a".repeat(41)).is_err());
        assert!(checked_hash("main").is_err());
        assert!(checked_hash("abc12g").is_err());
    }
}
