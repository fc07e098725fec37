//! HTTP API exposing repository snapshots, layouts and branch management.
//!
//! Endpoints mirror what the single-page frontend consumes: JSON over POST,
//! with the repository path carried in every request body. Each request opens
//! the repository on its own; there is no shared state beyond the settings.

pub mod git;
pub mod repo;

use crate::settings::Settings;
use anyhow::Result;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

pub struct AppState {
    pub settings: Settings,
}

pub async fn serve(state: Arc<AppState>) -> Result<()> {
    let addr = format!(
        "{}:{}",
        state.settings.server.host, state.settings.server.port
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on http://{}", listener.local_addr()?);

    let router = build_router(state);
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/repo/validate", post(repo::validate))
        .route("/api/git/info", post(git::info))
        .route("/api/git/history", post(git::history))
        .route("/api/git/branches", post(git::branches))
        .route("/api/git/commit", post(git::commit))
        .route("/api/git/file", post(git::file))
        .route("/api/git/tree", post(git::tree))
        .route("/api/git/branch/delete", post(git::delete_branch))
        .route("/api/git/branch/rename", post(git::rename_branch))
        .route("/api/git/checkout/commit", post(git::checkout_commit))
        .route("/api/git/checkout/branch", post(git::checkout_branch))
        .route("/api/git/graph", post(git::graph))
        .route("/api/git/graph/svg", get(git::graph_svg))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{commit_file, init_repo};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_router() -> Router {
        build_router(Arc::new(AppState {
            settings: Settings::default(),
        }))
    }

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = test_router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap();
        (status, value)
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = test_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn validate_accepts_a_repository() {
        let (dir, repo) = init_repo();
        commit_file(&repo, "a.txt", "first");

        let (status, body) =
            post_json("/api/repo/validate", json!({ "repoPath": dir.path() })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], json!(true));
    }

    #[tokio::test]
    async fn validate_rejects_missing_path() {
        let (status, body) =
            post_json("/api/repo/validate", json!({ "repoPath": "/no/such/path" })).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn validate_rejects_non_repository() {
        let dir = tempfile::tempdir().unwrap();
        let (status, _body) =
            post_json("/api/repo/validate", json!({ "repoPath": dir.path() })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn info_lists_commits_and_branches() {
        let (dir, repo) = init_repo();
        commit_file(&repo, "a.txt", "first");
        commit_file(&repo, "b.txt", "second");

        let (status, body) = post_json("/api/git/info", json!({ "repoPath": dir.path() })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalCommits"], json!(2));
        assert_eq!(body["commits"].as_array().unwrap().len(), 2);
        assert_eq!(body["branches"].as_array().unwrap().len(), 1);
        assert!(body["currentBranch"].is_string());
    }

    #[tokio::test]
    async fn history_honors_limit() {
        let (dir, repo) = init_repo();
        for i in 0..4 {
            commit_file(&repo, "a.txt", &format!("commit {}", i));
        }

        let (status, body) = post_json(
            "/api/git/history",
            json!({ "repoPath": dir.path(), "limit": 2 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn commit_rejects_malformed_hash() {
        let (dir, repo) = init_repo();
        commit_file(&repo, "a.txt", "first");

        let (status, body) = post_json(
            "/api/git/commit",
            json!({ "repoPath": dir.path(), "hash": "not-a-hash" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn graph_returns_a_layout() {
        let (dir, repo) = init_repo();
        commit_file(&repo, "a.txt", "first");
        commit_file(&repo, "b.txt", "second");

        let (status, body) = post_json("/api/git/graph", json!({ "repoPath": dir.path() })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(body["edges"].as_array().unwrap().len(), 1);
        assert_eq!(body["labels"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn graph_svg_renders() {
        let (dir, repo) = init_repo();
        commit_file(&repo, "a.txt", "first");

        let uri = format!("/api/git/graph/svg?repo={}", dir.path().display());
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = test_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "image/svg+xml"
        );
    }

    #[tokio::test]
    async fn branch_delete_roundtrip() {
        let (dir, repo) = init_repo();
        let c1 = commit_file(&repo, "a.txt", "first");
        let commit = repo.find_commit(c1).unwrap();
        repo.branch("feature", &commit, false).unwrap();
        commit_file(&repo, "b.txt", "second");

        let (status, body) = post_json(
            "/api/git/branch/delete",
            json!({ "repoPath": dir.path(), "branchName": "feature" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));

        let (status, _body) = post_json(
            "/api/git/branch/delete",
            json!({ "repoPath": dir.path(), "branchName": "feature" }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
