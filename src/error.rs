//! Error type shared by the git layer and the HTTP API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;

/// All failures the backend reports to clients.
#[derive(Error, Debug)]
pub enum Error {
    #[error("repository path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("path is not a Git repository: {0}")]
    NotARepository(PathBuf),

    #[error("branch not found: {0}")]
    BranchNotFound(String),

    #[error("branch '{0}' is not fully merged; use force to delete it anyway")]
    BranchNotMerged(String),

    #[error("cannot delete the currently checked out branch '{0}'")]
    BranchCheckedOut(String),

    #[error("commit not found: {0}")]
    CommitNotFound(String),

    #[error("file not found at commit {commit}: {path}")]
    FileNotFound { commit: String, path: String },

    #[error("invalid commit hash: {0}")]
    InvalidHash(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::PathNotFound(_)
            | Error::BranchNotFound(_)
            | Error::CommitNotFound(_)
            | Error::FileNotFound { .. } => StatusCode::NOT_FOUND,
            Error::NotARepository(_)
            | Error::BranchNotMerged(_)
            | Error::BranchCheckedOut(_)
            | Error::InvalidHash(_)
            | Error::Git(_) => StatusCode::BAD_REQUEST,
            Error::Config(_) | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
