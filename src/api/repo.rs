//! Handlers for the `/api/repo` routes.

use crate::api::git::RepoRequest;
use crate::error::Error;
use axum::Json;
use serde_derive::Serialize;

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub path: String,
}

/// Check that a path exists and points into a Git repository.
pub async fn validate(Json(req): Json<RepoRequest>) -> Result<Json<ValidateResponse>, Error> {
    crate::open_repo(&req.repo_path)?;
    Ok(Json(ValidateResponse {
        valid: true,
        path: req.repo_path,
    }))
}
