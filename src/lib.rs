//! Web backend to visualize a Git repository's commit graph and branch
//! structure, with a thin API for branch management and content browsing.

use git2::Repository;
use std::path::Path;

pub mod api;
pub mod config;
pub mod error;
pub mod graph;
pub mod layout;
pub mod repo;
pub mod settings;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::Error;

/// Opens the repository at `path`, or in any of its parent directories.
pub fn open_repo<P: AsRef<Path>>(path: P) -> Result<Repository, Error> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::PathNotFound(path.to_path_buf()));
    }
    Repository::discover(path).map_err(|err| {
        if err.code() == git2::ErrorCode::NotFound {
            Error::NotARepository(path.to_path_buf())
        } else {
            Error::Git(err)
        }
    })
}
