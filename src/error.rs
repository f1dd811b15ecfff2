use std::path::PathBuf;

use thiserror::Error;

use crate::registry::RepoName;

/// Core error taxonomy.
///
/// Batch operations (similarity refresh, propagation) treat per-unit
/// failures as skips; mutation failures (`FileWrite`, `FileCopy`,
/// `FileDelete`) are surfaced to the user because they leave a
/// user-requested action incomplete.
#[derive(Debug, Error)]
pub enum Error {
    /// The local path does not hold a valid repository clone.
    #[error("{} is not a cloned repository", path.display())]
    RepositoryNotCloned { path: PathBuf },

    #[error("failed to write {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to copy {} to {}: {source}", src.display(), dst.display())]
    FileCopy {
        src: PathBuf,
        dst: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to delete {}: {source}", path.display())]
    FileDelete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An operation needed provider-specific naming that this repository's
    /// provider does not offer. A contract violation, not a user error.
    #[error("{repo} is not a {required} repository")]
    UnsupportedProvider {
        repo: RepoName,
        required: &'static str,
    },

    #[error("unknown repository: {0}")]
    UnknownRepo(RepoName),

    #[error(transparent)]
    Git(#[from] git2::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
