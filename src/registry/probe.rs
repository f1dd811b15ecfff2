use std::collections::BTreeSet;
use std::path::Path;

use git2::{Repository as GitRepo, StatusOptions};

use crate::error::{Error, Result};

/// Working-copy state for one repository, derived on demand and never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RepoStatus {
    pub cloned: bool,
    pub dirty: bool,
}

/// Whether `path` holds a valid repository clone. Probing yields a
/// boolean, not an error.
pub fn is_cloned(path: &Path) -> bool {
    GitRepo::open(path).is_ok()
}

/// Clone state plus dirtiness of the working copy. A status read failure
/// on a valid clone counts as clean rather than failing the probe.
pub fn probe(path: &Path) -> RepoStatus {
    let repo = match GitRepo::open(path) {
        Ok(repo) => repo,
        Err(_) => return RepoStatus::default(),
    };

    let mut options = StatusOptions::new();
    options.include_untracked(true);
    let dirty = repo
        .statuses(Some(&mut options))
        .map(|statuses| !statuses.is_empty())
        .unwrap_or(false);

    RepoStatus { cloned: true, dirty }
}

/// Relative paths of all tracked files, as recorded in the index. Paths
/// use `/` separators regardless of platform.
pub fn tracked_files(path: &Path) -> Result<BTreeSet<String>> {
    let repo = GitRepo::open(path).map_err(|_| Error::RepositoryNotCloned {
        path: path.to_path_buf(),
    })?;
    let index = repo.index()?;
    Ok(index
        .iter()
        .filter_map(|entry| String::from_utf8(entry.path).ok())
        .collect())
}
