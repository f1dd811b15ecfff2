pub mod discovery;
pub mod git;
pub mod probe;

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Fully-qualified repository name: `owner.repo` for GitHub,
/// `organization.project.repo` for Azure DevOps. Unique across providers
/// and used as every registry and cache key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoName(String);

impl RepoName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RepoName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// Hosting provider a repository belongs to, with its provider-specific
/// identity parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Provider {
    #[serde(rename = "github")]
    GitHub {
        owner: String,
        repo: String,
    },
    #[serde(rename = "azure-devops")]
    AzureDevOps {
        organization: String,
        project: String,
        repo: String,
    },
}

impl Provider {
    /// The fully-qualified name this provider identity maps to.
    pub fn full_name(&self) -> RepoName {
        match self {
            Provider::GitHub { owner, repo } => RepoName(format!("{owner}.{repo}")),
            Provider::AzureDevOps {
                organization,
                project,
                repo,
            } => RepoName(format!("{organization}.{project}.{repo}")),
        }
    }

    /// Owner/repo naming for operations that talk to the GitHub API.
    /// Typed refusal on other variants instead of a downcast fault.
    pub fn github_owner_repo(&self) -> Result<(&str, &str)> {
        match self {
            Provider::GitHub { owner, repo } => Ok((owner, repo)),
            _ => Err(Error::UnsupportedProvider {
                repo: self.full_name(),
                required: "GitHub",
            }),
        }
    }
}

fn default_fetch_interval() -> u64 {
    60
}

/// One known repository. Cloned and dirty flags are derived by the prober
/// on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub provider: Provider,
    pub remote_url: String,
    pub local_path: PathBuf,
    /// Zero disables periodic fetching for this repository.
    #[serde(default = "default_fetch_interval")]
    pub min_fetch_interval_secs: u64,
    #[serde(default)]
    pub last_fetch: Option<DateTime<Utc>>,
}

impl Repository {
    pub fn new(provider: Provider, remote_url: impl Into<String>, local_path: PathBuf) -> Self {
        Self {
            provider,
            remote_url: remote_url.into(),
            local_path,
            min_fetch_interval_secs: default_fetch_interval(),
            last_fetch: None,
        }
    }

    pub fn name(&self) -> RepoName {
        self.provider.full_name()
    }

    /// Whether the minimum fetch interval has elapsed since the last fetch.
    pub fn fetch_due(&self, now: DateTime<Utc>) -> bool {
        if self.min_fetch_interval_secs == 0 {
            return false;
        }
        match self.last_fetch {
            Some(last) => {
                now.signed_duration_since(last)
                    > chrono::Duration::seconds(self.min_fetch_interval_secs as i64)
            }
            None => true,
        }
    }
}

/// The set of known repositories, keyed by fully-qualified name.
/// Repositories are upserted as they are discovered and only dropped on a
/// full reload of the options file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    repos: BTreeMap<RepoName, Repository>,
}

impl Registry {
    /// Insert or replace a repository under its derived name.
    pub fn upsert(&mut self, repo: Repository) -> RepoName {
        let name = repo.name();
        self.repos.insert(name.clone(), repo);
        name
    }

    pub fn get(&self, name: &RepoName) -> Result<&Repository> {
        self.repos
            .get(name)
            .ok_or_else(|| Error::UnknownRepo(name.clone()))
    }

    pub fn get_mut(&mut self, name: &RepoName) -> Result<&mut Repository> {
        self.repos
            .get_mut(name)
            .ok_or_else(|| Error::UnknownRepo(name.clone()))
    }

    pub fn contains(&self, name: &RepoName) -> bool {
        self.repos.contains_key(name)
    }

    pub fn remove(&mut self, name: &RepoName) -> Option<Repository> {
        self.repos.remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RepoName, &Repository)> {
        self.repos.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &RepoName> {
        self.repos.keys()
    }

    pub fn len(&self) -> usize {
        self.repos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }
}
