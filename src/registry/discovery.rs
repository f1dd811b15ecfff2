use std::path::Path;

use git2::Repository as GitRepo;
use log::debug;
use regex::Regex;
use walkdir::WalkDir;

use super::{Provider, Repository};

/// Parse a remote URL into a provider identity. Returns `None` for hosts
/// the tool does not understand.
pub fn provider_from_remote_url(url: &str) -> Option<Provider> {
    let github_https = Regex::new(r"^https://github\.com/([^/]+)/([^/]+?)(?:\.git)?/?$").unwrap();
    let github_ssh = Regex::new(r"^git@github\.com:([^/]+)/([^/]+?)(?:\.git)?$").unwrap();
    let azure = Regex::new(
        r"^https://dev\.azure\.com/([^/]+)/([^/]+)/_git/([^/]+?)(?:\.git)?/?$",
    )
    .unwrap();
    let azure_legacy =
        Regex::new(r"^https://([^./]+)\.visualstudio\.com/([^/]+)/_git/([^/]+?)/?$").unwrap();

    if let Some(caps) = github_https.captures(url).or_else(|| github_ssh.captures(url)) {
        return Some(Provider::GitHub {
            owner: caps[1].to_string(),
            repo: caps[2].to_string(),
        });
    }

    if let Some(caps) = azure.captures(url).or_else(|| azure_legacy.captures(url)) {
        return Some(Provider::AzureDevOps {
            organization: caps[1].to_string(),
            project: caps[2].to_string(),
            repo: caps[3].to_string(),
        });
    }

    None
}

/// Scan the dev directory for git clones and build a registry entry from
/// each one's `origin` remote. Clones with no origin or an unrecognized
/// host are skipped.
pub fn scan_dev_directory(dev_dir: &Path) -> Vec<Repository> {
    let mut found = Vec::new();

    let mut walker = WalkDir::new(dev_dir).min_depth(1).into_iter();
    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => continue,
        };
        if entry.file_type().is_dir() && entry.file_name() == ".git" {
            if let Some(workdir) = entry.path().parent() {
                if let Some(repo) = repository_from_clone(workdir) {
                    found.push(repo);
                }
            }
            // Nothing of interest below a .git directory.
            walker.skip_current_dir();
        }
    }

    found
}

fn repository_from_clone(workdir: &Path) -> Option<Repository> {
    let repo = GitRepo::open(workdir).ok()?;
    let remote = repo.find_remote("origin").ok()?;
    let url = remote.url()?.to_string();

    match provider_from_remote_url(&url) {
        Some(provider) => Some(Repository::new(provider, url, workdir.to_path_buf())),
        None => {
            debug!("skipping {}: unrecognized remote {url}", workdir.display());
            None
        }
    }
}
