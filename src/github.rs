use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::process::Command;

use crate::registry::{Provider, Repository};

/// GitHub access goes through the gh CLI so the user's existing
/// authentication is reused; no tokens are handled here.
pub struct GitHubCli;

/// One remote repository as reported by `gh repo list`.
#[derive(Debug, Deserialize)]
pub struct RemoteRepo {
    pub name: String,
    pub url: String,
}

impl GitHubCli {
    /// Check if gh CLI is installed
    pub fn is_installed() -> bool {
        which::which("gh").is_ok()
    }

    /// Check if user is authenticated with GitHub
    pub async fn is_authenticated() -> Result<bool> {
        let output = Command::new("gh")
            .args(["auth", "status"])
            .output()
            .await
            .context("Failed to check gh auth status")?;

        Ok(output.status.success())
    }

    /// All repositories for one owner (user or organization).
    pub async fn repos_for_owner(owner: &str) -> Result<Vec<RemoteRepo>> {
        let output = Command::new("gh")
            .args(["repo", "list", owner, "--limit", "1000", "--json", "name,url"])
            .output()
            .await
            .context("Failed to run gh repo list")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow::anyhow!(
                "gh repo list {} failed: {}",
                owner,
                stderr.trim()
            ));
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }

    /// Registry entries for every remote repository of `owner`, with local
    /// paths derived as `dev_dir/owner/repo`.
    pub async fn sync_owner(owner: &str, dev_dir: &Path) -> Result<Vec<Repository>> {
        let remote_repos = Self::repos_for_owner(owner).await?;
        Ok(remote_repos
            .into_iter()
            .map(|remote| {
                let local_path = dev_dir.join(owner).join(&remote.name);
                Repository::new(
                    Provider::GitHub {
                        owner: owner.to_string(),
                        repo: remote.name,
                    },
                    format!("{}.git", remote.url),
                    local_path,
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_repo_list_parses() {
        let json = r#"[
            {"name": "widgets", "url": "https://github.com/acme/widgets"},
            {"name": "gadgets", "url": "https://github.com/acme/gadgets"}
        ]"#;
        let repos: Vec<RemoteRepo> = serde_json::from_str(json).unwrap();
        assert_eq!(repos.len(), 2);
        assert_eq!(repos[0].name, "widgets");
        assert_eq!(repos[1].url, "https://github.com/acme/gadgets");
    }
}
