use std::path::Path;

use anyhow::Result;
use tokio::process::Command;

/// Network git operations shell out to the git CLI so the user's
/// credential helpers and SSH configuration apply unchanged. Local
/// inspection goes through git2 (see `probe`).
pub struct GitCli;

impl GitCli {
    /// Clone `url` into `path`, creating parent directories as needed.
    pub async fn clone(url: &str, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let output = Command::new("git")
            .args(["clone", url])
            .arg(path)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow::anyhow!(
                "failed to clone {}: {}",
                url,
                stderr.trim()
            ));
        }

        Ok(())
    }

    /// Fetch `origin` for an existing clone.
    pub async fn fetch(path: &Path) -> Result<()> {
        let output = Command::new("git")
            .args(["fetch", "origin"])
            .current_dir(path)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow::anyhow!(
                "failed to fetch {}: {}",
                path.display(),
                stderr.trim()
            ));
        }

        Ok(())
    }
}
