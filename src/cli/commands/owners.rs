use anyhow::Result;
use log::warn;

use crate::cli::Output;
use crate::config::{Config, ConfigStore};
use crate::github::GitHubCli;

pub async fn add(name: &str) -> Result<()> {
    let mut store = ConfigStore::load()?;
    if store.config.add_owner(name) {
        store.queue_save();
        Output::success(&format!("Added owner {name}"));
    } else {
        Output::info(&format!("Owner {name} is already known"));
    }
    store.finish()
}

pub async fn list() -> Result<()> {
    let config = Config::load()?;
    if config.owners.is_empty() {
        Output::info("No owners known. Add one with 'repodirector owners add <name>'");
        return Ok(());
    }
    for owner in &config.owners {
        println!("  {owner}");
    }
    Ok(())
}

/// Enumerate each owner's remote repositories into the registry. One
/// owner's API failure skips that owner; the rest still sync.
pub async fn sync() -> Result<()> {
    let mut store = ConfigStore::load()?;

    if store.config.owners.is_empty() {
        Output::info("No owners to sync. Add one with 'repodirector owners add <name>'");
        return Ok(());
    }
    if !GitHubCli::is_installed() {
        Output::error("The gh CLI is required for remote enumeration");
        return Ok(());
    }
    if !GitHubCli::is_authenticated().await? {
        Output::warning("gh is not authenticated; run 'gh auth login' first");
    }

    let dev_dir = store.config.dev_dir.clone();
    for owner in store.config.owners.clone() {
        match GitHubCli::sync_owner(&owner, &dev_dir).await {
            Ok(repos) => {
                let count = repos.len();
                for mut repo in repos {
                    let name = repo.name();
                    if let Ok(existing) = store.config.repos.get(&name) {
                        repo.min_fetch_interval_secs = existing.min_fetch_interval_secs;
                        repo.last_fetch = existing.last_fetch;
                        // A clone found on disk keeps its actual location.
                        repo.local_path = existing.local_path.clone();
                    }
                    store.config.repos.upsert(repo);
                }
                Output::success(&format!("{owner}: {count} repositories"));
            }
            Err(err) => {
                warn!("owner sync failed for {owner}: {err}");
                Output::warning(&format!("Skipping {owner}: {err}"));
            }
        }
    }

    store.queue_save();
    store.finish()
}
