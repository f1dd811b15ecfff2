use std::path::PathBuf;

use anyhow::Result;

use crate::cli::Output;
use crate::config::{Config, ConfigStore};
use crate::registry::RepoName;

pub async fn show() -> Result<()> {
    let config = Config::load()?;

    Output::header("Configuration");
    println!("Dev directory: {}", config.dev_dir.display());
    println!("Owners:        {}", config.owners.join(", "));
    println!("Repositories:  {}", config.repos.len());

    if let Some(base) = &config.base_repo {
        println!("Selected:      {base}");
    }
    if let Some(other) = &config.compare_repo {
        println!("Comparing:     {other}");
    }
    if let Some(file) = &config.compare_file {
        println!("Compare file:  {file}");
    }
    if !config.browse_path.is_empty() {
        println!("Browse path:   {}", config.browse_path);
    }

    Ok(())
}

pub async fn set_dev_dir(path: &str) -> Result<()> {
    let mut store = ConfigStore::load()?;
    store.config.dev_dir = PathBuf::from(path);
    store.queue_save();
    Output::success(&format!("Dev directory set to {path}"));
    store.finish()
}

pub async fn set_fetch_interval(repo: &str, secs: u64) -> Result<()> {
    let mut store = ConfigStore::load()?;
    let name = RepoName::from(repo);

    match store.config.repos.get_mut(&name) {
        Ok(record) => {
            record.min_fetch_interval_secs = secs;
            store.queue_save();
            if secs == 0 {
                Output::success(&format!("Periodic fetch disabled for {name}"));
            } else {
                Output::success(&format!("Fetch interval for {name} set to {secs}s"));
            }
        }
        Err(err) => Output::error(&err.to_string()),
    }

    store.finish()
}
