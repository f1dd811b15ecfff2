use anyhow::Result;

use super::{refresh_cache_with_progress, similar};
use crate::cli::Output;
use crate::config::ConfigStore;
use crate::registry::{probe, RepoName};

/// Switch the base repository: reset the comparison context, probe the
/// clone, and recompute similarity against everything else.
pub async fn run(repo: &str) -> Result<()> {
    let mut store = ConfigStore::load()?;
    let name = RepoName::from(repo);

    if !store.config.repos.contains(&name) {
        Output::error(&format!("Unknown repository: {repo}"));
        Output::info("Use 'repodirector list' to see known repositories");
        return Ok(());
    }

    store.config.base_repo = Some(name.clone());
    store.config.compare_repo = None;
    store.config.compare_file = None;
    store.config.browse_path.clear();
    store.queue_save();

    let record = store.config.repos.get(&name)?.clone();
    let status = probe::probe(&record.local_path);

    Output::header(name.as_str());
    println!("Remote: {}", record.remote_url);
    println!("Local:  {}", record.local_path.display());

    if status.cloned {
        if status.dirty {
            Output::warning("Working copy has uncommitted changes");
        }
        let cache = refresh_cache_with_progress(&store.config, &name)?;
        similar::print_ranking(&cache, &name);
    } else {
        Output::warning("Not cloned yet. Run 'repodirector clone' to fetch it");
    }

    store.finish()
}
