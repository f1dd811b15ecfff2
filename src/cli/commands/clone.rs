use anyhow::Result;

use super::{refresh_cache_with_progress, require_base, similar};
use crate::cli::Output;
use crate::config::ConfigStore;
use crate::registry::{probe, RepoName};
use crate::tasks::{JobOutcome, JobPool};

/// Clone a repository as a background job. The job only touches the
/// filesystem; the completion handling below runs back on this task, so
/// registry state changes stay on one logical thread.
pub async fn run(repo: Option<&str>) -> Result<()> {
    let mut store = ConfigStore::load()?;
    let name = match repo {
        Some(repo) => RepoName::from(repo),
        None => require_base(&store.config)?,
    };
    let record = store.config.repos.get(&name)?.clone();

    if probe::is_cloned(&record.local_path) {
        Output::info(&format!("{name} is already cloned"));
        return Ok(());
    }

    let mut pool = JobPool::new();
    pool.spawn_clone(&record);
    Output::info(&format!(
        "Cloning {} into {}",
        record.remote_url,
        record.local_path.display()
    ));

    while let Some(outcome) = pool.next_outcome().await {
        match outcome {
            JobOutcome::CloneFinished {
                repo,
                result: Ok(()),
            } => {
                Output::success(&format!("Cloned {repo}"));

                // Same continuation the selection flow runs: probe the new
                // clone and bring the similarity view up to date.
                if store.config.base_repo.as_ref() == Some(&name) {
                    let status = probe::probe(&record.local_path);
                    if status.dirty {
                        Output::warning("Working copy has uncommitted changes");
                    }
                    let cache = refresh_cache_with_progress(&store.config, &name)?;
                    similar::print_ranking(&cache, &name);
                }
            }
            JobOutcome::CloneFinished {
                repo,
                result: Err(err),
            } => {
                Output::error(&format!("Clone of {repo} failed: {err}"));
            }
            JobOutcome::FetchFinished { .. } => {}
        }
    }

    store.finish()
}
