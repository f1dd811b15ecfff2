use std::time::Duration;

use anyhow::Result;
use chrono::Utc;

use crate::cli::Output;
use crate::config::ConfigStore;
use crate::tasks::{self, JobOutcome, JobPool};

pub async fn run(watch: bool) -> Result<()> {
    let mut store = ConfigStore::load()?;
    let mut pool = JobPool::new();

    if watch {
        Output::info("Watching for due fetches; press Ctrl-C to stop");
        loop {
            dispatch_due(&mut store, &mut pool);

            if pool.idle() {
                tokio::time::sleep(Duration::from_secs(1)).await;
            } else {
                let next = tokio::time::timeout(Duration::from_secs(1), pool.next_outcome());
                if let Ok(Some(outcome)) = next.await {
                    report(&outcome);
                }
            }

            // Debounced settings write rides the watch tick.
            store.save_if_idle()?;
        }
    }

    let dispatched = dispatch_due(&mut store, &mut pool);
    if dispatched == 0 {
        Output::info("Nothing is due for fetching");
    }
    while let Some(outcome) = pool.next_outcome().await {
        report(&outcome);
    }

    store.finish()
}

/// Dispatch a fetch for every cloned repository whose interval has
/// elapsed. `last_fetch` is stamped at dispatch time so a slow fetch is
/// not dispatched twice.
fn dispatch_due(store: &mut ConfigStore, pool: &mut JobPool) -> usize {
    let now = Utc::now();
    let mut dispatched = 0;

    for name in tasks::fetch_due(&store.config.repos, now) {
        let record = match store.config.repos.get_mut(&name) {
            Ok(record) => record,
            Err(_) => continue,
        };
        record.last_fetch = Some(now);
        let record = record.clone();
        if pool.spawn_fetch(&record) {
            dispatched += 1;
        }
        store.queue_save();
    }

    dispatched
}

fn report(outcome: &JobOutcome) {
    match outcome {
        JobOutcome::FetchFinished {
            repo,
            result: Ok(()),
        } => Output::success(&format!("Fetched {repo}")),
        JobOutcome::FetchFinished {
            repo,
            result: Err(err),
        } => Output::warning(&format!("Fetch of {repo} failed: {err}")),
        JobOutcome::CloneFinished { .. } => {}
    }
}
