use anyhow::Result;

use crate::cli::Output;
use crate::config::ConfigStore;
use crate::registry::discovery;

pub async fn run() -> Result<()> {
    let mut store = ConfigStore::load()?;
    let dev_dir = store.config.dev_dir.clone();

    if !dev_dir.exists() {
        Output::error(&format!("Dev directory {} does not exist", dev_dir.display()));
        Output::info("Set it with 'repodirector config set-dev-dir <path>'");
        return Ok(());
    }

    Output::info(&format!("Scanning {}", dev_dir.display()));
    let found = discovery::scan_dev_directory(&dev_dir);

    let mut added = 0;
    let mut known = 0;
    for mut repo in found {
        // Only GitHub repositories carry an owner worth recording.
        if let Ok((owner, _)) = repo.provider.github_owner_repo() {
            let owner = owner.to_string();
            store.config.add_owner(&owner);
        }

        let name = repo.name();
        if let Ok(existing) = store.config.repos.get(&name) {
            // Keep per-repo tuning across rescans.
            repo.min_fetch_interval_secs = existing.min_fetch_interval_secs;
            repo.last_fetch = existing.last_fetch;
            known += 1;
        } else {
            added += 1;
        }
        store.config.repos.upsert(repo);
    }

    store.queue_save();
    Output::success(&format!(
        "Registered {added} new repositories ({known} already known)"
    ));
    store.finish()
}
