use anyhow::Result;

use super::{require_base, require_compare, TakeSideArg};
use crate::cli::Output;
use crate::config::ConfigStore;
use crate::diff::{apply_take, Side};
use crate::similarity::{self, SimilarityCache};

/// Merge one diff block. Taking the left side writes the base version
/// into the compared repository; taking the right side writes the
/// compared version into the base repository. The touched file is
/// re-diffed immediately so the reported state matches the disk.
pub async fn run(side: TakeSideArg, block_index: usize, file: Option<&str>) -> Result<()> {
    let mut store = ConfigStore::load()?;
    let base = require_base(&store.config)?;
    let other = require_compare(&store.config)?;

    if let Some(file) = file {
        store.config.compare_file = Some(file.to_string());
        store.queue_save();
    }
    let Some(rel_path) = store.config.compare_file.clone() else {
        Output::error("No file selected. Run 'repodirector diff <file>' first");
        return store.finish();
    };

    let base_repo = store.config.repos.get(&base)?.clone();
    let other_repo = store.config.repos.get(&other)?.clone();

    let diff = similarity::diff_single_file(&base_repo, &other_repo, &rel_path);
    let Some(block) = diff.blocks.get(block_index) else {
        Output::error(&format!(
            "No diff block {block_index} in {rel_path} ({} blocks)",
            diff.blocks.len()
        ));
        return store.finish();
    };

    let (take, target) = match side {
        TakeSideArg::Left => (Side::Left, &other_repo),
        TakeSideArg::Right => (Side::Right, &base_repo),
    };

    match apply_take(&diff, block, take, &target.local_path, &rel_path) {
        Ok(()) => {
            Output::success(&format!("Wrote {} to {}", rel_path, target.name()));

            // Scoped re-diff: only this file's cache entry changes.
            let mut cache = SimilarityCache::new();
            cache.refresh_file(&store.config.repos, &base, &other, &rel_path)?;
            if let Some(fresh) = cache.file(&base, &other, &rel_path) {
                if fresh.is_identical() {
                    Output::info("Files are now identical");
                } else {
                    Output::info(&format!("{} diff blocks remain", fresh.blocks.len()));
                }
            }
        }
        Err(err) => {
            // The cached diff is left stale on purpose; nothing was
            // refreshed for a write that did not happen.
            Output::error(&err.to_string());
        }
    }

    store.finish()
}
