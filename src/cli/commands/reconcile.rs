use anyhow::Result;

use super::{require_base, require_compare};
use crate::browse;
use crate::cli::Output;
use crate::config::Config;

/// Copy a browsed entry across the comparison, toward the side missing
/// it. Entries present on both sides are refused: neither side is
/// authoritative.
pub async fn copy(entry: &str) -> Result<()> {
    let config = Config::load()?;
    let base = require_base(&config)?;
    let other = require_compare(&config)?;

    let base_repo = config.repos.get(&base)?;
    let other_repo = config.repos.get(&other)?;
    let (entries_base, entries_compare) = browse::list_both_sides(
        &base_repo.local_path,
        &other_repo.local_path,
        &config.browse_path,
    );

    let entry = resolve_entry(&entries_base, &entries_compare, entry);
    match (entries_base.contains(&entry), entries_compare.contains(&entry)) {
        (true, false) => {
            browse::copy_entry(&base_repo.local_path, &other_repo.local_path, &entry)?;
            Output::success(&format!("Copied {entry} to {other}"));
        }
        (false, true) => {
            browse::copy_entry(&other_repo.local_path, &base_repo.local_path, &entry)?;
            Output::success(&format!("Copied {entry} to {base}"));
        }
        (true, true) => {
            Output::warning(&format!("{entry} is present on both sides; nothing to copy"));
        }
        (false, false) => {
            Output::error(&format!("No entry {entry} on either side"));
        }
    }

    Ok(())
}

/// Delete a browsed entry from whichever side has it.
pub async fn remove(entry: &str, yes: bool) -> Result<()> {
    let config = Config::load()?;
    let base = require_base(&config)?;
    let other = require_compare(&config)?;

    let base_repo = config.repos.get(&base)?;
    let other_repo = config.repos.get(&other)?;
    let (entries_base, entries_compare) = browse::list_both_sides(
        &base_repo.local_path,
        &other_repo.local_path,
        &config.browse_path,
    );

    let entry = resolve_entry(&entries_base, &entries_compare, entry);
    let (root, repo_name) = match (entries_base.contains(&entry), entries_compare.contains(&entry))
    {
        (true, false) => (&base_repo.local_path, &base),
        (false, true) => (&other_repo.local_path, &other),
        (true, true) => {
            Output::warning(&format!(
                "{entry} is present on both sides; delete is only offered for one-sided entries"
            ));
            return Ok(());
        }
        (false, false) => {
            Output::error(&format!("No entry {entry} on either side"));
            return Ok(());
        }
    };

    if !yes {
        let confirmed = inquire::Confirm::new(&format!("Delete {entry} from {repo_name}?"))
            .with_default(false)
            .prompt()?;
        if !confirmed {
            Output::info("Nothing deleted");
            return Ok(());
        }
    }

    browse::delete_entry(root, &entry)?;
    Output::success(&format!("Deleted {entry} from {repo_name}"));
    Ok(())
}

// Accept entry names with or without the trailing directory marker.
fn resolve_entry(entries_base: &[String], entries_compare: &[String], input: &str) -> String {
    let as_dir = format!("{}/", input.trim_end_matches('/'));
    let known = |candidate: &String| {
        entries_base.contains(candidate) || entries_compare.contains(candidate)
    };

    if known(&input.to_string()) {
        input.to_string()
    } else if known(&as_dir) {
        as_dir
    } else {
        input.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_entry_adds_directory_marker() {
        let entries_base = vec!["docs/".to_string(), "a.txt".to_string()];
        let entries_compare: Vec<String> = Vec::new();

        assert_eq!(resolve_entry(&entries_base, &entries_compare, "docs"), "docs/");
        assert_eq!(resolve_entry(&entries_base, &entries_compare, "a.txt"), "a.txt");
        assert_eq!(resolve_entry(&entries_base, &entries_compare, "ghost"), "ghost");
    }
}
