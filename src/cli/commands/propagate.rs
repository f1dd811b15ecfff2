use anyhow::Result;

use super::{refresh_cache_with_progress, require_base};
use crate::cli::Output;
use crate::config::ConfigStore;
use crate::propagate::{self, PropagationTarget};
use crate::registry::RepoName;

/// Copy one file from the base repository into a chosen set of other
/// repositories. Repositories that already track a file at the same
/// relative path are preselected in the interactive picker.
pub async fn run(file: &str, to: &[String], yes: bool) -> Result<()> {
    let mut store = ConfigStore::load()?;
    let base = require_base(&store.config)?;

    if !store.config.repos.get(&base)?.local_path.join(file).is_file() {
        Output::error(&format!("{base} has no file at {file}"));
        return Ok(());
    }

    let mut cache = refresh_cache_with_progress(&store.config, &base)?;
    let candidates = propagate::targets(&cache, &base, file);
    if candidates.is_empty() {
        Output::info("No other repositories to propagate to");
        return Ok(());
    }

    let selected = select_targets(&candidates, to, yes)?;
    if selected.is_empty() {
        Output::info("No targets selected; nothing propagated");
        return store.finish();
    }

    if !yes {
        let confirmed = inquire::Confirm::new(&format!(
            "Propagate {} to {} repositories?",
            file,
            selected.len()
        ))
        .with_default(true)
        .prompt()?;
        if !confirmed {
            Output::info("Nothing propagated");
            return store.finish();
        }
    }

    let outcome = propagate::propagate(&store.config.repos, &base, file, &selected)?;

    // Keep the cache honest about what just landed on disk.
    for name in &outcome.copied {
        cache.refresh_file(&store.config.repos, &base, name, file)?;
    }

    if !outcome.copied.is_empty() {
        Output::success(&format!(
            "Propagated {} to {} repositories",
            file,
            outcome.copied.len()
        ));
    }
    for (name, err) in &outcome.failed {
        Output::error(&format!("{name}: {err}"));
    }

    store.finish()
}

fn select_targets(
    candidates: &[PropagationTarget],
    to: &[String],
    yes: bool,
) -> Result<Vec<RepoName>> {
    // Explicit targets win over any interactive selection.
    if !to.is_empty() {
        let mut selected = Vec::new();
        for raw in to {
            let name = RepoName::from(raw.as_str());
            if candidates.iter().any(|t| t.name == name) {
                selected.push(name);
            } else {
                Output::warning(&format!("Skipping unknown target {raw}"));
            }
        }
        return Ok(selected);
    }

    // Non-interactive default: exactly the preselected set.
    if yes {
        return Ok(candidates
            .iter()
            .filter(|t| t.preselected)
            .map(|t| t.name.clone())
            .collect());
    }

    let options: Vec<String> = candidates.iter().map(|t| t.name.to_string()).collect();
    let defaults: Vec<usize> = candidates
        .iter()
        .enumerate()
        .filter(|(_, t)| t.preselected)
        .map(|(index, _)| index)
        .collect();

    let picked = inquire::MultiSelect::new("Repositories to propagate to:", options)
        .with_default(&defaults)
        .prompt()?;
    Ok(picked.iter().map(|name| RepoName::from(name.as_str())).collect())
}
