use anyhow::Result;
use comfy_table::{Attribute, Cell, Color};

use super::{require_base, require_compare};
use crate::cli::Output;
use crate::config::ConfigStore;
use crate::registry::RepoName;
use crate::similarity::SimilarityCache;

pub async fn run(repo: Option<&str>, clear: bool) -> Result<()> {
    let mut store = ConfigStore::load()?;

    if clear {
        store.config.compare_repo = None;
        store.config.compare_file = None;
        store.queue_save();
        Output::success("Comparison cleared");
        return store.finish();
    }

    let base = require_base(&store.config)?;

    if let Some(repo) = repo {
        let name = RepoName::from(repo);
        if !store.config.repos.contains(&name) {
            Output::error(&format!("Unknown repository: {repo}"));
            return Ok(());
        }
        if name == base {
            Output::error("Cannot compare a repository against itself");
            return Ok(());
        }
        store.config.compare_repo = Some(name);
        store.config.compare_file = None;
        store.queue_save();
    }

    let other = require_compare(&store.config)?;

    let mut cache = SimilarityCache::new();
    cache.refresh_pair(&store.config.repos, &base, &other)?;

    Output::header(&format!("Comparing {base} vs {other}"));

    let matched = cache.pair(&base, &other).map(|diffs| diffs.len()).unwrap_or(0);
    let exact = cache.exact_duplicates(&base, &other);
    let changed = cache.changed_files(&base, &other);
    println!(
        "{matched} matched files, {exact} identical, {} differing",
        changed.len()
    );

    if !changed.is_empty() {
        let mut table = Output::table_minimal();
        table.set_header(vec![
            Cell::new("Similar Files").add_attribute(Attribute::Bold).fg(Color::Cyan),
            Cell::new("Deletions").add_attribute(Attribute::Bold).fg(Color::Cyan),
            Cell::new("Additions").add_attribute(Attribute::Bold).fg(Color::Cyan),
        ]);
        for file in &changed {
            table.add_row(vec![
                Cell::new(&file.path),
                Cell::new(file.deleted).fg(Color::Red),
                Cell::new(file.inserted).fg(Color::Green),
            ]);
        }
        println!("{table}");
        Output::info("Inspect a file with 'repodirector diff <file>'");
    }

    store.finish()
}
