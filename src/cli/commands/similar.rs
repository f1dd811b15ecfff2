use anyhow::Result;
use comfy_table::{Attribute, Cell, Color};

use super::{refresh_cache_with_progress, require_base};
use crate::cli::Output;
use crate::config::Config;
use crate::registry::RepoName;
use crate::similarity::SimilarityCache;

pub async fn run() -> Result<()> {
    let config = Config::load()?;
    let base = require_base(&config)?;
    let cache = refresh_cache_with_progress(&config, &base)?;
    print_ranking(&cache, &base);
    Ok(())
}

pub(crate) fn print_ranking(cache: &SimilarityCache, base: &RepoName) {
    let ranked = cache.similar_repos(base);
    if ranked.is_empty() {
        Output::info("No other repositories to compare against");
        return;
    }

    Output::header(&format!("Repositories similar to {base}"));

    let mut table = Output::table_minimal();
    table.set_header(vec![
        Cell::new("Repository").add_attribute(Attribute::Bold).fg(Color::Cyan),
        Cell::new("Matched").add_attribute(Attribute::Bold).fg(Color::Cyan),
        Cell::new("Exact").add_attribute(Attribute::Bold).fg(Color::Cyan),
        Cell::new("Score").add_attribute(Attribute::Bold).fg(Color::Cyan),
    ]);

    for entry in &ranked {
        table.add_row(vec![
            Cell::new(entry.name.as_str()),
            Cell::new(entry.matched_files),
            Cell::new(entry.exact_duplicates),
            Cell::new(entry.score),
        ]);
    }

    println!("{table}");
}
