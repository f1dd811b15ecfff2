use anyhow::Result;
use owo_colors::OwoColorize;

use super::{require_base, require_compare};
use crate::cli::Output;
use crate::config::ConfigStore;
use crate::diff::DiffResult;
use crate::registry::RepoName;
use crate::similarity;

/// Lines of unchanged context shown around each block.
const CONTEXT_LINES: usize = 3;

pub async fn run(file: Option<&str>) -> Result<()> {
    let mut store = ConfigStore::load()?;
    let base = require_base(&store.config)?;
    let other = require_compare(&store.config)?;

    if let Some(file) = file {
        store.config.compare_file = Some(file.to_string());
        store.queue_save();
    }
    let Some(rel_path) = store.config.compare_file.clone() else {
        Output::error("No file selected. Run 'repodirector diff <file>'");
        return store.finish();
    };

    let base_repo = store.config.repos.get(&base)?;
    let other_repo = store.config.repos.get(&other)?;
    let diff = similarity::diff_single_file(base_repo, other_repo, &rel_path);

    render(&base, &other, &rel_path, &diff);
    store.finish()
}

fn render(base: &RepoName, other: &RepoName, rel_path: &str, diff: &DiffResult) {
    println!(
        "{} {} {} {}",
        "Comparing".bold(),
        base.as_str().cyan(),
        "vs".bold(),
        other.as_str().cyan()
    );
    println!(
        "{}: {} {}",
        rel_path,
        format!("-{}", diff.lines_deleted()).red(),
        format!("+{}", diff.lines_inserted()).green()
    );

    if diff.is_identical() {
        Output::success("Files are identical");
        return;
    }

    for (index, block) in diff.blocks.iter().enumerate() {
        println!("{}", "─".repeat(60).bright_black());
        println!(
            "{} {} {}",
            format!("[{index}]").bold(),
            format!("-{}", block.delete_count).red(),
            format!("+{}", block.insert_count).green()
        );

        let prologue_start = block.delete_start.saturating_sub(CONTEXT_LINES);
        for line in &diff.old_lines[prologue_start..block.delete_start] {
            println!("  {}", line.dimmed());
        }
        for line in
            &diff.old_lines[block.delete_start..block.delete_start + block.delete_count]
        {
            println!("{}", format!("- {line}").red());
        }
        for line in
            &diff.new_lines[block.insert_start..block.insert_start + block.insert_count]
        {
            println!("{}", format!("+ {line}").green());
        }
        let epilogue_start = block.delete_start + block.delete_count;
        let epilogue_end = (epilogue_start + CONTEXT_LINES).min(diff.old_lines.len());
        for line in &diff.old_lines[epilogue_start..epilogue_end] {
            println!("  {}", line.dimmed());
        }
    }

    println!("{}", "─".repeat(60).bright_black());
    Output::info("Merge a block with 'repodirector take <left|right> <block>'");
}
