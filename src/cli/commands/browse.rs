use anyhow::Result;
use comfy_table::{Attribute, Cell, Color};

use super::require_base;
use crate::browse::{self, Presence};
use crate::cli::Output;
use crate::config::ConfigStore;

pub async fn run(path: Option<&str>) -> Result<()> {
    let mut store = ConfigStore::load()?;
    let base = require_base(&store.config)?;

    if let Some(path) = path {
        store.config.browse_path = navigate(&store.config.browse_path, path);
        store.queue_save();
    }
    let subdir = store.config.browse_path.clone();

    let base_repo = store.config.repos.get(&base)?;
    let location = if subdir.is_empty() { "/" } else { subdir.as_str() };

    match store.config.compare_repo.clone() {
        Some(other) => {
            let other_repo = store.config.repos.get(&other)?;
            Output::header(&format!("{base} vs {other} at {location}"));

            let (entries_base, entries_compare) = browse::list_both_sides(
                &base_repo.local_path,
                &other_repo.local_path,
                &subdir,
            );
            let classified = browse::classify(&entries_base, &entries_compare);
            if classified.is_empty() {
                Output::info("Nothing here on either side");
                return store.finish();
            }

            let mut table = Output::table_minimal();
            table.set_header(vec![
                Cell::new("Path").add_attribute(Attribute::Bold).fg(Color::Cyan),
                Cell::new("Presence").add_attribute(Attribute::Bold).fg(Color::Cyan),
                Cell::new("Actions").add_attribute(Attribute::Bold).fg(Color::Cyan),
            ]);
            for (entry, presence) in &classified {
                let (label, color, actions) = match presence {
                    Presence::BaseOnly => ("base only", Color::Green, "copy, rm"),
                    Presence::CompareOnly => ("compare only", Color::Red, "copy, rm"),
                    Presence::Both => ("both", Color::Grey, ""),
                };
                table.add_row(vec![
                    Cell::new(entry),
                    Cell::new(label).fg(color),
                    Cell::new(actions),
                ]);
            }
            println!("{table}");
        }
        None => {
            Output::header(&format!("{base} at {location}"));
            let entries = browse::list_side(&base_repo.local_path, &subdir);
            if entries.is_empty() {
                Output::info("Empty directory");
                return store.finish();
            }
            for entry in entries {
                println!("  {entry}");
            }
        }
    }

    store.finish()
}

/// Resolve a navigation input against the current subdirectory. `..` goes
/// up one level, `/` returns to the root, anything else descends. Inputs
/// pasted straight from a listing (already rooted at the repository) are
/// taken as-is.
fn navigate(current: &str, input: &str) -> String {
    match input {
        "/" => String::new(),
        ".." => match current.rsplit_once('/') {
            Some((parent, _)) => parent.to_string(),
            None => String::new(),
        },
        _ => {
            let next = input.trim_matches('/');
            if current.is_empty() || next.starts_with(&format!("{current}/")) {
                next.to_string()
            } else {
                format!("{current}/{next}")
            }
        }
    }
}
