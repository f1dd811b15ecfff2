use anyhow::Result;
use comfy_table::{Attribute, Cell, Color};

use crate::cli::Output;
use crate::config::Config;
use crate::registry::probe;

pub async fn run() -> Result<()> {
    let config = Config::load()?;

    if config.repos.is_empty() {
        Output::info("No repositories known. Run 'repodirector scan' or 'repodirector owners sync'");
        return Ok(());
    }

    let mut table = Output::table_minimal();
    table.set_header(vec![
        Cell::new(""),
        Cell::new("Repository").add_attribute(Attribute::Bold).fg(Color::Cyan),
        Cell::new("Local Path").add_attribute(Attribute::Bold).fg(Color::Cyan),
        Cell::new("State").add_attribute(Attribute::Bold).fg(Color::Cyan),
    ]);

    for (name, repo) in config.repos.iter() {
        let status = probe::probe(&repo.local_path);
        let selected = config.base_repo.as_ref() == Some(name);

        let (state, color) = if !status.cloned {
            ("missing", Color::Red)
        } else if status.dirty {
            ("dirty", Color::Yellow)
        } else {
            ("clean", Color::Green)
        };

        table.add_row(vec![
            Cell::new(if selected { "*" } else { "" }),
            Cell::new(name.as_str()),
            Cell::new(repo.local_path.display()),
            Cell::new(state).fg(color),
        ]);
    }

    println!("{table}");
    Ok(())
}
