use anyhow::Result;
use owo_colors::OwoColorize;

use super::require_base;
use crate::cli::Output;
use crate::config::Config;
use crate::registry::{probe, RepoName};

pub async fn run(repo: Option<&str>) -> Result<()> {
    let config = Config::load()?;
    let name = match repo {
        Some(repo) => RepoName::from(repo),
        None => require_base(&config)?,
    };
    let record = config.repos.get(&name)?;
    let status = probe::probe(&record.local_path);

    Output::header(name.as_str());
    println!("Remote: {}", record.remote_url);
    println!("Local:  {}", record.local_path.display());

    if record.min_fetch_interval_secs == 0 {
        println!("Fetch:  disabled");
    } else {
        let last = record
            .last_fetch
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "never".to_string());
        println!(
            "Fetch:  every {}s, last {}",
            record.min_fetch_interval_secs, last
        );
    }

    if !status.cloned {
        println!("State:  {}", "not cloned".red());
    } else if status.dirty {
        println!("State:  {}", "dirty".yellow());
    } else {
        println!("State:  {}", "clean".green());
    }

    Ok(())
}
