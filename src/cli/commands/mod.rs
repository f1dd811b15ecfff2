mod browse;
mod clone;
mod compare;
mod config;
mod diff;
mod fetch;
mod list;
mod owners;
mod propagate;
mod reconcile;
mod scan;
mod select;
mod similar;
mod status;
mod take;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Config;
use crate::registry::RepoName;
use crate::similarity::SimilarityCache;

#[derive(Parser)]
#[command(name = "repodirector")]
#[command(about = "Browse, compare, and synchronize your local repository clones", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Skip confirmation prompts (non-interactive mode)
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan the dev directory for local clones
    Scan,

    /// Manage GitHub owners and remote enumeration
    Owners {
        #[command(subcommand)]
        action: OwnerAction,
    },

    /// List known repositories
    List,

    /// Select the base repository for comparisons
    Select {
        /// Fully-qualified name, e.g. acme.widgets
        repo: String,
    },

    /// Show working-copy status for a repository
    Status {
        /// Repository to inspect (defaults to the selected one)
        repo: Option<String>,
    },

    /// Rank other repositories by similarity to the selected one
    Similar,

    /// Compare the selected repository against another
    Compare {
        /// Repository to compare against (reuses the current one if omitted)
        repo: Option<String>,

        /// Leave comparison mode
        #[arg(long)]
        clear: bool,
    },

    /// Show the line diff for one compared file
    Diff {
        /// File to diff (reuses the current one if omitted)
        file: Option<String>,
    },

    /// Merge one diff block by taking one side's version
    Take {
        /// Which side's content to keep
        side: TakeSideArg,

        /// Diff block index, as shown by `diff`
        block: usize,

        /// File to merge (defaults to the current compared file)
        #[arg(long)]
        file: Option<String>,
    },

    /// Browse a subdirectory across both sides of the comparison
    Browse {
        /// Subdirectory to enter; `..` goes up, `/` returns to the root
        path: Option<String>,
    },

    /// Copy a browsed entry to the side that is missing it
    Copy {
        /// Entry name as shown by `browse`
        entry: String,
    },

    /// Delete a browsed entry from the side that has it
    Rm {
        /// Entry name as shown by `browse`
        entry: String,
    },

    /// Copy one file from the base repository to other repositories
    Propagate {
        /// File path relative to the repository root
        file: String,

        /// Target repositories; without this an interactive picker opens
        #[arg(long = "to")]
        to: Vec<String>,
    },

    /// Clone a repository in the background
    Clone {
        /// Repository to clone (defaults to the selected one)
        repo: Option<String>,
    },

    /// Fetch repositories whose fetch interval has elapsed
    Fetch {
        /// Keep running and fetch whenever a repository becomes due
        #[arg(long)]
        watch: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TakeSideArg {
    /// Keep the base repository's version of the block
    Left,
    /// Keep the compared repository's version of the block
    Right,
}

#[derive(Subcommand)]
pub enum OwnerAction {
    /// Add a GitHub owner
    Add { name: String },
    /// List known owners
    List,
    /// Enumerate each owner's remote repositories into the registry
    Sync,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the current configuration
    Show,
    /// Set the dev directory local clones live under
    SetDevDir { path: String },
    /// Set a repository's minimum fetch interval in seconds (0 disables)
    SetFetchInterval { repo: String, secs: u64 },
}

impl Cli {
    pub async fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Scan => scan::run().await,
            Commands::Owners { action } => match action {
                OwnerAction::Add { name } => owners::add(name).await,
                OwnerAction::List => owners::list().await,
                OwnerAction::Sync => owners::sync().await,
            },
            Commands::List => list::run().await,
            Commands::Select { repo } => select::run(repo).await,
            Commands::Status { repo } => status::run(repo.as_deref()).await,
            Commands::Similar => similar::run().await,
            Commands::Compare { repo, clear } => compare::run(repo.as_deref(), *clear).await,
            Commands::Diff { file } => diff::run(file.as_deref()).await,
            Commands::Take { side, block, file } => {
                take::run(*side, *block, file.as_deref()).await
            }
            Commands::Browse { path } => browse::run(path.as_deref()).await,
            Commands::Copy { entry } => reconcile::copy(entry).await,
            Commands::Rm { entry } => reconcile::remove(entry, self.yes).await,
            Commands::Propagate { file, to } => propagate::run(file, to, self.yes).await,
            Commands::Clone { repo } => clone::run(repo.as_deref()).await,
            Commands::Fetch { watch } => fetch::run(*watch).await,
            Commands::Config { action } => match action {
                ConfigAction::Show => config::show().await,
                ConfigAction::SetDevDir { path } => config::set_dev_dir(path).await,
                ConfigAction::SetFetchInterval { repo, secs } => {
                    config::set_fetch_interval(repo, *secs).await
                }
            },
        }
    }
}

pub(crate) fn require_base(config: &Config) -> Result<RepoName> {
    config.base_repo.clone().ok_or_else(|| {
        anyhow::anyhow!("no repository selected; run 'repodirector select <repo>' first")
    })
}

pub(crate) fn require_compare(config: &Config) -> Result<RepoName> {
    config.compare_repo.clone().ok_or_else(|| {
        anyhow::anyhow!("no comparison active; run 'repodirector compare <repo>' first")
    })
}

/// Full similarity refresh for `base` with a per-pair progress bar. The
/// dominant cost in the tool, so the user gets to watch it move.
pub(crate) fn refresh_cache_with_progress(
    config: &Config,
    base: &RepoName,
) -> Result<SimilarityCache> {
    let pair_count = config.repos.len().saturating_sub(1) as u64;
    let bar = ProgressBar::new(pair_count);
    bar.set_style(
        ProgressStyle::with_template("{spinner} diffing {msg} [{pos}/{len}]")
            .expect("progress template is static"),
    );

    let mut cache = SimilarityCache::new();
    cache.refresh_with(&config.repos, base, |other| {
        bar.set_message(other.to_string());
        bar.inc(1);
    })?;
    bar.finish_and_clear();
    Ok(cache)
}
