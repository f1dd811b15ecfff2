use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::debounce::Debouncer;
use crate::registry::{Registry, RepoName};

/// Persisted options: the repository registry plus the current browse and
/// compare context, carried between invocations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Root under which local clones live.
    pub dev_dir: PathBuf,
    /// Known GitHub owners; discovered by scanning or added explicitly.
    pub owners: Vec<String>,
    pub repos: Registry,
    pub base_repo: Option<RepoName>,
    pub compare_repo: Option<RepoName>,
    pub compare_file: Option<String>,
    /// Current browse subdirectory, relative to the repository roots.
    /// Empty means the root.
    pub browse_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dev_dir: home::home_dir()
                .map(|home| home.join("dev"))
                .unwrap_or_else(|| PathBuf::from("dev")),
            owners: Vec::new(),
            repos: Registry::default(),
            base_repo: None,
            compare_repo: None,
            compare_file: None,
            browse_path: String::new(),
        }
    }
}

impl Config {
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var("REPODIRECTOR_CONFIG_DIR") {
            return Ok(PathBuf::from(dir));
        }
        let home =
            home::home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
        Ok(home.join(".repodirector"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load the persisted options, or defaults when none exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir()?;
        std::fs::create_dir_all(&dir)?;

        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Record an owner if it is not already known.
    pub fn add_owner(&mut self, owner: &str) -> bool {
        if self.owners.iter().any(|known| known == owner) {
            return false;
        }
        self.owners.push(owner.to_string());
        self.owners.sort();
        true
    }
}

const SAVE_DEBOUNCE: Duration = Duration::from_secs(3);

/// The options plus save debouncing.
///
/// Mutating commands call `queue_save` freely; bursts collapse into one
/// write once the idle window passes. Long-running loops call
/// `save_if_idle` on each tick, and every command ends with `finish` so a
/// still-pending save is never dropped.
pub struct ConfigStore {
    pub config: Config,
    debouncer: Debouncer,
}

impl ConfigStore {
    pub fn load() -> Result<Self> {
        Ok(Self {
            config: Config::load()?,
            debouncer: Debouncer::new(SAVE_DEBOUNCE),
        })
    }

    pub fn queue_save(&mut self) {
        self.debouncer.request(Instant::now());
    }

    pub fn save_if_idle(&mut self) -> Result<()> {
        if self.debouncer.poll(Instant::now()) {
            self.config.save()?;
        }
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        if self.debouncer.flush() {
            self.config.save()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Provider, Repository};

    #[test]
    fn test_roundtrip_through_toml() {
        let mut config = Config::default();
        config.dev_dir = PathBuf::from("/dev");
        config.add_owner("acme");
        config.repos.upsert(Repository::new(
            Provider::GitHub {
                owner: "acme".to_string(),
                repo: "widgets".to_string(),
            },
            "https://github.com/acme/widgets.git",
            PathBuf::from("/dev/acme/widgets"),
        ));
        config.repos.upsert(Repository::new(
            Provider::AzureDevOps {
                organization: "acme".to_string(),
                project: "tools".to_string(),
                repo: "gadgets".to_string(),
            },
            "https://dev.azure.com/acme/tools/_git/gadgets",
            PathBuf::from("/dev/acme/gadgets"),
        ));
        config.base_repo = Some(RepoName::from("acme.widgets"));
        config.browse_path = "src".to_string();

        let serialized = toml::to_string_pretty(&config).unwrap();
        let restored: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.repos.is_empty());
        assert!(config.base_repo.is_none());
        assert_eq!(config.browse_path, "");
    }

    #[test]
    fn test_add_owner_deduplicates() {
        let mut config = Config::default();
        assert!(config.add_owner("acme"));
        assert!(!config.add_owner("acme"));
        assert_eq!(config.owners, vec!["acme".to_string()]);
    }
}
