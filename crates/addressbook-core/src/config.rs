//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/addressbook/config.toml)
//! 3. Environment variables (ADDRESSBOOK_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix
const ENV_PREFIX: &str = "ADDRESSBOOK";

/// Default random-user endpoint used for seeding
pub const DEFAULT_SEED_URL: &str = "https://randomuser.me/api/";

/// Number of contacts fetched when the store is first seeded
pub const DEFAULT_SEED_COUNT: usize = 20;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the SQLite database
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Whether an empty store is populated from the seed source
    #[serde(default = "default_true")]
    pub seed_enabled: bool,

    /// Random-user service endpoint
    #[serde(default = "default_seed_url")]
    pub seed_url: String,

    /// Number of contacts to request when seeding
    #[serde(default = "default_seed_count")]
    pub seed_count: usize,

    /// Timeout for the seed request, in seconds
    #[serde(default = "default_seed_timeout")]
    pub seed_timeout_secs: u64,

    /// Rows per page in the list view (unpaged when unset)
    #[serde(default)]
    pub page_size: Option<usize>,

    /// Log file for TUI mode (defaults to {data_dir}/debug.log)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            seed_enabled: true,
            seed_url: default_seed_url(),
            seed_count: DEFAULT_SEED_COUNT,
            seed_timeout_secs: default_seed_timeout(),
            page_size: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (ADDRESSBOOK_DATA_DIR, ADDRESSBOOK_SEED_URL, ...)
    /// 2. Config file (~/.config/addressbook/config.toml or ADDRESSBOOK_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var(format!("{}_SEED_ENABLED", ENV_PREFIX)) {
            self.seed_enabled = val.eq_ignore_ascii_case("true") || val == "1";
        }

        if let Ok(val) = std::env::var(format!("{}_SEED_URL", ENV_PREFIX)) {
            if !val.is_empty() {
                self.seed_url = val;
            }
        }

        if let Ok(val) = std::env::var(format!("{}_SEED_COUNT", ENV_PREFIX)) {
            if let Ok(count) = val.parse() {
                self.seed_count = count;
            }
        }

        if let Ok(val) = std::env::var(format!("{}_SEED_TIMEOUT_SECS", ENV_PREFIX)) {
            if let Ok(secs) = val.parse() {
                self.seed_timeout_secs = secs;
            }
        }

        if let Ok(val) = std::env::var(format!("{}_PAGE_SIZE", ENV_PREFIX)) {
            self.page_size = val.parse().ok().filter(|size| *size > 0);
        }
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with ADDRESSBOOK_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("addressbook")
            .join("config.toml")
    }

    /// Get the path to the SQLite database
    pub fn sqlite_path(&self) -> PathBuf {
        self.data_dir.join("addressbook.db")
    }

    /// Get the TUI log file path
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("debug.log"))
    }
}

/// The database lives in the process temp directory unless configured
fn default_data_dir() -> PathBuf {
    std::env::temp_dir().join("addressbook")
}

fn default_true() -> bool {
    true
}

fn default_seed_url() -> String {
    DEFAULT_SEED_URL.to_string()
}

fn default_seed_count() -> usize {
    DEFAULT_SEED_COUNT
}

fn default_seed_timeout() -> u64 {
    10
}
