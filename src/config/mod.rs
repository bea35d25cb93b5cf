//! # Configuration Management Module
//!
//! Loads the TOML configuration for petkeeper and provides defaults for
//! every section, so a missing or partial file still yields a playable game.
//!
//! ## Configuration Structure
//!
//! - [`StorageConfig`] - where the embedded store lives
//! - [`LoggingConfig`] - log level and optional log file
//! - [`PetRules`] - stat deltas, cooldowns and decay timing (`[pet]`)
//! - [`SocialRules`] - friend/companion costs and interaction cooldown (`[social]`)
//! - [`SecurityConfig`] - optional Argon2 parameters for PIN hashing
//!
//! ## Usage
//!
//! ```rust,no_run
//! use petkeeper::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     println!("Data directory: {}", config.storage.data_dir);
//!
//!     Config::create_default("config.toml").await?;
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use argon2::Params;
use log::warn;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::game::types::{PetRules, SocialRules};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub pet: PetRules,
    #[serde(default)]
    pub social: SocialRules,
    #[serde(default)]
    pub security: Option<SecurityConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root data directory; the store is opened at `<data_dir>/petkeeper`.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    "./data".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    pub fn store_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("petkeeper")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    pub file: Option<String>,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: Some("petkeeper.log".to_string()),
        }
    }
}

impl LoggingConfig {
    /// Parse `level`, falling back to `Info` for unknown names.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Argon2Config {
    #[serde(default)]
    pub memory_kib: Option<u32>,
    #[serde(default)]
    pub time_cost: Option<u32>,
    #[serde(default)]
    pub parallelism: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SecurityConfig {
    #[serde(default)]
    pub argon2: Option<Argon2Config>,
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    /// Argon2id parameters from `[security.argon2]`, unset fields taking the
    /// library defaults. `None` when the section is absent or invalid.
    pub fn argon2_params(&self) -> Option<Params> {
        let a = self.security.as_ref()?.argon2.as_ref()?;
        let builder = Params::DEFAULT;
        let mem = a.memory_kib.unwrap_or(builder.m_cost());
        let time = a.time_cost.unwrap_or(builder.t_cost());
        let para = a.parallelism.unwrap_or(builder.p_cost());
        match Params::new(mem, time, para, None) {
            Ok(params) => Some(params),
            Err(e) => {
                warn!("Ignoring invalid argon2 parameters: {}", e);
                None
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
            pet: PetRules::default(),
            social: SocialRules::default(),
            security: None,
        }
    }
}
