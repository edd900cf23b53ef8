//! Configuration types for the foreman store and seed bootstrap.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Number of accounts the reference seed creates.
const DEFAULT_SEED_ACCOUNTS: u32 = 15;

/// Builder pool size of each seeded account.
const DEFAULT_BUILDERS_PER_ACCOUNT: u32 = 5;

/// Top-level configuration for the foreman library.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ForemanConfig {
    /// Store location settings.
    pub store: StoreConfig,
    /// Seed bootstrap settings.
    pub seed: SeedConfig,
}

/// Store location configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the SQLite database file. Created on open if
    /// missing.
    pub root_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root_dir: crate::foreman_dirs::data_dir(),
        }
    }
}

/// Seed bootstrap configuration.
///
/// The seed runs only against an empty accounts collection, so these values
/// matter exactly once per store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// How many accounts to create.
    pub accounts: u32,
    /// Builder pool size assigned to every seeded account. Must be at
    /// least 1.
    pub builders_per_account: u32,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            accounts: DEFAULT_SEED_ACCOUNTS,
            builders_per_account: DEFAULT_BUILDERS_PER_ACCOUNT,
        }
    }
}

impl ForemanConfig {
    /// Load configuration from a TOML file, falling back to defaults for
    /// missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::ForemanError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot
    /// be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::ForemanError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path
    /// (`foreman_dirs::config_dir()/config.toml`).
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        crate::foreman_dirs::config_file()
    }
}
