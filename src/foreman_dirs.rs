//! Centralized application directory paths for foreman.
//!
//! Single source of truth for where the task database and config file live.
//! Uses the [`dirs`] crate for platform-appropriate directory resolution.
//!
//! # Directory Layout
//!
//! | Purpose | macOS | Linux |
//! |---------|-------|-------|
//! | Store data | `~/Library/Application Support/foreman/` | `~/.local/share/foreman/` |
//! | Config | `~/Library/Application Support/foreman/` | `~/.config/foreman/` |
//!
//! # Environment Overrides
//!
//! Both paths can be overridden for testing or custom deployments:
//! - `FOREMAN_DATA_DIR` — overrides [`data_dir`]
//! - `FOREMAN_CONFIG_DIR` — overrides [`config_dir`]

use std::path::PathBuf;

/// Store data root directory.
///
/// The SQLite task database lives here. Resolves to
/// `dirs::data_dir()/foreman/` by default. Override with the
/// `FOREMAN_DATA_DIR` environment variable.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("FOREMAN_DATA_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::data_dir()
        .map(|d| d.join("foreman"))
        .unwrap_or_else(|| PathBuf::from("/tmp/foreman-data"))
}

/// Application config directory.
///
/// Resolves to `dirs::config_dir()/foreman/` by default. Override with the
/// `FOREMAN_CONFIG_DIR` environment variable.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("FOREMAN_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("foreman"))
        .unwrap_or_else(|| PathBuf::from("/tmp/foreman-config"))
}

/// Main config file path (`config_dir()/config.toml`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_is_nonempty() {
        let dir = data_dir();
        assert!(!dir.as_os_str().is_empty());
    }

    #[test]
    fn data_dir_contains_foreman() {
        let dir = data_dir();
        let s = dir.to_string_lossy();
        assert!(s.contains("foreman"), "data_dir should contain 'foreman': {s}");
    }

    #[test]
    fn config_dir_is_nonempty() {
        let dir = config_dir();
        assert!(!dir.as_os_str().is_empty());
    }

    #[test]
    fn config_file_ends_with_config_toml() {
        let path = config_file();
        let s = path.to_string_lossy();
        assert!(s.ends_with("config.toml"), "config_file: {s}");
    }
}
