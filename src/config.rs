//! Runtime configuration.
//!
//! Loaded from an optional TOML file (`$CINESCOUT_CONFIG`, else
//! `<config_dir>/cinescout/config.toml`). Every field has a default, so an
//! absent file is fine. The API key is resolved separately, see
//! [`resolve_api_key`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use keyring::Entry;
use serde::Deserialize;
use tracing::{info, warn};

use crate::catalog::images::DEFAULT_IMAGE_BASE;
use crate::catalog::SortKey;
use crate::error::CineScoutError;

pub const API_KEY_ENV: &str = "TMDB_API_KEY";
pub const CONFIG_PATH_ENV: &str = "CINESCOUT_CONFIG";
const KEYRING_SERVICE: &str = "tmdb";
const KEYRING_USER: &str = "cinescout";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub image_base_url: String,
    /// Region sent with discover queries.
    pub region: String,
    pub default_sort: SortKey,
    pub debounce_ms: u64,
    pub request_timeout_secs: u64,
    pub data_dir: Option<PathBuf>,
    pub api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.themoviedb.org/3".to_string(),
            image_base_url: DEFAULT_IMAGE_BASE.to_string(),
            region: "IN".to_string(),
            default_sort: SortKey::PopularityDesc,
            debounce_ms: 500,
            request_timeout_secs: 30,
            data_dir: None,
            api_key: None,
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Invalid config TOML")?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {:?}", path))?;
        Self::from_toml_str(&content)
    }

    /// Load from the configured location, falling back to defaults when no
    /// file exists there.
    pub fn load_default() -> Result<Self> {
        let path = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(p) => PathBuf::from(p),
            None => match dirs::config_dir() {
                Some(dir) => dir.join("cinescout").join("config.toml"),
                None => return Ok(Self::default()),
            },
        };
        if path.exists() {
            info!("Loading config from {:?}", path);
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Directory holding the local store.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("cinescout")
        })
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir().join("cinescout.db")
    }
}

/// Resolve the TMDB API key: environment, then config file, then keychain.
pub fn resolve_api_key(config: &Config) -> Result<String, CineScoutError> {
    let from_env = std::env::var(API_KEY_ENV).ok();
    pick_api_key(from_env, config.api_key.clone(), read_keychain_key).ok_or_else(|| {
        CineScoutError::Config(format!(
            "No TMDB API key found. Set {} or add api_key to the config file.",
            API_KEY_ENV
        ))
    })
}

fn pick_api_key(
    from_env: Option<String>,
    from_config: Option<String>,
    from_keychain: impl FnOnce() -> Option<String>,
) -> Option<String> {
    let non_empty = |s: Option<String>| s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    non_empty(from_env)
        .or_else(|| non_empty(from_config))
        .or_else(|| non_empty(from_keychain()))
}

fn read_keychain_key() -> Option<String> {
    let entry = match Entry::new(KEYRING_SERVICE, KEYRING_USER) {
        Ok(entry) => entry,
        Err(e) => {
            warn!("Failed to create keyring entry for {}: {}", KEYRING_SERVICE, e);
            return None;
        }
    };
    match entry.get_password() {
        Ok(password) => Some(password),
        Err(keyring::Error::NoEntry) => {
            info!("No API key found in keychain for service: {}", KEYRING_SERVICE);
            None
        }
        Err(e) => {
            warn!("Failed to read API key from keychain: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.region, "IN");
        assert_eq!(config.default_sort, SortKey::PopularityDesc);
        assert_eq!(config.debounce(), Duration::from_millis(500));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            region = "US"
            default_sort = "vote_average.desc"
            "#,
        )
        .unwrap();
        assert_eq!(config.region, "US");
        assert_eq!(config.default_sort, SortKey::VoteAverageDesc);
        assert_eq!(config.api_base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.debounce_ms, 500);
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(Config::from_toml_str("default_sort = \"sideways\"").is_err());
    }

    #[test]
    fn test_load_from_file_and_database_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let data = dir.path().join("data");
        std::fs::write(
            &path,
            format!("data_dir = {:?}\ndebounce_ms = 250\n", data.to_string_lossy()),
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.debounce(), Duration::from_millis(250));
        assert_eq!(config.database_path(), data.join("cinescout.db"));
    }

    #[test]
    fn test_api_key_precedence() {
        let never = || -> Option<String> { panic!("keychain should not be consulted") };
        assert_eq!(
            pick_api_key(Some("env".into()), Some("file".into()), never),
            Some("env".to_string())
        );
        assert_eq!(
            pick_api_key(Some("  ".into()), Some("file".into()), never),
            Some("file".to_string())
        );
        assert_eq!(
            pick_api_key(None, None, || Some("chain".into())),
            Some("chain".to_string())
        );
        assert_eq!(pick_api_key(None, Some(String::new()), || None), None);
    }
}
