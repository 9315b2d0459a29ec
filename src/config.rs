// Declaro — Configuration
//
// Optional TOML file with serde defaults for every field. A missing file at
// the default location means "all defaults"; `DECLARO_DB` overrides the
// database path.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::{AuthError, CredentialHasher};

/// Environment variable that overrides `database_path`.
pub const DB_PATH_ENV: &str = "DECLARO_DB";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading config {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file holding both repositories. Defaults to
    /// `<data_dir>/declaro/declaro.db`.
    pub database_path: Option<PathBuf>,
    /// Artificial delay applied to login, registration and password changes.
    pub simulated_latency_ms: u64,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Argon2 memory cost in KiB.
    pub hash_memory_kib: u32,
    /// Argon2 iteration count.
    pub hash_iterations: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            simulated_latency_ms: 1000,
            log_filter: "declaro=info".to_string(),
            hash_memory_kib: argon2::Params::DEFAULT_M_COST,
            hash_iterations: argon2::Params::DEFAULT_T_COST,
        }
    }
}

/// Default directory for Declaro data files.
pub fn data_dir() -> PathBuf {
    let base = dirs_next::data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("declaro")
}

pub fn default_config_path() -> PathBuf {
    data_dir().join("config.toml")
}

impl AppConfig {
    /// Load configuration from `path`, or from the default location when
    /// `path` is `None`. Only an explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (default_config_path(), false),
        };

        let mut config = if path.exists() || required {
            let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
            Self::from_toml(&contents).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?
        } else {
            Self::default()
        };

        config.apply_db_override(std::env::var(DB_PATH_ENV).ok());
        tracing::debug!(config = ?config, "Configuration loaded");
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    fn apply_db_override(&mut self, value: Option<String>) {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            self.database_path = Some(PathBuf::from(value));
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| data_dir().join("declaro.db"))
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }

    pub fn hasher(&self) -> Result<CredentialHasher, AuthError> {
        CredentialHasher::new(self.hash_memory_kib, self.hash_iterations)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.simulated_latency_ms, 1000);
        assert_eq!(config.log_filter, "declaro=info");
        assert!(config.database_path().ends_with("declaro/declaro.db"));
        assert!(config.hasher().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = AppConfig::from_toml("simulated_latency_ms = 0\n").unwrap();
        assert_eq!(config.latency(), Duration::ZERO);
        assert_eq!(config.log_filter, "declaro=info");
        assert_eq!(config.hash_iterations, argon2::Params::DEFAULT_T_COST);
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("declaro.toml");
        std::fs::write(
            &path,
            "database_path = \"/tmp/shop.db\"\nlog_filter = \"declaro=debug\"\n",
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.log_filter, "declaro=debug");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "simulated_latency_ms = \"soon\"").unwrap();

        let result = AppConfig::load(Some(&path));
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_db_override() {
        let mut config = AppConfig::default();
        config.apply_db_override(Some("/var/lib/declaro/alt.db".to_string()));
        assert_eq!(config.database_path(), PathBuf::from("/var/lib/declaro/alt.db"));

        let mut config = AppConfig::default();
        config.apply_db_override(Some("  ".to_string()));
        assert!(config.database_path.is_none());
    }
}
