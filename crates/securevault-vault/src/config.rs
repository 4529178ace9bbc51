//! Runtime configuration.
//!
//! Loaded from a TOML file; every field is optional and falls back to the
//! demo defaults:
//!
//! ```toml
//! data_path = "data/securevault.db"
//! auth_delay_ms = 1000
//! encode_delay_ms = 500
//! stale_after_days = 90
//! min_entropy_bits = 36.0
//! two_factor_enabled = false
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VaultError};
use crate::policy::DEFAULT_MIN_ENTROPY_BITS;
use crate::score::DEFAULT_STALE_AFTER_DAYS;

/// Environment variable overriding [`VaultConfig::data_path`].
pub const DATA_PATH_ENV: &str = "SECUREVAULT_DATA";

/// Vault configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// SQLite file holding the persisted slots.
    pub data_path: PathBuf,
    /// Artificial authentication delay.
    pub auth_delay_ms: u64,
    /// Artificial encode delay.
    pub encode_delay_ms: u64,
    /// Age after which an item counts as stale.
    pub stale_after_days: u32,
    /// Passwords below this estimated entropy are weak.
    pub min_entropy_bits: f64,
    /// Whether the user has two-factor authentication set up.
    pub two_factor_enabled: bool,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/securevault.db"),
            auth_delay_ms: 1000,
            encode_delay_ms: 500,
            stale_after_days: DEFAULT_STALE_AFTER_DAYS,
            min_entropy_bits: DEFAULT_MIN_ENTROPY_BITS,
            two_factor_enabled: false,
        }
    }
}

impl VaultConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| VaultError::Config {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, using defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Io`] when the file exists but cannot be read and
    /// [`VaultError::Config`] when it is not valid configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => {
                tracing::info!(path = %path.display(), "loaded configuration");
                Self::from_toml_str(&content)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no configuration file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(path) = std::env::var(DATA_PATH_ENV) {
            if !path.trim().is_empty() {
                tracing::debug!(%path, "data path overridden from environment");
                self.data_path = PathBuf::from(path);
            }
        }
        self
    }

    /// Settings suitable for tests: no artificial delays.
    pub fn instant() -> Self {
        Self {
            auth_delay_ms: 0,
            encode_delay_ms: 0,
            ..Self::default()
        }
    }

    pub fn auth_delay(&self) -> Duration {
        Duration::from_millis(self.auth_delay_ms)
    }

    pub fn encode_delay(&self) -> Duration {
        Duration::from_millis(self.encode_delay_ms)
    }

    fn validate(&self) -> Result<()> {
        if !self.min_entropy_bits.is_finite() || self.min_entropy_bits < 0.0 {
            return Err(VaultError::Config {
                reason: format!(
                    "min_entropy_bits must be a non-negative number, got {}",
                    self.min_entropy_bits
                ),
            });
        }
        if self.data_path.as_os_str().is_empty() {
            return Err(VaultError::Config {
                reason: "data_path cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        assert_eq!(VaultConfig::from_toml_str("").unwrap(), VaultConfig::default());
    }

    #[test]
    fn partial_document_overrides_fields() {
        let config = VaultConfig::from_toml_str(
            "stale_after_days = 30\ntwo_factor_enabled = true\n",
        )
        .unwrap();
        assert_eq!(config.stale_after_days, 30);
        assert!(config.two_factor_enabled);
        assert_eq!(config.auth_delay(), Duration::from_millis(1000));
    }

    #[test]
    fn bad_types_are_config_errors() {
        let err = VaultConfig::from_toml_str("auth_delay_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, VaultError::Config { .. }));
    }

    #[test]
    fn negative_entropy_is_rejected() {
        assert!(VaultConfig::from_toml_str("min_entropy_bits = -1.0").is_err());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = VaultConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, VaultConfig::default());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.toml");
        std::fs::write(&path, "encode_delay_ms = 0\n").unwrap();
        assert_eq!(VaultConfig::load(&path).unwrap().encode_delay(), Duration::ZERO);
    }
}
