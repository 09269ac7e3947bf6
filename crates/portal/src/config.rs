//! Runtime configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use esst_auth::DEMO_PASSWORD;
use esst_registration::gateway::DEFAULT_SUBMIT_DELAY;

pub const STORAGE_DIR_ENV: &str = "ESST_STORAGE_DIR";
pub const SUBMIT_DELAY_ENV: &str = "ESST_SUBMIT_DELAY_MS";
pub const DEMO_PASSWORD_ENV: &str = "ESST_DEMO_PASSWORD";

const APP_DIR: &str = "esst-portal";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a number of milliseconds, got '{value}'")]
    InvalidDelay { var: &'static str, value: String },

    #[error("{0} is set but empty")]
    Empty(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    /// Directory holding the persisted session record.
    pub storage_dir: PathBuf,
    /// Simulated registration round-trip.
    pub submit_delay: Duration,
    /// Password accepted for every demo account.
    pub demo_password: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            submit_delay: DEFAULT_SUBMIT_DELAY,
            demo_password: DEMO_PASSWORD.to_string(),
        }
    }
}

impl PortalConfig {
    /// Read the configuration from process environment variables.
    ///
    /// Unset variables fall back to defaults; malformed ones are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`PortalConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        match lookup(STORAGE_DIR_ENV) {
            Some(dir) if dir.trim().is_empty() => return Err(ConfigError::Empty(STORAGE_DIR_ENV)),
            Some(dir) => config.storage_dir = PathBuf::from(dir),
            None => tracing::debug!(
                dir = %config.storage_dir.display(),
                "{STORAGE_DIR_ENV} not set; using default"
            ),
        }

        if let Some(raw) = lookup(SUBMIT_DELAY_ENV) {
            let ms: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidDelay {
                var: SUBMIT_DELAY_ENV,
                value: raw.clone(),
            })?;
            config.submit_delay = Duration::from_millis(ms);
        }

        match lookup(DEMO_PASSWORD_ENV) {
            Some(password) if password.is_empty() => {
                return Err(ConfigError::Empty(DEMO_PASSWORD_ENV));
            }
            Some(password) => config.demo_password = password,
            None => tracing::warn!("{DEMO_PASSWORD_ENV} not set; using the default demo password"),
        }

        Ok(config)
    }
}

/// `<local data dir>/esst-portal`, or `./.esst-portal` when the platform has
/// no local data directory.
fn default_storage_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(format!(".{APP_DIR}")))
}
