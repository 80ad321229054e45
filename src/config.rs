//! Configuration types.

use std::path::PathBuf;

use secrecy::SecretString;

use crate::error::ConfigError;

/// How many recent chat rows are replayed into a new transcript.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Where chat state is persisted.
#[derive(Debug, Clone)]
pub enum StoreLocation {
    /// Local libSQL file.
    Local(PathBuf),
    /// Remote libSQL server (sqld / Turso).
    Remote { url: String, auth_token: SecretString },
}

/// Coach service configuration.
#[derive(Debug, Clone)]
pub struct CoachConfig {
    pub store: StoreLocation,
    /// Port for the HTTP API.
    pub port: u16,
    /// Maximum chat rows loaded when a session starts.
    pub history_limit: usize,
    /// Optional directory for rolling log files.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            store: StoreLocation::Local(PathBuf::from("./data/wellness-coach.db")),
            port: 8080,
            history_limit: DEFAULT_HISTORY_LIMIT,
            log_dir: None,
        }
    }
}

impl CoachConfig {
    /// Build a config from `WELLNESS_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (env in production, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let store = match lookup("WELLNESS_DB_URL") {
            Some(url) => {
                let token = lookup("WELLNESS_DB_TOKEN")
                    .ok_or_else(|| ConfigError::MissingEnvVar("WELLNESS_DB_TOKEN".into()))?;
                StoreLocation::Remote {
                    url,
                    auth_token: SecretString::from(token),
                }
            }
            None => lookup("WELLNESS_DB_PATH")
                .map(|p| StoreLocation::Local(PathBuf::from(p)))
                .unwrap_or(defaults.store),
        };

        Ok(Self {
            store,
            port: parse_or(&lookup, "WELLNESS_PORT", defaults.port)?,
            history_limit: parse_or(&lookup, "WELLNESS_HISTORY_LIMIT", defaults.history_limit)?,
            log_dir: lookup("WELLNESS_LOG_DIR").map(PathBuf::from),
        })
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}
