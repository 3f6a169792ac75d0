use std::env;
use std::path::PathBuf;
use std::time::Duration;

use dotenvy::dotenv;

pub const DATA_DIR_VAR: &str = "FUEL_DATA_DIR";
pub const LATENCY_VAR: &str = "FUEL_SIMULATED_LATENCY_MS";
pub const ENFORCE_TRANSITIONS_VAR: &str = "FUEL_ENFORCE_STATUS_TRANSITIONS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory for the file store; `None` keeps everything in memory
    pub data_dir: Option<PathBuf>,
    /// Fixed delay applied before every service operation
    pub simulated_latency: Duration,
    /// Reject status changes out of `delivered`/`cancelled` and payments on
    /// orders that are no longer pending
    pub enforce_status_transitions: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            simulated_latency: Duration::ZERO,
            enforce_status_transitions: true,
        }
    }
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        let config = Self::from_lookup(|var| env::var(var).ok())?;

        tracing::info!(
            data_dir = ?config.data_dir,
            latency_ms = config.simulated_latency.as_millis() as u64,
            enforce_status_transitions = config.enforce_status_transitions,
            "Application configuration loaded"
        );
        Ok(config)
    }

    /// Build a config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let data_dir = lookup(DATA_DIR_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let simulated_latency = match lookup(LATENCY_VAR) {
            Some(raw) => {
                let millis = raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                    var: LATENCY_VAR,
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
                Duration::from_millis(millis)
            }
            None => defaults.simulated_latency,
        };

        let enforce_status_transitions = match lookup(ENFORCE_TRANSITIONS_VAR) {
            Some(raw) => raw.trim().parse::<bool>().map_err(|e| ConfigError::Invalid {
                var: ENFORCE_TRANSITIONS_VAR,
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => defaults.enforce_status_transitions,
        };

        Ok(Self {
            data_dir,
            simulated_latency,
            enforce_status_transitions,
        })
    }
}
