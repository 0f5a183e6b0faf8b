//! Application configuration with sensible defaults.
//!
//! All operational parameters of the wallet core are centralized here.
//! A configuration file is plain JSON; missing fields fall back to their
//! defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{BearbyError, Result};

/// Default number of providers exposed per network.
pub const COUNT_NODES: usize = 3;

/// Name of the network selected on a fresh install.
pub const DEFAULT_NETWORK: &str = "mainnet";

// ---------------------------------------------------------------------------
// Argon2Config
// ---------------------------------------------------------------------------

/// Argon2id cost parameters used to turn the vault password into a key.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Argon2Config {
    /// Memory cost in KiB.
    pub m_cost: u32,
    /// Number of iterations.
    pub t_cost: u32,
    /// Degree of parallelism.
    pub p_cost: u32,
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            m_cost: 65536,
            t_cost: 3,
            p_cost: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Global application configuration.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default cap on the number of providers exposed for the selected
    /// network. Overridden by a persisted cap after the first change.
    pub node_count: usize,

    /// Argon2id parameters for the vault KDF.
    pub argon2: Argon2Config,

    /// Network selected before any user choice is persisted.
    pub default_network: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            node_count: COUNT_NODES,
            argon2: Argon2Config::default(),
            default_network: DEFAULT_NETWORK.to_string(),
        }
    }
}

impl AppConfig {
    /// Loads a configuration from a JSON file and validates it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, is not valid
    /// JSON, or holds out-of-range values.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| BearbyError::ConfigError {
            reason: format!("failed to read {}: {e}", path.display()),
        })?;

        let config: Self = serde_json::from_str(&raw).map_err(|e| BearbyError::ConfigError {
            reason: format!("failed to parse {}: {e}", path.display()),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration values.
    ///
    /// Returns an error if any value is outside its acceptable range.
    pub fn validate(&self) -> Result<()> {
        if self.node_count == 0 {
            return Err(BearbyError::ConfigError {
                reason: "node_count must be greater than 0".into(),
            });
        }

        if self.argon2.m_cost < 8 {
            return Err(BearbyError::ConfigError {
                reason: "argon2.m_cost must be at least 8 KiB".into(),
            });
        }

        if self.argon2.t_cost == 0 {
            return Err(BearbyError::ConfigError {
                reason: "argon2.t_cost must be greater than 0".into(),
            });
        }

        if self.argon2.p_cost == 0 {
            return Err(BearbyError::ConfigError {
                reason: "argon2.p_cost must be greater than 0".into(),
            });
        }

        if self.default_network.trim().is_empty() {
            return Err(BearbyError::ConfigError {
                reason: "default_network must not be empty".into(),
            });
        }

        Ok(())
    }
}
