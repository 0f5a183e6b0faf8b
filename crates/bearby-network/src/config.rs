//! Network entries and the built-in templates.

use std::collections::BTreeMap;

use bearby_types::{BearbyError, Result};
use serde::{Deserialize, Serialize};

/// Main network.
pub const MAINNET: &str = "mainnet";

/// Public test network.
pub const TESTNET: &str = "testnet";

/// Lab network.
pub const LABNET: &str = "labnet";

const BUILTIN: [(&str, &str); 3] = [
    (MAINNET, "https://massa.net/api/v2"),
    (TESTNET, "https://test.massa.net/api/v2"),
    (LABNET, "https://labnet.massa.net/api/v2"),
];

/// Providers and config version of one network.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct NetworkEntry {
    /// Endpoints in priority order; the head serves first.
    pub providers: Vec<String>,
    /// Bumped by whoever edits the entry; never touched by rotation.
    #[serde(default)]
    pub version: u32,
}

impl NetworkEntry {
    /// Creates an entry from endpoints and a version.
    pub fn new<I, S>(providers: I, version: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            providers: providers.into_iter().map(Into::into).collect(),
            version,
        }
    }

    /// Position of `endpoint` in the provider list.
    pub fn position(&self, endpoint: &str) -> Option<usize> {
        self.providers.iter().position(|p| p == endpoint)
    }
}

/// Network name → entry. Ordered so the persisted JSON is stable.
pub type NetworkConfig = BTreeMap<String, NetworkEntry>;

/// Fresh copy of the read-only built-in networks.
pub fn builtin_networks() -> NetworkConfig {
    BUILTIN
        .iter()
        .map(|(name, url)| (name.to_string(), NetworkEntry::new([*url], 0)))
        .collect()
}

/// Returns `true` if `name` is one of the built-in networks.
pub fn is_builtin(name: &str) -> bool {
    BUILTIN.iter().any(|(n, _)| *n == name)
}

/// Rejects blank or duplicate endpoints.
///
/// # Errors
///
/// Returns `ConfigError` naming the offending network.
pub(crate) fn validate_providers(name: &str, entry: &NetworkEntry) -> Result<()> {
    for (i, endpoint) in entry.providers.iter().enumerate() {
        if endpoint.trim().is_empty() {
            return Err(BearbyError::ConfigError {
                reason: format!("network '{name}' has a blank provider at position {i}"),
            });
        }
        if entry.providers[..i].contains(endpoint) {
            return Err(BearbyError::ConfigError {
                reason: format!("network '{name}' lists provider '{endpoint}' twice"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_have_one_provider_at_version_zero() {
        let config = builtin_networks();
        assert_eq!(config.len(), 3);
        for name in [MAINNET, TESTNET, LABNET] {
            let entry = &config[name];
            assert_eq!(entry.providers.len(), 1);
            assert_eq!(entry.version, 0);
            assert!(is_builtin(name));
        }
        assert_eq!(config[TESTNET].providers[0], "https://test.massa.net/api/v2");
        assert!(!is_builtin("custom"));
    }

    #[test]
    fn entry_json_shape() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let entry = NetworkEntry::new(["localhost:3333"], 1);
        let json = serde_json::to_string(&entry)?;
        assert_eq!(json, r#"{"providers":["localhost:3333"],"version":1}"#);

        let missing_version: NetworkEntry = serde_json::from_str(r#"{"providers":[]}"#)?;
        assert_eq!(missing_version.version, 0);
        Ok(())
    }

    #[test]
    fn provider_validation() {
        let ok = NetworkEntry::new(["a:1", "b:2"], 0);
        assert!(validate_providers("custom", &ok).is_ok());

        let blank = NetworkEntry::new(["a:1", " "], 0);
        assert!(matches!(
            validate_providers("custom", &blank),
            Err(BearbyError::ConfigError { .. })
        ));

        let dup = NetworkEntry::new(["a:1", "a:1"], 0);
        assert!(validate_providers("custom", &dup).is_err());
    }
}
