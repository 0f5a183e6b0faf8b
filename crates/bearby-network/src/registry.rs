//! Provider registry: selected network, node-count cap and rotation.
//!
//! The stored provider list of a network is never truncated. Callers
//! only ever see the first `min(count, len)` entries of it, and
//! [`NetworkRegistry::downgrade_node_status`] reorders the stored list so
//! a failing endpoint leaves that window's head.
//!
//! Like the account ledger, every mutation persists first and swaps the
//! in-memory state second.

use std::sync::Arc;

use bearby_storage::{keys, read_json, write_json, Storage};
use bearby_types::config::AppConfig;
use bearby_types::{BearbyError, Result};

use crate::config::{builtin_networks, is_builtin, validate_providers, NetworkConfig, NetworkEntry};

/// Selected network, per-network providers and the exposed-provider cap.
pub struct NetworkRegistry {
    storage: Arc<dyn Storage>,
    config: NetworkConfig,
    selected: String,
    count: usize,
    default_network: String,
    default_count: usize,
}

impl NetworkRegistry {
    /// Creates a registry at the built-in defaults. Call [`Self::sync`]
    /// to load persisted choices.
    ///
    /// # Errors
    ///
    /// `InvalidNetwork` if `app.default_network` is not a built-in
    /// network, `ConfigError` if `app.node_count` is zero.
    pub fn new(storage: Arc<dyn Storage>, app: &AppConfig) -> Result<Self> {
        let config = builtin_networks();
        if !config.contains_key(&app.default_network) {
            return Err(BearbyError::InvalidNetwork {
                reason: format!("default network '{}' is not built in", app.default_network),
            });
        }
        if app.node_count == 0 {
            return Err(BearbyError::ConfigError {
                reason: "node_count must be greater than 0".into(),
            });
        }

        Ok(Self {
            storage,
            config,
            selected: app.default_network.clone(),
            count: app.node_count,
            default_network: app.default_network.clone(),
            default_count: app.node_count,
        })
    }

    // -- Accessors --------------------------------------------------------

    /// Name of the selected network.
    pub fn selected(&self) -> &str {
        &self.selected
    }

    /// Cap on exposed providers.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Every known network, including unexposed reserve providers.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Exposed providers of the selected network, head first.
    pub fn providers(&self) -> &[String] {
        match self.config.get(&self.selected) {
            Some(entry) => &entry.providers[..self.window(entry)],
            None => &[],
        }
    }

    /// Config version of the selected network.
    pub fn version(&self) -> u32 {
        self.config.get(&self.selected).map_or(0, |e| e.version)
    }

    fn window(&self, entry: &NetworkEntry) -> usize {
        self.count.min(entry.providers.len())
    }

    fn selected_entry(&self) -> Result<&NetworkEntry> {
        self.config
            .get(&self.selected)
            .ok_or_else(|| BearbyError::InvalidNetwork {
                reason: format!("selected network '{}' has no config", self.selected),
            })
    }

    // -- Persistence ------------------------------------------------------

    /// Loads the selected network, the network mapping and the cap.
    ///
    /// Persisted entries override the built-in templates. A stored
    /// selection that no longer resolves falls back to the default
    /// network.
    ///
    /// # Errors
    ///
    /// `StorageError` if a stored record is unreadable.
    pub fn sync(&mut self) -> Result<()> {
        let mut config = builtin_networks();
        if let Some(stored) = read_json::<NetworkConfig>(&*self.storage, keys::NETWORK_CONFIG)? {
            config.extend(stored);
        }

        let mut selected = read_json::<String>(&*self.storage, keys::NETWORK_SELECTED)?
            .unwrap_or_else(|| self.default_network.clone());
        if config.get(&selected).map_or(true, |e| e.providers.is_empty()) {
            tracing::warn!(network = %selected, "stored network unusable, using default");
            selected = self.default_network.clone();
        }

        let mut count = read_json::<usize>(&*self.storage, keys::NETWORK_COUNT)?
            .unwrap_or(self.default_count);
        if count == 0 {
            tracing::warn!("stored node count is zero, using default");
            count = self.default_count;
        }

        self.config = config;
        self.selected = selected;
        self.count = count;
        tracing::debug!(
            network = %self.selected,
            count = self.count,
            networks = self.config.len(),
            "network registry synced"
        );
        Ok(())
    }

    fn commit_config(&mut self, next: NetworkConfig) -> Result<()> {
        write_json(&*self.storage, keys::NETWORK_CONFIG, &next)?;
        self.config = next;
        Ok(())
    }

    // -- Selection --------------------------------------------------------

    /// Switches the selected network.
    ///
    /// # Errors
    ///
    /// `InvalidNetwork` if `name` is unknown or has no providers.
    pub fn set_network(&mut self, name: &str) -> Result<()> {
        match self.config.get(name) {
            Some(entry) if !entry.providers.is_empty() => {}
            Some(_) => {
                return Err(BearbyError::InvalidNetwork {
                    reason: format!("network '{name}' has no providers"),
                });
            }
            None => {
                return Err(BearbyError::InvalidNetwork {
                    reason: format!("unknown network '{name}'"),
                });
            }
        }

        write_json(&*self.storage, keys::NETWORK_SELECTED, name)?;
        self.selected = name.to_string();
        tracing::info!(network = %name, "network selected");
        Ok(())
    }

    /// Changes the cap on exposed providers. Stored lists are untouched.
    ///
    /// # Errors
    ///
    /// `ConfigError` if `count` is zero.
    pub fn set_nodes_count(&mut self, count: usize) -> Result<()> {
        if count == 0 {
            return Err(BearbyError::ConfigError {
                reason: "node count must be greater than 0".into(),
            });
        }

        write_json(&*self.storage, keys::NETWORK_COUNT, &count)?;
        self.count = count;
        tracing::info!(count, "node count changed");
        Ok(())
    }

    // -- Reconfiguration --------------------------------------------------

    /// Replaces the whole network mapping. Does not switch networks.
    ///
    /// # Errors
    ///
    /// - `InvalidNetwork` if a built-in network is missing, a name is
    ///   blank, or the selected network is dropped or emptied.
    /// - `ConfigError` if a provider list has blank or duplicate
    ///   endpoints.
    pub fn set_config(&mut self, next: NetworkConfig) -> Result<()> {
        for name in builtin_networks().keys() {
            if !next.contains_key(name) {
                return Err(BearbyError::InvalidNetwork {
                    reason: format!("built-in network '{name}' cannot be removed"),
                });
            }
        }

        for (name, entry) in &next {
            if name.trim().is_empty() {
                return Err(BearbyError::InvalidNetwork {
                    reason: "network name must not be empty".into(),
                });
            }
            validate_providers(name, entry)?;
        }

        if next.get(&self.selected).map_or(true, |e| e.providers.is_empty()) {
            return Err(BearbyError::InvalidNetwork {
                reason: format!("selected network '{}' must keep a provider", self.selected),
            });
        }

        self.commit_config(next)?;
        tracing::info!(networks = self.config.len(), "network config replaced");
        Ok(())
    }

    /// Appends `endpoint` to the selected network.
    ///
    /// # Errors
    ///
    /// `ConfigError` if `endpoint` is blank or already listed.
    pub fn add_node(&mut self, endpoint: &str) -> Result<()> {
        let endpoint = endpoint.trim();
        let mut entry = self.selected_entry()?.clone();
        if entry.position(endpoint).is_some() {
            return Err(BearbyError::ConfigError {
                reason: format!("provider '{endpoint}' already listed"),
            });
        }
        entry.providers.push(endpoint.to_string());
        self.replace_selected(entry)
    }

    /// Removes `endpoint` from the selected network.
    ///
    /// # Errors
    ///
    /// - `InvalidNetwork` if `endpoint` is not listed.
    /// - `ConfigError` if it is the last provider.
    pub fn remove_node(&mut self, endpoint: &str) -> Result<()> {
        let mut entry = self.selected_entry()?.clone();
        let position = entry.position(endpoint).ok_or_else(|| BearbyError::InvalidNetwork {
            reason: format!("provider '{endpoint}' not in '{}'", self.selected),
        })?;
        if entry.providers.len() == 1 {
            return Err(BearbyError::ConfigError {
                reason: "the last provider cannot be removed".into(),
            });
        }
        entry.providers.remove(position);
        self.replace_selected(entry)
    }

    /// Reorders the selected network's providers to `order`.
    ///
    /// # Errors
    ///
    /// `ConfigError` unless `order` is a permutation of the current list.
    pub fn sort_nodes(&mut self, order: &[String]) -> Result<()> {
        let mut entry = self.selected_entry()?.clone();

        let mut current = entry.providers.clone();
        let mut wanted = order.to_vec();
        current.sort();
        wanted.sort();
        if current != wanted {
            return Err(BearbyError::ConfigError {
                reason: "order must list every provider exactly once".into(),
            });
        }

        entry.providers = order.to_vec();
        self.replace_selected(entry)
    }

    fn replace_selected(&mut self, entry: NetworkEntry) -> Result<()> {
        let mut next = self.config.clone();
        next.insert(self.selected.clone(), entry);
        self.set_config(next)
    }

    // -- Failover ---------------------------------------------------------

    /// Demotes `endpoint` to the last slot of the exposed window.
    ///
    /// With a window of `min(count, len)` providers, an endpoint inside
    /// the window moves to its last slot and the ones behind it shift up.
    /// An endpoint already at or beyond that slot moves to the end of the
    /// stored list. The version is unchanged.
    ///
    /// # Errors
    ///
    /// `InvalidNetwork` if `endpoint` is not a provider of the selected
    /// network.
    pub fn downgrade_node_status(&mut self, endpoint: &str) -> Result<()> {
        let mut entry = self.selected_entry()?.clone();
        let Some(position) = entry.position(endpoint) else {
            tracing::warn!(network = %self.selected, endpoint = %endpoint, "downgrade of unknown provider");
            return Err(BearbyError::InvalidNetwork {
                reason: format!("provider '{endpoint}' not in '{}'", self.selected),
            });
        };

        let last_slot = self.window(&entry).saturating_sub(1);
        let demoted = entry.providers.remove(position);
        if position < last_slot {
            entry.providers.insert(last_slot, demoted);
        } else {
            entry.providers.push(demoted);
        }

        let mut next = self.config.clone();
        next.insert(self.selected.clone(), entry);
        self.commit_config(next)?;

        tracing::info!(
            network = %self.selected,
            endpoint = %endpoint,
            head = self.providers().first().map(String::as_str).unwrap_or_default(),
            "provider downgraded"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bearby_storage::MemoryStorage;

    fn registry() -> std::result::Result<(Arc<MemoryStorage>, NetworkRegistry), BearbyError> {
        let storage = Arc::new(MemoryStorage::new());
        let mut registry = NetworkRegistry::new(storage.clone(), &AppConfig::default())?;
        registry.sync()?;
        Ok((storage, registry))
    }

    fn with_custom(
        registry: &mut NetworkRegistry,
        providers: &[&str],
    ) -> std::result::Result<(), BearbyError> {
        let mut next = registry.config().clone();
        next.insert("custom".into(), NetworkEntry::new(providers.iter().copied(), 1));
        registry.set_config(next)?;
        registry.set_network("custom")
    }

    #[test]
    fn unknown_default_network_rejected() {
        let app = AppConfig {
            default_network: "nowhere".into(),
            ..AppConfig::default()
        };
        let result = NetworkRegistry::new(Arc::new(MemoryStorage::new()), &app);
        assert!(matches!(result, Err(BearbyError::InvalidNetwork { .. })));
    }

    #[test]
    fn unknown_network_rejected() -> std::result::Result<(), BearbyError> {
        let (storage, mut registry) = registry()?;
        assert!(matches!(
            registry.set_network("nowhere"),
            Err(BearbyError::InvalidNetwork { .. })
        ));
        assert_eq!(registry.selected(), "mainnet");
        assert!(!storage.contains(keys::NETWORK_SELECTED)?);
        Ok(())
    }

    #[test]
    fn builtins_cannot_be_dropped() -> std::result::Result<(), BearbyError> {
        let (_, mut registry) = registry()?;
        let mut next = registry.config().clone();
        next.remove("labnet");
        assert!(matches!(
            registry.set_config(next),
            Err(BearbyError::InvalidNetwork { .. })
        ));
        assert!(registry.config().contains_key("labnet"));
        Ok(())
    }

    #[test]
    fn blank_network_name_rejected() -> std::result::Result<(), BearbyError> {
        let (storage, mut registry) = registry()?;
        let mut next = registry.config().clone();
        next.insert("  ".into(), NetworkEntry::new(["a:1"], 1));

        assert!(matches!(
            registry.set_config(next),
            Err(BearbyError::InvalidNetwork { .. })
        ));
        assert!(!registry.config().contains_key("  "));
        assert!(!storage.contains(keys::NETWORK_CONFIG)?);
        Ok(())
    }

    #[test]
    fn network_without_providers_cannot_be_selected() -> std::result::Result<(), BearbyError> {
        let (storage, mut registry) = registry()?;
        let mut next = registry.config().clone();
        next.insert("empty".into(), NetworkEntry::new(Vec::<String>::new(), 1));
        registry.set_config(next)?;

        assert!(matches!(
            registry.set_network("empty"),
            Err(BearbyError::InvalidNetwork { .. })
        ));
        assert_eq!(registry.selected(), "mainnet");
        assert!(!storage.contains(keys::NETWORK_SELECTED)?);
        Ok(())
    }

    #[test]
    fn selected_network_cannot_be_emptied() -> std::result::Result<(), BearbyError> {
        let (_, mut registry) = registry()?;
        with_custom(&mut registry, &["a:1", "b:2"])?;

        let mut next = registry.config().clone();
        next.insert("custom".into(), NetworkEntry::new(Vec::<String>::new(), 2));
        assert!(registry.set_config(next).is_err());
        assert_eq!(registry.providers().len(), 2);
        assert_eq!(registry.version(), 1);
        Ok(())
    }

    #[test]
    fn downgrade_inside_window_keeps_reserve_order() -> std::result::Result<(), BearbyError> {
        let (_, mut registry) = registry()?;
        with_custom(&mut registry, &["a", "b", "c", "d", "e"])?;

        registry.downgrade_node_status("a")?;
        assert_eq!(registry.providers(), ["b", "c", "a"]);
        assert_eq!(registry.config()["custom"].providers, ["b", "c", "a", "d", "e"]);
        assert_eq!(registry.version(), 1);
        Ok(())
    }

    #[test]
    fn downgrade_at_window_edge_moves_to_end() -> std::result::Result<(), BearbyError> {
        let (_, mut registry) = registry()?;
        with_custom(&mut registry, &["a", "b", "c", "d"])?;

        registry.downgrade_node_status("c")?;
        assert_eq!(registry.config()["custom"].providers, ["a", "b", "d", "c"]);

        registry.downgrade_node_status("d")?;
        assert_eq!(registry.config()["custom"].providers, ["a", "b", "c", "d"]);
        Ok(())
    }

    #[test]
    fn downgrade_when_list_fits_window_rotates_head_to_tail() -> std::result::Result<(), BearbyError> {
        let (_, mut registry) = registry()?;
        with_custom(&mut registry, &["a", "b"])?;

        registry.downgrade_node_status("a")?;
        assert_eq!(registry.providers(), ["b", "a"]);
        Ok(())
    }

    #[test]
    fn downgrade_unknown_endpoint_rejected() -> std::result::Result<(), BearbyError> {
        let (_, mut registry) = registry()?;
        assert!(matches!(
            registry.downgrade_node_status("localhost:1"),
            Err(BearbyError::InvalidNetwork { .. })
        ));
        Ok(())
    }

    #[test]
    fn zero_nodes_count_rejected() -> std::result::Result<(), BearbyError> {
        let (_, mut registry) = registry()?;
        assert!(matches!(
            registry.set_nodes_count(0),
            Err(BearbyError::ConfigError { .. })
        ));
        assert_eq!(registry.count(), 3);
        Ok(())
    }

    #[test]
    fn node_management_keeps_version() -> std::result::Result<(), BearbyError> {
        let (_, mut registry) = registry()?;
        with_custom(&mut registry, &["a", "b"])?;

        registry.add_node(" c ")?;
        assert_eq!(registry.providers(), ["a", "b", "c"]);
        assert!(matches!(registry.add_node("a"), Err(BearbyError::ConfigError { .. })));
        assert!(registry.add_node("  ").is_err());

        registry.sort_nodes(&["c".into(), "a".into(), "b".into()])?;
        assert_eq!(registry.providers(), ["c", "a", "b"]);
        assert!(registry.sort_nodes(&["c".into(), "a".into()]).is_err());

        registry.remove_node("a")?;
        registry.remove_node("c")?;
        assert_eq!(registry.providers(), ["b"]);
        assert!(matches!(registry.remove_node("b"), Err(BearbyError::ConfigError { .. })));
        assert!(matches!(registry.remove_node("x"), Err(BearbyError::InvalidNetwork { .. })));

        assert_eq!(registry.version(), 1);
        Ok(())
    }

    #[test]
    fn unusable_stored_selection_falls_back() -> std::result::Result<(), BearbyError> {
        let (storage, _) = registry()?;
        write_json(&*storage, keys::NETWORK_SELECTED, "gone")?;
        write_json(&*storage, keys::NETWORK_COUNT, &0usize)?;

        let mut registry = NetworkRegistry::new(storage, &AppConfig::default())?;
        registry.sync()?;
        assert_eq!(registry.selected(), "mainnet");
        assert_eq!(registry.count(), 3);
        Ok(())
    }
}
