//! Integration tests for bearby-network.
//!
//! Replays a full provider rotation session: switch to
//! testnet, register a custom network, demote its head, shrink the cap,
//! then reload everything in a second registry.

use std::sync::Arc;

use bearby_network::{NetworkEntry, NetworkRegistry};
use bearby_storage::{MemoryStorage, SledStorage, Storage};
use bearby_types::config::{AppConfig, COUNT_NODES};
use bearby_types::BearbyError;

// ---------------------------------------------------------------------------
// Test constants
// ---------------------------------------------------------------------------

const MAINNET_PROVIDER: &str = "https://massa.net/api/v2";
const TESTNET_PROVIDER: &str = "https://test.massa.net/api/v2";

const CUSTOM_PROVIDERS: [&str; 4] = ["localhost:3333", "localhost:2355", "localhost:634", "127.0.0.1:80"];

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open(storage: Arc<dyn Storage>) -> Result<NetworkRegistry, BearbyError> {
    NetworkRegistry::new(storage, &AppConfig::default())
}

fn assert_defaults(registry: &NetworkRegistry) {
    assert_eq!(registry.selected(), "mainnet");
    assert_eq!(registry.providers(), [MAINNET_PROVIDER]);
    assert_eq!(registry.version(), 0);
    assert_eq!(registry.count(), COUNT_NODES);
}

fn run_rotation_session(storage: Arc<dyn Storage>) -> Result<(), BearbyError> {
    let mut network = open(storage.clone())?;
    assert_defaults(&network);

    network.sync()?;
    network.set_network("testnet")?;
    assert_eq!(network.selected(), "testnet");
    assert_eq!(network.providers(), [TESTNET_PROVIDER]);
    assert_eq!(network.version(), 0);
    assert_eq!(network.count(), COUNT_NODES);

    let mut config = network.config().clone();
    config.insert("custom".into(), NetworkEntry::new(CUSTOM_PROVIDERS, 1));
    network.set_config(config)?;
    assert_eq!(network.selected(), "testnet");

    network.set_network("custom")?;
    assert_eq!(network.selected(), "custom");
    assert_eq!(network.providers()[0], "localhost:3333");
    assert_eq!(network.providers().len(), 3);
    assert_eq!(network.version(), 1);

    network.downgrade_node_status("localhost:3333")?;
    assert_eq!(network.providers()[0], "localhost:2355");
    assert_eq!(network.providers().last().map(String::as_str), Some("localhost:3333"));
    assert_eq!(network.config()["custom"].providers.len(), 4);

    network.set_nodes_count(2)?;
    assert_eq!(network.providers().len(), 2);
    assert_eq!(network.config()["custom"].providers.len(), 4);

    let mut reloaded = open(storage)?;
    assert_defaults(&reloaded);

    reloaded.sync()?;
    assert_eq!(reloaded.selected(), "custom");
    assert_eq!(reloaded.providers()[0], "localhost:2355");
    assert_eq!(reloaded.version(), 1);
    assert_eq!(reloaded.providers().len(), 2);
    assert_eq!(reloaded.count(), 2);
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn custom_network_rotation_session() -> Result<(), BearbyError> {
    run_rotation_session(Arc::new(MemoryStorage::new()))
}

#[test]
fn custom_network_rotation_session_on_sled() -> Result<(), BearbyError> {
    run_rotation_session(Arc::new(SledStorage::temporary()?))
}

#[test]
fn repeated_downgrades_cycle_the_window() -> Result<(), BearbyError> {
    let mut network = open(Arc::new(MemoryStorage::new()))?;
    let mut config = network.config().clone();
    config.insert("custom".into(), NetworkEntry::new(CUSTOM_PROVIDERS, 1));
    network.set_config(config)?;
    network.set_network("custom")?;

    let mut heads = Vec::new();
    for _ in 0..3 {
        let head = network.providers()[0].clone();
        network.downgrade_node_status(&head)?;
        heads.push(head);
    }

    assert_eq!(heads, ["localhost:3333", "localhost:2355", "localhost:634"]);
    assert_eq!(network.providers(), ["localhost:3333", "localhost:2355", "localhost:634"]);
    assert_eq!(network.config()["custom"].providers[3], "127.0.0.1:80");
    Ok(())
}

#[test]
fn config_edits_survive_reload() -> Result<(), BearbyError> {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let mut network = open(storage.clone())?;
    network.add_node("https://backup.massa.net/api/v2")?;
    network.sort_nodes(&[
        "https://backup.massa.net/api/v2".to_string(),
        MAINNET_PROVIDER.to_string(),
    ])?;

    let mut reloaded = open(storage)?;
    reloaded.sync()?;
    assert_eq!(reloaded.selected(), "mainnet");
    assert_eq!(
        reloaded.providers(),
        ["https://backup.massa.net/api/v2", MAINNET_PROVIDER]
    );
    assert!(reloaded.config().contains_key("labnet"));
    Ok(())
}
