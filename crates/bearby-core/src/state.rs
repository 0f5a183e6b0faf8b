//! The background state aggregate.
//!
//! [`BackgroundState`] owns one storage handle and the three stateful
//! components built on it. It is constructed once per process, synced
//! once, and then driven exclusively through
//! [`BackgroundState::handle`](crate::handler).

use std::sync::Arc;

use bearby_network::NetworkRegistry;
use bearby_storage::Storage;
use bearby_types::config::AppConfig;
use bearby_types::{GuardState, Result};
use bearby_wallet::{AccountLedger, Guard, Wallet};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// Exposed view of the network registry.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSnapshot {
    /// Selected network name.
    pub selected: String,
    /// Exposed providers, head first.
    pub providers: Vec<String>,
    /// Config version of the selected network.
    pub version: u32,
    /// Cap on exposed providers.
    pub count: usize,
}

/// Everything a UI needs to render the wallet.
///
/// Holds public data only: guard flags, accounts, selection and the
/// network view.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSnapshot {
    /// Vault guard flags.
    pub guard: GuardState,
    /// Identities and selected position.
    pub wallet: Wallet,
    /// Network view.
    pub network: NetworkSnapshot,
}

// ---------------------------------------------------------------------------
// BackgroundState
// ---------------------------------------------------------------------------

/// Single owner of all wallet state in the process.
pub struct BackgroundState {
    storage: Arc<dyn Storage>,
    pub(crate) guard: Guard,
    pub(crate) ledger: AccountLedger,
    pub(crate) network: NetworkRegistry,
}

impl BackgroundState {
    /// Builds the components over `storage`. Call [`Self::sync`] next.
    ///
    /// # Errors
    ///
    /// `ConfigError` or `InvalidNetwork` if `config` is invalid.
    pub fn new(storage: Arc<dyn Storage>, config: &AppConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            guard: Guard::new(storage.clone(), config.argon2),
            ledger: AccountLedger::new(storage.clone()),
            network: NetworkRegistry::new(storage.clone(), config)?,
            storage,
        })
    }

    /// Loads every component from storage. The guard always comes back
    /// locked or uninitialized.
    ///
    /// # Errors
    ///
    /// `StorageError` if a stored record is unreadable.
    pub fn sync(&mut self) -> Result<()> {
        self.guard.sync()?;
        self.ledger.sync()?;
        self.network.sync()?;
        tracing::info!(
            status = %self.guard.state().status(),
            accounts = self.ledger.wallet().identities.len(),
            network = %self.network.selected(),
            "background state synced"
        );
        Ok(())
    }

    /// Vault guard.
    pub fn guard(&self) -> &Guard {
        &self.guard
    }

    /// Account ledger.
    pub fn ledger(&self) -> &AccountLedger {
        &self.ledger
    }

    /// Network registry.
    pub fn network(&self) -> &NetworkRegistry {
        &self.network
    }

    /// Storage shared by all components.
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Current public state.
    pub fn snapshot(&self) -> WalletSnapshot {
        WalletSnapshot {
            guard: self.guard.state(),
            wallet: self.ledger.wallet().clone(),
            network: NetworkSnapshot {
                selected: self.network.selected().to_string(),
                providers: self.network.providers().to_vec(),
                version: self.network.version(),
                count: self.network.count(),
            },
        }
    }
}
