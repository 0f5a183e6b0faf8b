//! Requests accepted by the background core and their replies.
//!
//! [`Request`] is the typed payload a UI surface sends; every request
//! produces exactly one `Result<Response>`. [`CoreCommand`] wraps a
//! request with its `oneshot` reply channel for the command loop.

use std::collections::HashMap;
use std::fmt;

use bearby_network::NetworkConfig;
use bearby_types::Result;
use bearby_wallet::AccountBalance;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::state::WalletSnapshot;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Operations exposed across the messaging boundary.
#[derive(Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Request {
    /// Generate a fresh mnemonic of `strength` bits.
    RandomWords {
        /// Entropy bits (128..=256, step 32).
        strength: usize,
    },
    /// Wipe the ledger, set up a new vault and derive the first account.
    CreateWallet {
        /// Mnemonic phrase.
        words: String,
        /// Vault password.
        password: String,
        /// Name of the first account.
        name: String,
    },
    /// Unlock the vault.
    Unlock {
        /// Vault password.
        password: String,
    },
    /// Drop the decrypted seed.
    Logout,
    /// Current state, allowed while locked.
    GetState,
    /// Derive the next seed account.
    CreateAccount {
        /// Account name.
        name: String,
    },
    /// Import an `S...` private key.
    RestoreKey {
        /// Private key text.
        key: String,
        /// Account name.
        name: String,
    },
    /// Select the account at `position`.
    SelectAccount {
        /// Ledger position.
        position: usize,
    },
    /// Remove the selected account.
    RemoveAccount,
    /// Rename the account at `position`.
    SetAccountName {
        /// Ledger position.
        position: usize,
        /// New name.
        name: String,
    },
    /// Merge balances fetched from the chain, keyed by address.
    UpdateBalances {
        /// Address → balance.
        balances: HashMap<String, AccountBalance>,
    },
    /// Switch networks.
    SelectNetwork {
        /// Network name.
        name: String,
    },
    /// Full network mapping, including reserve providers.
    GetNetworkConfig,
    /// Replace the network mapping.
    SetNetworkConfig {
        /// New mapping.
        config: NetworkConfig,
    },
    /// Change the exposed-provider cap.
    SetNodesCount {
        /// New cap.
        count: usize,
    },
    /// Add a provider to the selected network.
    AddNode {
        /// Endpoint.
        endpoint: String,
    },
    /// Remove a provider from the selected network.
    RemoveNode {
        /// Endpoint.
        endpoint: String,
    },
    /// Reorder the selected network's providers.
    SortNodes {
        /// Every provider, in the new order.
        order: Vec<String>,
    },
    /// Demote a provider that failed.
    DowngradeNode {
        /// Endpoint.
        endpoint: String,
    },
    /// Reveal the private key of the account at `position`.
    ExportPrivateKey {
        /// Ledger position.
        position: usize,
    },
    /// Destroy the vault and the ledger.
    Reset,
}

impl Request {
    /// Stable name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RandomWords { .. } => "random_words",
            Self::CreateWallet { .. } => "create_wallet",
            Self::Unlock { .. } => "unlock",
            Self::Logout => "logout",
            Self::GetState => "get_state",
            Self::CreateAccount { .. } => "create_account",
            Self::RestoreKey { .. } => "restore_key",
            Self::SelectAccount { .. } => "select_account",
            Self::RemoveAccount => "remove_account",
            Self::SetAccountName { .. } => "set_account_name",
            Self::UpdateBalances { .. } => "update_balances",
            Self::SelectNetwork { .. } => "select_network",
            Self::GetNetworkConfig => "get_network_config",
            Self::SetNetworkConfig { .. } => "set_network_config",
            Self::SetNodesCount { .. } => "set_nodes_count",
            Self::AddNode { .. } => "add_node",
            Self::RemoveNode { .. } => "remove_node",
            Self::SortNodes { .. } => "sort_nodes",
            Self::DowngradeNode { .. } => "downgrade_node",
            Self::ExportPrivateKey { .. } => "export_private_key",
            Self::Reset => "reset",
        }
    }
}

// Manual Debug so passwords, phrases and keys never reach a log line.
impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("type", &self.name())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Success values.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Response {
    /// A generated mnemonic.
    Words(String),
    /// The wallet state after the operation.
    State(WalletSnapshot),
    /// The full network mapping.
    NetworkConfig(NetworkConfig),
    /// An exported `S...` private key.
    PrivateKey(String),
}

// ---------------------------------------------------------------------------
// CoreCommand
// ---------------------------------------------------------------------------

/// Messages accepted by the command loop.
pub enum CoreCommand {
    /// Run `request` and send the outcome to `reply`.
    Request {
        /// Operation to run.
        request: Request,
        /// Reply channel.
        reply: oneshot::Sender<Result<Response>>,
    },
    /// Stop the loop after the commands already queued.
    Shutdown,
}

// Manual Debug because oneshot::Sender does not implement Debug.
impl fmt::Debug for CoreCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request { request, .. } => f
                .debug_struct("Request")
                .field("request", request)
                .finish_non_exhaustive(),
            Self::Shutdown => f.write_str("Shutdown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_json_shape() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let json = r#"{"type":"select_account","payload":{"position":2}}"#;
        let request: Request = serde_json::from_str(json)?;
        assert_eq!(request, Request::SelectAccount { position: 2 });

        let unit: Request = serde_json::from_str(r#"{"type":"get_state"}"#)?;
        assert_eq!(unit, Request::GetState);
        Ok(())
    }

    #[test]
    fn debug_hides_secrets() {
        let request = Request::Unlock {
            password: "hunter2".into(),
        };
        let printed = format!("{request:?}");
        assert!(printed.contains("unlock"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn response_json_shape() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string(&Response::Words("abandon about".into()))?;
        assert_eq!(json, r#"{"type":"words","payload":"abandon about"}"#);
        Ok(())
    }
}
