//! Account records held by the ledger.

use std::fmt;

use bearby_crypto::aead::SealedBox;
use bearby_crypto::keys::PublicKey;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// AccountKind
// ---------------------------------------------------------------------------

/// Origin of an account's key.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AccountKind {
    /// Derived from the vault seed at `m/44'/632'/0'/0'/index'`.
    Seed,
    /// Imported private key, sealed under a key derived from the seed.
    PrivateKey {
        /// Encrypted 32-byte private key.
        sealed_key: SealedBox,
    },
    /// Ledger hardware signer.
    Ledger,
    /// Trezor hardware signer.
    Trezor,
}

impl AccountKind {
    /// Short label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Seed => "seed",
            Self::PrivateKey { .. } => "private-key",
            Self::Ledger => "ledger",
            Self::Trezor => "trezor",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// AccountBalance
// ---------------------------------------------------------------------------

/// Balance as reported by the chain API (decimal strings).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalance {
    /// Balance in final (irreversible) state.
    pub final_balance: String,
    /// Balance including pending operations.
    pub candidate_balance: String,
}

impl Default for AccountBalance {
    fn default() -> Self {
        Self {
            final_balance: "0".into(),
            candidate_balance: "0".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// One addressable identity.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Key origin, flattened so `type` sits beside the other fields.
    #[serde(flatten)]
    pub kind: AccountKind,
    /// Index within `kind`'s own counter.
    pub index: u32,
    /// User-visible name.
    pub name: String,
    /// Ed25519 public key.
    pub pub_key: PublicKey,
    /// Base58 address of `pub_key`.
    pub address: String,
    /// Last known balance.
    #[serde(default)]
    pub balance: AccountBalance,
}

// ---------------------------------------------------------------------------
// IndexCounters
// ---------------------------------------------------------------------------

/// Next unused index per account kind. Only ever incremented.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexCounters {
    /// `lastIndexSeed`.
    pub seed: u32,
    /// `lastIndexPrivKey`.
    pub private_key: u32,
    /// `lastIndexLedger`.
    pub ledger: u32,
    /// `lastIndexTrezor`.
    pub trezor: u32,
}

impl IndexCounters {
    /// Mutable counter for `kind`.
    pub fn slot_mut(&mut self, kind: &AccountKind) -> &mut u32 {
        match kind {
            AccountKind::Seed => &mut self.seed,
            AccountKind::PrivateKey { .. } => &mut self.private_key,
            AccountKind::Ledger => &mut self.ledger,
            AccountKind::Trezor => &mut self.trezor,
        }
    }
}

// ---------------------------------------------------------------------------
// Wallet
// ---------------------------------------------------------------------------

/// Ordered identities plus the selected position.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    /// Accounts in insertion order.
    pub identities: Vec<Account>,
    /// Position into `identities` (not a per-kind index).
    pub selected_address: usize,
}

impl Wallet {
    /// Entry at `selected_address`, if any.
    pub fn selected(&self) -> Option<&Account> {
        self.identities.get(self.selected_address)
    }

    /// Returns `true` if some account already uses `pub_key`.
    pub fn contains_key(&self, pub_key: &PublicKey) -> bool {
        self.identities.iter().any(|a| &a.pub_key == pub_key)
    }
}
