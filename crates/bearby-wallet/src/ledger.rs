//! Account ledger: ordered identities, per-kind counters and selection.
//!
//! Every mutating operation builds the next state on the side, persists
//! it, and only then replaces the in-memory copy. A failed call leaves
//! both storage and memory as they were.

use std::collections::HashMap;
use std::sync::Arc;

use bearby_crypto::aead::{self, SealedBox};
use bearby_crypto::address::address_from_public_key;
use bearby_crypto::hd_derive::derive_account;
use bearby_crypto::hkdf::{derive_subkey, SubKey};
use bearby_crypto::keys::{private_key_from_base58, private_key_to_base58, PrivateKey};
use bearby_crypto::mnemonic::Seed;
use bearby_storage::{keys, read_json, write_json, Storage};
use bearby_types::{BearbyError, Result};
use serde::{Deserialize, Serialize};

use crate::account::{Account, AccountBalance, AccountKind, IndexCounters, Wallet};
use crate::guard::Guard;

/// HKDF info for the key sealing imported private keys.
const IMPORTED_KEY_INFO: &[u8] = b"bearby/imported-private-key";

/// Persisted form of the ledger.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LedgerRecord {
    wallet: Wallet,
    last_index: IndexCounters,
}

/// The account ledger.
pub struct AccountLedger {
    storage: Arc<dyn Storage>,
    record: LedgerRecord,
}

impl AccountLedger {
    /// Creates an empty ledger. Call [`Self::sync`] to load storage.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            record: LedgerRecord::default(),
        }
    }

    // -- Accessors --------------------------------------------------------

    /// Identities and selection.
    pub fn wallet(&self) -> &Wallet {
        &self.record.wallet
    }

    /// Per-kind index watermarks.
    pub fn counters(&self) -> IndexCounters {
        self.record.last_index
    }

    /// Entry at the selected position.
    pub fn selected_account(&self) -> Option<&Account> {
        self.record.wallet.selected()
    }

    // -- Persistence ------------------------------------------------------

    /// Loads identities, counters and selection from storage.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the stored record is unreadable.
    pub fn sync(&mut self) -> Result<()> {
        self.record = read_json(&*self.storage, keys::WALLET)?.unwrap_or_default();
        tracing::debug!(accounts = self.record.wallet.identities.len(), "ledger synced");
        Ok(())
    }

    fn commit(&mut self, next: LedgerRecord) -> Result<()> {
        write_json(&*self.storage, keys::WALLET, &next)?;
        self.record = next;
        tracing::debug!("ledger persisted");
        Ok(())
    }

    fn append(&mut self, account: Account) -> Result<Account> {
        if self.record.wallet.contains_key(&account.pub_key) {
            return Err(BearbyError::AccountMustBeUnique);
        }

        let mut next = self.record.clone();
        *next.last_index.slot_mut(&account.kind) += 1;
        next.wallet.identities.push(account.clone());
        next.wallet.selected_address = next.wallet.identities.len() - 1;
        self.commit(next)?;

        tracing::info!(
            kind = %account.kind,
            index = account.index,
            address = %account.address,
            "account added"
        );
        Ok(account)
    }

    fn check_position(&self, position: usize) -> Result<()> {
        let len = self.record.wallet.identities.len();
        if position >= len {
            return Err(BearbyError::IncorrectAccount {
                reason: format!("position {position} out of range (len {len})"),
            });
        }
        Ok(())
    }

    // -- Adding -----------------------------------------------------------

    /// Derives the next seed account and selects it.
    ///
    /// # Errors
    ///
    /// - `SessionLocked` if the guard is locked.
    /// - `AccountMustBeUnique` if the derived key is already present
    ///   (e.g. previously imported as a private key).
    pub fn add_account_from_seed(&mut self, guard: &Guard, name: &str) -> Result<Account> {
        guard.check_session()?;
        let account = seed_account(guard.seed()?, self.record.last_index.seed, name)?;
        self.append(account)
    }

    /// Replaces every identity with `first`, the seed account at index 0
    /// of a new vault, and selects it.
    ///
    /// # Errors
    ///
    /// `StorageError` if persisting fails; the old ledger stays in place.
    pub fn start_over(&mut self, first: Account) -> Result<Account> {
        let mut next = LedgerRecord::default();
        *next.last_index.slot_mut(&first.kind) += 1;
        next.wallet.identities.push(first.clone());
        self.commit(next)?;

        tracing::info!(address = %first.address, "ledger restarted");
        Ok(first)
    }

    /// Imports a `S...` private key and selects it.
    ///
    /// The key is stored sealed under a seed-derived key.
    ///
    /// # Errors
    ///
    /// - `SessionLocked` if the guard is locked.
    /// - `InvalidKey` if `key_text` is malformed.
    /// - `AccountMustBeUnique` if the key is already present.
    pub fn add_account_from_private_key(
        &mut self,
        guard: &Guard,
        key_text: &str,
        name: &str,
    ) -> Result<Account> {
        guard.check_session()?;
        let private_key = private_key_from_base58(key_text)?;
        let pub_key = private_key.public_key();

        if self.record.wallet.contains_key(&pub_key) {
            return Err(BearbyError::AccountMustBeUnique);
        }

        let seal_key = imported_key_cipher(guard)?;
        let sealed_key = aead::seal(seal_key.as_bytes(), private_key.as_bytes(), pub_key.as_bytes())?;

        self.append(Account {
            kind: AccountKind::PrivateKey { sealed_key },
            index: self.record.last_index.private_key,
            name: name.trim().to_string(),
            address: address_from_public_key(&pub_key),
            pub_key,
            balance: AccountBalance::default(),
        })
    }

    // -- Selection and removal -------------------------------------------

    /// Selects the account at `position`.
    ///
    /// # Errors
    ///
    /// `IncorrectAccount` if out of range.
    pub fn select(&mut self, position: usize) -> Result<()> {
        self.check_position(position)?;
        let mut next = self.record.clone();
        next.wallet.selected_address = position;
        self.commit(next)
    }

    /// Removes the account at `position` and re-normalizes selection.
    ///
    /// Position 0 is the primary account and cannot be removed, which
    /// also keeps the ledger from ever becoming empty through removal.
    ///
    /// # Errors
    ///
    /// `IncorrectAccount` if out of range or `position == 0`.
    pub fn remove(&mut self, position: usize) -> Result<()> {
        self.check_position(position)?;
        if position == 0 {
            return Err(BearbyError::IncorrectAccount {
                reason: "the primary account cannot be removed".into(),
            });
        }

        let mut next = self.record.clone();
        let removed = next.wallet.identities.remove(position);

        let selected = &mut next.wallet.selected_address;
        if position <= *selected {
            *selected = selected.saturating_sub(1);
        }
        *selected = (*selected).min(next.wallet.identities.len() - 1);

        self.commit(next)?;
        tracing::info!(position, address = %removed.address, "account removed");
        Ok(())
    }

    // -- Editing ----------------------------------------------------------

    /// Renames the account at `position`.
    ///
    /// # Errors
    ///
    /// `SessionLocked` if locked, `IncorrectAccount` if out of range.
    pub fn change_account_name(&mut self, guard: &Guard, position: usize, name: &str) -> Result<()> {
        guard.check_session()?;
        self.check_position(position)?;

        let mut next = self.record.clone();
        next.wallet.identities[position].name = name.trim().to_string();
        self.commit(next)
    }

    /// Merges balances keyed by address. Unknown addresses are ignored.
    ///
    /// # Errors
    ///
    /// `SessionLocked` if locked.
    pub fn update_balance(
        &mut self,
        guard: &Guard,
        balances: &HashMap<String, AccountBalance>,
    ) -> Result<()> {
        guard.check_session()?;

        let mut next = self.record.clone();
        for account in &mut next.wallet.identities {
            if let Some(balance) = balances.get(&account.address) {
                account.balance = balance.clone();
            }
        }
        self.commit(next)
    }

    /// Returns the `S...` text form of the key at `position`.
    ///
    /// # Errors
    ///
    /// - `SessionLocked` if locked.
    /// - `IncorrectAccount` if out of range or a hardware account.
    /// - `CryptoError` if a sealed key fails to open.
    pub fn export_private_key(&self, guard: &Guard, position: usize) -> Result<String> {
        guard.check_session()?;
        self.check_position(position)?;
        let account = &self.record.wallet.identities[position];

        let private_key = match &account.kind {
            AccountKind::Seed => derive_account(guard.seed()?, account.index)?.private_key,
            AccountKind::PrivateKey { sealed_key } => open_imported_key(guard, sealed_key, account)?,
            AccountKind::Ledger | AccountKind::Trezor => {
                return Err(BearbyError::IncorrectAccount {
                    reason: format!("{} accounts hold no exportable key", account.kind),
                });
            }
        };
        Ok(private_key_to_base58(&private_key))
    }

    /// Clears identities, counters and selection.
    ///
    /// # Errors
    ///
    /// `StorageError` if persisting fails.
    pub fn reset(&mut self) -> Result<()> {
        self.commit(LedgerRecord::default())?;
        tracing::info!("ledger reset");
        Ok(())
    }
}

/// Builds the seed account at `index` without adding it to any ledger.
///
/// # Errors
///
/// `CryptoError` if derivation fails.
pub fn seed_account(seed: &Seed, index: u32, name: &str) -> Result<Account> {
    let pair = derive_account(seed, index)?;
    Ok(Account {
        kind: AccountKind::Seed,
        index,
        name: name.trim().to_string(),
        pub_key: pair.public_key,
        address: pair.address,
        balance: AccountBalance::default(),
    })
}

fn imported_key_cipher(guard: &Guard) -> Result<SubKey> {
    derive_subkey(guard.seed()?.as_bytes(), b"", IMPORTED_KEY_INFO)
}

fn open_imported_key(guard: &Guard, sealed: &SealedBox, account: &Account) -> Result<PrivateKey> {
    let seal_key = imported_key_cipher(guard)?;
    let plaintext = aead::open(seal_key.as_bytes(), sealed, account.pub_key.as_bytes())?;
    PrivateKey::from_slice(&plaintext)
}
