//! Vault guard: the only owner of the decrypted seed.
//!
//! The guard tracks two flags:
//!
//! | `is_ready` | `is_enable` | state          |
//! |------------|-------------|----------------|
//! | false      | false       | Uninitialized  |
//! | true       | false       | Locked         |
//! | true       | true        | Unlocked       |
//!
//! `is_enable` is represented by the presence of the in-memory seed,
//! so it can never be set without a successful decryption.

use std::sync::Arc;

use bearby_crypto::mnemonic::{mnemonic_to_seed, validate_mnemonic, Seed};
use bearby_crypto::varint::{decode_varint, encode_varint};
use bearby_crypto::VERSION_NUMBER;
use bearby_storage::{keys, Storage};
use bearby_types::config::Argon2Config;
use bearby_types::{BearbyError, GuardState, Result};

use crate::vault::EncryptedVault;

/// Session state machine over the encrypted seed.
pub struct Guard {
    storage: Arc<dyn Storage>,
    kdf: Argon2Config,
    is_ready: bool,
    /// Decrypted seed; `Some` only while unlocked. Zeroized on drop.
    seed: Option<Seed>,
}

impl Guard {
    /// Creates an uninitialized guard. Call [`Self::sync`] before use.
    pub fn new(storage: Arc<dyn Storage>, kdf: Argon2Config) -> Self {
        Self {
            storage,
            kdf,
            is_ready: false,
            seed: None,
        }
    }

    // -- Accessors --------------------------------------------------------

    /// Current `{is_enable, is_ready}` flags.
    pub fn state(&self) -> GuardState {
        GuardState {
            is_enable: self.is_ready && self.seed.is_some(),
            is_ready: self.is_ready,
        }
    }

    /// Returns `true` while the seed is in memory.
    pub fn is_unlocked(&self) -> bool {
        self.state().is_enable
    }

    /// Fails with `SessionLocked` unless unlocked.
    pub fn check_session(&self) -> Result<()> {
        if self.is_unlocked() {
            Ok(())
        } else {
            Err(BearbyError::SessionLocked)
        }
    }

    /// Lends the seed to an unlocked caller for a single derivation.
    ///
    /// # Errors
    ///
    /// Returns `SessionLocked` if the guard is not unlocked.
    pub fn seed(&self) -> Result<&Seed> {
        self.check_session()?;
        self.seed.as_ref().ok_or(BearbyError::SessionLocked)
    }

    // -- Lifecycle --------------------------------------------------------

    /// Reloads `is_ready` from storage. Never unlocks.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if storage fails or the stored version
    /// marker is not one this build understands.
    pub fn sync(&mut self) -> Result<()> {
        if let Some(marker) = self.storage.get(keys::VAULT_VERSION)? {
            let (version, _) = decode_varint(&marker).map_err(|e| BearbyError::StorageError {
                reason: format!("corrupt vault version marker: {e}"),
            })?;
            if version != VERSION_NUMBER {
                return Err(BearbyError::StorageError {
                    reason: format!("unsupported vault version {version}"),
                });
            }
        }

        self.is_ready = self.storage.contains(keys::VAULT)?;
        self.seed = None;
        tracing::debug!(is_ready = self.is_ready, "guard synced");
        Ok(())
    }

    /// Creates (or replaces) the vault from a mnemonic and unlocks it.
    ///
    /// # Errors
    ///
    /// - `InvalidMnemonic` if `words` is not a valid BIP39 phrase.
    /// - `StorageError` if persisting fails; the previous vault, if
    ///   any, is left in place and the in-memory state is unchanged.
    pub fn setup_vault(&mut self, words: &str, password: &str) -> Result<()> {
        let setup = self.prepare_vault(words, password)?;
        self.commit_vault(setup)?;
        Ok(())
    }

    /// Derives the seed and seals it without touching storage.
    ///
    /// # Errors
    ///
    /// `InvalidMnemonic` for a bad phrase, `CryptoError` if sealing fails.
    pub fn prepare_vault(&self, words: &str, password: &str) -> Result<VaultSetup> {
        let phrase = validate_mnemonic(words)?;
        let seed = mnemonic_to_seed(phrase.as_str())?;
        let vault = EncryptedVault::seal(&seed, password, &self.kdf)?.to_bytes()?;
        Ok(VaultSetup { seed, vault })
    }

    /// Persists a prepared vault, then its version marker, and unlocks.
    ///
    /// The returned [`VaultRollback`] undoes the swap if a later step of
    /// the caller's operation fails.
    ///
    /// # Errors
    ///
    /// `StorageError` if either write fails. The previous vault bytes are
    /// put back and the in-memory state is unchanged.
    pub fn commit_vault(&mut self, setup: VaultSetup) -> Result<VaultRollback> {
        let previous = self.storage.get(keys::VAULT)?;
        self.storage.set(keys::VAULT, &setup.vault)?;

        if let Err(e) = self.storage.set(keys::VAULT_VERSION, &encode_varint(VERSION_NUMBER)) {
            self.restore_vault_bytes(previous.as_deref());
            return Err(e);
        }

        let rollback = VaultRollback {
            vault: previous,
            seed: self.seed.replace(setup.seed),
            is_ready: self.is_ready,
        };
        self.is_ready = true;
        tracing::info!("vault created");
        Ok(rollback)
    }

    /// Puts back the vault and session replaced by [`Self::commit_vault`].
    pub fn rollback(&mut self, rollback: VaultRollback) {
        self.restore_vault_bytes(rollback.vault.as_deref());
        self.seed = rollback.seed;
        self.is_ready = rollback.is_ready;
        tracing::warn!("vault change rolled back");
    }

    fn restore_vault_bytes(&self, previous: Option<&[u8]>) {
        let restored = match previous {
            Some(bytes) => self.storage.set(keys::VAULT, bytes),
            None => self.storage.remove(keys::VAULT),
        };
        if let Err(e) = restored {
            tracing::error!(error = %e, "failed to restore the previous vault");
        }
    }

    /// Decrypts the stored vault with `password`.
    ///
    /// Unlocking an already unlocked guard re-verifies the password.
    ///
    /// # Errors
    ///
    /// `IncorrectPassword` on a wrong password or when no vault exists.
    /// The guard state is unchanged on failure.
    pub fn unlock(&mut self, password: &str) -> Result<()> {
        let Some(raw) = self.storage.get(keys::VAULT)? else {
            tracing::warn!("unlock rejected: no vault");
            return Err(BearbyError::IncorrectPassword);
        };

        let vault = EncryptedVault::from_bytes(&raw)?;
        match vault.open(password) {
            Ok(seed) => {
                self.seed = Some(seed);
                self.is_ready = true;
                tracing::info!("vault unlocked");
                Ok(())
            }
            Err(e) => {
                tracing::warn!("unlock rejected");
                Err(e)
            }
        }
    }

    /// Drops the decrypted seed. The vault in storage is untouched.
    pub fn logout(&mut self) {
        self.seed = None;
        tracing::info!("vault locked");
    }

    /// Destroys the vault and its version marker.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if storage fails.
    pub fn reset(&mut self) -> Result<()> {
        self.storage.remove(keys::VAULT)?;
        self.storage.remove(keys::VAULT_VERSION)?;
        self.seed = None;
        self.is_ready = false;
        tracing::info!("vault destroyed");
        Ok(())
    }
}

// Guard does not implement Clone/Debug to prevent leakage.

/// A sealed vault and its seed, ready for [`Guard::commit_vault`].
pub struct VaultSetup {
    seed: Seed,
    vault: Vec<u8>,
}

impl VaultSetup {
    /// Seed the vault will hold once committed.
    pub fn seed(&self) -> &Seed {
        &self.seed
    }
}

/// What [`Guard::commit_vault`] replaced.
pub struct VaultRollback {
    vault: Option<Vec<u8>>,
    seed: Option<Seed>,
    is_ready: bool,
}
