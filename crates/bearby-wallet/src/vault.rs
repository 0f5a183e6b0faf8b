//! Encrypted-at-rest container for the wallet seed.
//!
//! [`EncryptedVault`] is a plain record: Argon2id salt and cost
//! parameters plus an XChaCha20-Poly1305 sealed box. Sealing and
//! opening are pure functions of `(password, record)`; persistence is
//! the [`crate::guard::Guard`]'s job.

use bearby_crypto::aead::{self, SealedBox};
use bearby_crypto::kdf::{derive_vault_key, generate_salt, SALT_LEN};
use bearby_crypto::mnemonic::Seed;
use bearby_types::config::Argon2Config;
use bearby_types::{BearbyError, Result};
use serde::{Deserialize, Serialize};

/// Additional authenticated data binding the ciphertext to this format.
pub(crate) const VAULT_AAD: &[u8] = b"bearby-vault-v0";

/// Ciphertext of the seed plus everything needed to re-derive its key.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct EncryptedVault {
    /// Argon2id salt.
    pub salt: [u8; SALT_LEN],
    /// Argon2id cost parameters used when the vault was sealed.
    pub kdf: Argon2Config,
    /// Sealed 64-byte seed.
    pub sealed: SealedBox,
}

impl EncryptedVault {
    /// Encrypts `seed` under a key stretched from `password`.
    ///
    /// A fresh salt and nonce are drawn on every call.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` on invalid Argon2 parameters or
    /// `CryptoError` if encryption fails.
    pub fn seal(seed: &Seed, password: &str, kdf: &Argon2Config) -> Result<Self> {
        let salt = generate_salt();
        let key = derive_vault_key(password.as_bytes(), &salt, kdf)?;
        let sealed = aead::seal(key.as_bytes(), seed.as_bytes(), VAULT_AAD)?;
        Ok(Self {
            salt,
            kdf: *kdf,
            sealed,
        })
    }

    /// Decrypts the seed.
    ///
    /// # Errors
    ///
    /// - `IncorrectPassword` if authentication fails.
    /// - `CryptoError` if the plaintext is not a 64-byte seed.
    pub fn open(&self, password: &str) -> Result<Seed> {
        let key = derive_vault_key(password.as_bytes(), &self.salt, &self.kdf)?;
        let plaintext = aead::open(key.as_bytes(), &self.sealed, VAULT_AAD)
            .map_err(|_| BearbyError::IncorrectPassword)?;
        Seed::from_slice(&plaintext)
    }

    /// Encodes the record with bincode.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| BearbyError::StorageError {
            reason: format!("failed to encode vault: {e}"),
        })
    }

    /// Decodes a record produced by [`Self::to_bytes`].
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on malformed bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| BearbyError::StorageError {
            reason: format!("failed to decode vault: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light() -> Argon2Config {
        Argon2Config {
            m_cost: 64,
            t_cost: 1,
            p_cost: 1,
        }
    }

    #[test]
    fn seal_open_roundtrip() -> std::result::Result<(), BearbyError> {
        let seed = Seed::from_bytes([0x5a; 64]);
        let vault = EncryptedVault::seal(&seed, "test", &light())?;
        assert_eq!(vault.open("test")?.as_bytes(), seed.as_bytes());
        Ok(())
    }

    #[test]
    fn wrong_password_is_incorrect_password() -> std::result::Result<(), BearbyError> {
        let vault = EncryptedVault::seal(&Seed::from_bytes([1; 64]), "test", &light())?;
        assert!(matches!(vault.open("test1"), Err(BearbyError::IncorrectPassword)));
        Ok(())
    }

    #[test]
    fn resealing_changes_ciphertext() -> std::result::Result<(), BearbyError> {
        let seed = Seed::from_bytes([2; 64]);
        let a = EncryptedVault::seal(&seed, "pw", &light())?;
        let b = EncryptedVault::seal(&seed, "pw", &light())?;
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.sealed, b.sealed);
        Ok(())
    }

    #[test]
    fn bincode_roundtrip() -> std::result::Result<(), BearbyError> {
        let vault = EncryptedVault::seal(&Seed::from_bytes([3; 64]), "pw", &light())?;
        let decoded = EncryptedVault::from_bytes(&vault.to_bytes()?)?;
        assert_eq!(decoded, vault);
        assert_eq!(decoded.open("pw")?.as_bytes(), &[3; 64]);
        Ok(())
    }

    #[test]
    fn garbage_bytes_rejected() {
        assert!(matches!(
            EncryptedVault::from_bytes(&[0xff; 5]),
            Err(BearbyError::StorageError { .. })
        ));
    }
}
