//! Argon2id password → vault key derivation.
//!
//! Cost parameters come from [`Argon2Config`] so tests and low-power
//! deployments can lower them without touching call sites.

use bearby_types::config::Argon2Config;
use bearby_types::{BearbyError, Result};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of the random salt stored next to the vault ciphertext.
pub const SALT_LEN: usize = 32;

/// Shortest salt accepted by [`derive_vault_key`].
const MIN_SALT_LEN: usize = 8;

// ---------------------------------------------------------------------------
// VaultKey
// ---------------------------------------------------------------------------

/// 256-bit symmetric key, zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct VaultKey([u8; 32]);

impl VaultKey {
    /// Fixed byte length of the key.
    pub const LEN: usize = 32;

    /// Returns the raw key material.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

// VaultKey does not implement Clone/Debug to prevent leakage.

/// Draws a fresh [`SALT_LEN`]-byte salt from the OS CSPRNG.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Stretches `password` into a [`VaultKey`] with Argon2id v1.3.
///
/// # Errors
///
/// - `ConfigError` if the salt is shorter than 8 bytes or the cost
///   parameters are rejected by `argon2`.
/// - `CryptoError` if hashing itself fails.
pub fn derive_vault_key(password: &[u8], salt: &[u8], params: &Argon2Config) -> Result<VaultKey> {
    if salt.len() < MIN_SALT_LEN {
        return Err(BearbyError::ConfigError {
            reason: format!("salt must be at least {MIN_SALT_LEN} bytes, got {}", salt.len()),
        });
    }

    let argon2_params = argon2::Params::new(
        params.m_cost,
        params.t_cost,
        params.p_cost,
        Some(VaultKey::LEN),
    )
    .map_err(|e| BearbyError::ConfigError {
        reason: format!("invalid Argon2 parameters: {e}"),
    })?;

    let hasher = argon2::Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon2_params,
    );

    let mut key = VaultKey([0u8; 32]);
    hasher
        .hash_password_into(password, salt, &mut key.0)
        .map_err(|e| BearbyError::CryptoError {
            reason: format!("Argon2id derivation failed: {e}"),
        })?;

    Ok(key)
}
