//! Core shared types for the Bearby wallet core.
//!
//! This crate defines the types every other crate in the workspace
//! agrees on: the central [`BearbyError`], the [`Result`] alias, the
//! vault guard state and the application configuration.

pub mod config;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// GuardState
// ---------------------------------------------------------------------------

/// Snapshot of the vault guard flags.
///
/// - `is_ready` — an encrypted vault exists in storage.
/// - `is_enable` — the seed has been unlocked into memory this session.
///
/// `is_ready == false` always implies `is_enable == false`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardState {
    /// `true` while the decrypted seed is held in memory.
    pub is_enable: bool,
    /// `true` once a vault has been persisted.
    pub is_ready: bool,
}

impl GuardState {
    /// Returns the lifecycle status implied by the two flags.
    pub fn status(&self) -> WalletStatus {
        match (self.is_ready, self.is_enable) {
            (false, _) => WalletStatus::Uninitialized,
            (true, false) => WalletStatus::Locked,
            (true, true) => WalletStatus::Unlocked,
        }
    }
}

// ---------------------------------------------------------------------------
// WalletStatus
// ---------------------------------------------------------------------------

/// Represents the current state of the local vault.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum WalletStatus {
    /// No vault in storage; needs setup.
    Uninitialized,
    /// Vault exists but the seed is not decrypted in memory.
    Locked,
    /// Seed is decrypted and ready for derivation.
    Unlocked,
}

impl fmt::Display for WalletStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Locked => write!(f, "locked"),
            Self::Unlocked => write!(f, "unlocked"),
        }
    }
}

// ---------------------------------------------------------------------------
// BearbyError
// ---------------------------------------------------------------------------

/// Central error type for the wallet core.
///
/// All crates in the workspace convert their internal errors into variants
/// of this enum. Every variant is recoverable: the operation that produced
/// it left no persisted or in-memory side effect.
///
/// The enum is serializable so the messaging boundary can forward it as a
/// structured rejection.
#[derive(Clone, Debug, Eq, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BearbyError {
    /// The password did not decrypt the vault.
    #[error("incorrect password")]
    IncorrectPassword,

    /// An operation needing the decrypted seed ran while locked.
    #[error("session is locked")]
    SessionLocked,

    /// Another account already uses the same public key.
    #[error("account must be unique")]
    AccountMustBeUnique,

    /// An account position is out of range or may not be removed.
    #[error("incorrect account: {reason}")]
    IncorrectAccount {
        /// Human-readable description of the rejected position.
        reason: String,
    },

    /// Malformed input to a codec primitive (varint, base58, checksums).
    #[error("codec error: {reason}")]
    CodecError {
        /// Human-readable description of the decoding failure.
        reason: String,
    },

    /// A private or public key is malformed.
    #[error("invalid key: {reason}")]
    InvalidKey {
        /// Human-readable description of why the key is invalid.
        reason: String,
    },

    /// The provided address is malformed or fails checksum validation.
    #[error("invalid address: {reason}")]
    InvalidAddress {
        /// Human-readable description of why the address is invalid.
        reason: String,
    },

    /// A mnemonic phrase or entropy length is invalid.
    #[error("invalid mnemonic: {reason}")]
    InvalidMnemonic {
        /// Human-readable description of the mnemonic failure.
        reason: String,
    },

    /// Unknown network, empty provider list or unknown provider.
    #[error("invalid network: {reason}")]
    InvalidNetwork {
        /// Human-readable description of the network problem.
        reason: String,
    },

    /// A cryptographic operation failed (derivation, encryption, decryption).
    #[error("crypto error: {reason}")]
    CryptoError {
        /// Human-readable description of the cryptographic failure.
        reason: String,
    },

    /// A storage or (de)serialization operation failed.
    #[error("storage error: {reason}")]
    StorageError {
        /// Human-readable description of the storage failure.
        reason: String,
    },

    /// A configuration value is invalid or missing.
    #[error("config error: {reason}")]
    ConfigError {
        /// Human-readable description of the configuration problem.
        reason: String,
    },

    /// The background command loop is no longer running.
    #[error("background core stopped")]
    CoreStopped,
}

// ---------------------------------------------------------------------------
// Result alias
// ---------------------------------------------------------------------------

/// Convenience result type using [`BearbyError`].
pub type Result<T> = std::result::Result<T, BearbyError>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_state_status() {
        let fresh = GuardState::default();
        assert_eq!(fresh.status(), WalletStatus::Uninitialized);

        let locked = GuardState { is_enable: false, is_ready: true };
        assert_eq!(locked.status(), WalletStatus::Locked);

        let unlocked = GuardState { is_enable: true, is_ready: true };
        assert_eq!(unlocked.status(), WalletStatus::Unlocked);
    }

    #[test]
    fn guard_state_serializes_camel_case() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let state = GuardState { is_enable: true, is_ready: true };
        let json = serde_json::to_string(&state)?;
        assert_eq!(json, r#"{"isEnable":true,"isReady":true}"#);
        Ok(())
    }

    #[test]
    fn wallet_status_display() {
        assert_eq!(WalletStatus::Locked.to_string(), "locked");
        assert_eq!(WalletStatus::Unlocked.to_string(), "unlocked");
        assert_eq!(WalletStatus::Uninitialized.to_string(), "uninitialized");
    }

    #[test]
    fn error_display() {
        let err = BearbyError::IncorrectAccount {
            reason: "position 7 out of range".into(),
        };
        assert!(err.to_string().contains("position 7"));
        assert_eq!(BearbyError::IncorrectPassword.to_string(), "incorrect password");
    }

    #[test]
    fn error_serde_json_roundtrip() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = BearbyError::CodecError {
            reason: "truncated varint".into(),
        };
        let json = serde_json::to_string(&err)?;
        assert!(json.contains(r#""kind":"codec_error""#));
        let parsed: BearbyError = serde_json::from_str(&json)?;
        assert_eq!(parsed, err);

        let unit = serde_json::to_string(&BearbyError::SessionLocked)?;
        assert_eq!(unit, r#"{"kind":"session_locked"}"#);
        Ok(())
    }
}
