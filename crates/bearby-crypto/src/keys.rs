//! Ed25519 key material and its text encodings.
//!
//! A private key is the raw 32-byte Ed25519 secret scalar seed. Its
//! text form is `"S"` followed by the base58check encoding of
//! `varint(VERSION_NUMBER) || key`. The public key is the Ed25519
//! verifying key derived from it.

use std::fmt;

use bearby_types::{BearbyError, Result};
use ed25519_dalek::SigningKey;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::base58::{base58check_decode, base58check_encode};
use crate::varint::{decode_varint, encode_varint};
use crate::VERSION_NUMBER;

/// Leading character of an encoded private key.
pub const PRIVATE_KEY_PREFIX: char = 'S';

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// Ed25519 public key (32 bytes).
///
/// Serialized as a lowercase hex string.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct PublicKey([u8; 32]);

impl PublicKey {
    /// Fixed byte length of an Ed25519 public key.
    pub const LEN: usize = 32;

    /// Creates a [`PublicKey`] from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying 32-byte array.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parses a 64-character hex string.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` on bad hex or a wrong length.
    pub fn from_hex(text: &str) -> Result<Self> {
        let raw = hex::decode(text).map_err(|e| BearbyError::InvalidKey {
            reason: format!("public key is not hex: {e}"),
        })?;
        let bytes: [u8; 32] = raw.as_slice().try_into().map_err(|_| BearbyError::InvalidKey {
            reason: format!("public key must be {} bytes, got {}", Self::LEN, raw.len()),
        })?;
        Ok(Self(bytes))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_hex(&text).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// PrivateKey
// ---------------------------------------------------------------------------

/// Ed25519 private key (32 bytes), zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey([u8; 32]);

impl PrivateKey {
    /// Fixed byte length of an Ed25519 private key.
    pub const LEN: usize = 32;

    /// Wraps raw key bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Builds a key from a slice of exactly [`Self::LEN`] bytes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` for any other length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| BearbyError::InvalidKey {
            reason: format!("private key must be {} bytes, got {}", Self::LEN, bytes.len()),
        })?;
        Ok(Self(arr))
    }

    /// Returns the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Derives the matching public key.
    pub fn public_key(&self) -> PublicKey {
        let signing_key = SigningKey::from_bytes(&self.0);
        PublicKey(signing_key.verifying_key().to_bytes())
    }
}

// PrivateKey does not implement Clone/Debug to prevent leakage.

// ---------------------------------------------------------------------------
// Codec functions
// ---------------------------------------------------------------------------

/// Derives the public key bytes for a raw private key.
///
/// # Errors
///
/// Returns `InvalidKey` if `private_key` is not 32 bytes long.
pub fn public_key_from_private_key(private_key: &[u8]) -> Result<PublicKey> {
    Ok(PrivateKey::from_slice(private_key)?.public_key())
}

/// Encodes a private key in its `S...` text form.
pub fn private_key_to_base58(key: &PrivateKey) -> String {
    let mut payload = encode_varint(VERSION_NUMBER);
    payload.extend_from_slice(key.as_bytes());
    let encoded = base58check_encode(&payload);
    payload.zeroize();
    format!("{PRIVATE_KEY_PREFIX}{encoded}")
}

/// Parses a private key from its `S...` text form.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns `InvalidKey` when the prefix, checksum, version or key
/// length is wrong.
pub fn private_key_from_base58(text: &str) -> Result<PrivateKey> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix(PRIVATE_KEY_PREFIX)
        .ok_or_else(|| BearbyError::InvalidKey {
            reason: format!("private key must start with '{PRIVATE_KEY_PREFIX}'"),
        })?;

    let mut payload = base58check_decode(body).map_err(|e| BearbyError::InvalidKey {
        reason: e.to_string(),
    })?;

    let result = split_versioned_key(&payload);
    payload.zeroize();
    result
}

fn split_versioned_key(payload: &[u8]) -> Result<PrivateKey> {
    let (version, used) = decode_varint(payload).map_err(|e| BearbyError::InvalidKey {
        reason: e.to_string(),
    })?;

    if version != VERSION_NUMBER {
        return Err(BearbyError::InvalidKey {
            reason: format!("unsupported private key version {version}"),
        });
    }

    PrivateKey::from_slice(&payload[used..])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
