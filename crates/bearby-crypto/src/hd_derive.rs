//! SLIP-0010 Ed25519 hierarchical deterministic key derivation.
//!
//! Account `i` lives at `m/44'/632'/0'/0'/i'`. Every component is
//! hardened; Ed25519 has no public-key-only child derivation, so a
//! non-hardened component is rejected.
//!
//! Reference: <https://github.com/satoshilabs/slips/blob/master/slip-0010.md>

use bearby_types::{BearbyError, Result};
use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::address::address_from_public_key;
use crate::keys::{PrivateKey, PublicKey};
use crate::mnemonic::Seed;

type HmacSha512 = Hmac<Sha512>;

/// SLIP-44 coin type of the target chain.
pub const COIN_TYPE: u32 = 632;

const HARDENED_OFFSET: u32 = 0x8000_0000;

/// HMAC key for master key generation.
const MASTER_HMAC_KEY: &[u8] = b"ed25519 seed";

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// Returns the canonical derivation path for account `index`.
pub fn get_path(index: u32) -> String {
    format!("m/44'/{COIN_TYPE}'/0'/0'/{index}'")
}

/// Parses `m/a'/b'/...` into raw (un-offset) child indices.
///
/// Both `'` and `h` are accepted as hardened markers.
///
/// # Errors
///
/// Returns `CryptoError` if the path does not start with `m/`, has an
/// empty or non-hardened component, or an index ≥ 2^31.
pub fn parse_path(path: &str) -> Result<Vec<u32>> {
    let invalid = |reason: String| BearbyError::CryptoError {
        reason: format!("invalid derivation path '{path}': {reason}"),
    };

    let rest = path
        .trim()
        .strip_prefix("m/")
        .ok_or_else(|| invalid("must start with 'm/'".into()))?;

    rest.split('/')
        .map(|part| {
            let digits = part
                .strip_suffix('\'')
                .or_else(|| part.strip_suffix('h'))
                .ok_or_else(|| invalid(format!("component '{part}' is not hardened")))?;

            let index: u32 = digits
                .parse()
                .map_err(|e| invalid(format!("component '{part}': {e}")))?;

            if index >= HARDENED_OFFSET {
                return Err(invalid(format!("index {index} out of range")));
            }
            Ok(index)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// ExtendedKey
// ---------------------------------------------------------------------------

/// A SLIP-0010 node: private key plus chain code.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ExtendedKey {
    key: [u8; 32],
    chain_code: [u8; 32],
}

// ExtendedKey does not implement Clone/Debug to prevent leakage.

impl ExtendedKey {
    /// Master node of `seed`.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError` if the HMAC cannot be keyed.
    pub fn master(seed: &[u8]) -> Result<Self> {
        Self::from_hmac(MASTER_HMAC_KEY, &[seed])
    }

    /// Hardened child at `index` (the offset is applied here).
    ///
    /// # Errors
    ///
    /// Returns `CryptoError` if the HMAC cannot be keyed.
    pub fn derive_hardened(&self, index: u32) -> Result<Self> {
        let hardened = (index | HARDENED_OFFSET).to_be_bytes();
        Self::from_hmac(&self.chain_code, &[&[0x00u8][..], &self.key[..], &hardened[..]])
    }

    /// Raw private key bytes of this node.
    pub fn private_key_bytes(&self) -> &[u8; 32] {
        &self.key
    }

    /// Chain code of this node.
    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// Builds the Ed25519 key pair and address for this node.
    pub fn key_pair(&self) -> DerivedKeyPair {
        let private_key = PrivateKey::from_bytes(self.key);
        let public_key = private_key.public_key();
        let address = address_from_public_key(&public_key);
        DerivedKeyPair {
            private_key,
            public_key,
            address,
        }
    }

    fn from_hmac(key: &[u8], parts: &[&[u8]]) -> Result<Self> {
        let mut mac = HmacSha512::new_from_slice(key).map_err(|e| BearbyError::CryptoError {
            reason: format!("HMAC-SHA512 key init failed: {e}"),
        })?;
        for part in parts {
            mac.update(part);
        }
        let mut out = mac.finalize().into_bytes();

        let mut node = Self {
            key: [0u8; 32],
            chain_code: [0u8; 32],
        };
        node.key.copy_from_slice(&out[..32]);
        node.chain_code.copy_from_slice(&out[32..]);
        out.as_mut_slice().zeroize();

        Ok(node)
    }
}

/// Walks `path` from the master node of `seed`.
///
/// # Errors
///
/// Returns `CryptoError` on a malformed path.
pub fn derive_path(path: &str, seed: &Seed) -> Result<ExtendedKey> {
    let indices = parse_path(path)?;
    let mut node = ExtendedKey::master(seed.as_bytes())?;
    for index in indices {
        node = node.derive_hardened(index)?;
    }
    Ok(node)
}

/// Shorthand for `derive_path(&get_path(index), seed)?.key_pair()`.
///
/// # Errors
///
/// Returns `CryptoError` if derivation fails.
pub fn derive_account(seed: &Seed, index: u32) -> Result<DerivedKeyPair> {
    Ok(derive_path(&get_path(index), seed)?.key_pair())
}

// ---------------------------------------------------------------------------
// DerivedKeyPair
// ---------------------------------------------------------------------------

/// Key pair and address produced from a derived node.
pub struct DerivedKeyPair {
    /// Private key; zeroized on drop.
    pub private_key: PrivateKey,
    /// Ed25519 public key.
    pub public_key: PublicKey,
    /// Base58 address of `public_key`.
    pub address: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
