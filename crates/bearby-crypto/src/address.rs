//! Public key → address derivation.
//!
//! An address is `"A"` followed by the base58check encoding of
//! `varint(VERSION_NUMBER) || BLAKE3(public_key)`.

use bearby_types::{BearbyError, Result};

use crate::base58::{base58check_decode, base58check_encode};
use crate::hash::{blake3_hash, HASH_LEN};
use crate::keys::PublicKey;
use crate::varint::{decode_varint, encode_varint};
use crate::VERSION_NUMBER;

/// Leading character of every user address.
pub const ADDRESS_PREFIX: char = 'A';

/// Derives the address of `public_key`.
pub fn address_from_public_key(public_key: &PublicKey) -> String {
    let mut payload = encode_varint(VERSION_NUMBER);
    payload.extend_from_slice(&blake3_hash(public_key.as_bytes()));
    format!("{ADDRESS_PREFIX}{}", base58check_encode(&payload))
}

/// Validates an address string and returns the public-key hash it
/// commits to.
///
/// # Errors
///
/// Returns `InvalidAddress` on a wrong prefix, bad checksum,
/// unsupported version or wrong hash length.
pub fn decode_address(address: &str) -> Result<[u8; HASH_LEN]> {
    let body = address
        .strip_prefix(ADDRESS_PREFIX)
        .ok_or_else(|| BearbyError::InvalidAddress {
            reason: format!("address must start with '{ADDRESS_PREFIX}'"),
        })?;

    let payload = base58check_decode(body).map_err(|e| BearbyError::InvalidAddress {
        reason: e.to_string(),
    })?;

    let (version, used) = decode_varint(&payload).map_err(|e| BearbyError::InvalidAddress {
        reason: e.to_string(),
    })?;
    if version != VERSION_NUMBER {
        return Err(BearbyError::InvalidAddress {
            reason: format!("unsupported address version {version}"),
        });
    }

    payload[used..]
        .try_into()
        .map_err(|_| BearbyError::InvalidAddress {
            reason: format!(
                "address hash must be {HASH_LEN} bytes, got {}",
                payload.len() - used
            ),
        })
}

/// Returns `true` if `address` is well formed.
pub fn is_valid_address(address: &str) -> bool {
    decode_address(address).is_ok()
}
