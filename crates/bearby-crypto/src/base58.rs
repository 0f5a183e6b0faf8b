//! Base58 text encoding (Bitcoin alphabet).
//!
//! Two flavours are provided:
//!
//! - raw base58, where each leading zero byte becomes a leading `1`;
//! - base58check, which appends the first four bytes of
//!   `SHA-256(SHA-256(payload))` before encoding and verifies them on
//!   decode.

use bearby_types::{BearbyError, Result};

/// Encodes arbitrary bytes as raw base58. Empty input yields `""`.
pub fn base58_encode(bytes: &[u8]) -> String {
    bs58::encode(bytes).into_string()
}

/// Decodes a raw base58 string.
///
/// # Errors
///
/// Returns `CodecError` if the string contains a character outside the
/// base58 alphabet (`0`, `O`, `I`, `l`, whitespace, …).
pub fn base58_decode(text: &str) -> Result<Vec<u8>> {
    bs58::decode(text)
        .into_vec()
        .map_err(|e| BearbyError::CodecError {
            reason: format!("invalid base58: {e}"),
        })
}

/// Encodes `payload` with a 4-byte double-SHA-256 checksum appended.
pub fn base58check_encode(payload: &[u8]) -> String {
    bs58::encode(payload).with_check().into_string()
}

/// Decodes a base58check string and returns the payload without its
/// checksum.
///
/// # Errors
///
/// Returns `CodecError` on an invalid character, a string too short to
/// hold a checksum, or a checksum mismatch.
pub fn base58check_decode(text: &str) -> Result<Vec<u8>> {
    bs58::decode(text)
        .with_check(None)
        .into_vec()
        .map_err(|e| BearbyError::CodecError {
            reason: format!("invalid base58check: {e}"),
        })
}
