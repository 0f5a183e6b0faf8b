//! XChaCha20-Poly1305 sealing of small secrets.
//!
//! Every call to [`seal`] draws a fresh 192-bit nonce from OS entropy,
//! so a key may be reused across many sealed boxes.

use bearby_types::{BearbyError, Result};
use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Byte length of an XChaCha20 nonce.
pub const NONCE_LEN: usize = 24;

/// Byte length of the Poly1305 tag appended to every ciphertext.
pub const TAG_LEN: usize = 16;

/// Nonce plus ciphertext (tag appended) produced by [`seal`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SealedBox {
    /// Random nonce used for this box.
    pub nonce: [u8; NONCE_LEN],
    /// Ciphertext with the 16-byte tag at the end.
    #[serde(with = "hex_bytes")]
    pub ciphertext: Vec<u8>,
}

/// Encrypts `plaintext` under `key`, authenticating `aad` alongside it.
///
/// # Errors
///
/// Returns `CryptoError` if the cipher rejects the input.
pub fn seal(key: &[u8; 32], plaintext: &[u8], aad: &[u8]) -> Result<SealedBox> {
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    let cipher = XChaCha20Poly1305::new(Key::from_slice(key));
    let ciphertext = cipher
        .encrypt(XNonce::from_slice(&nonce), Payload { msg: plaintext, aad })
        .map_err(|e| BearbyError::CryptoError {
            reason: format!("XChaCha20-Poly1305 encryption failed: {e}"),
        })?;

    Ok(SealedBox { nonce, ciphertext })
}

/// Decrypts and authenticates a [`SealedBox`].
///
/// The plaintext is returned in a buffer that is wiped on drop.
///
/// # Errors
///
/// Returns `CryptoError` when authentication fails: wrong key,
/// different `aad`, or a modified nonce or ciphertext.
pub fn open(key: &[u8; 32], sealed: &SealedBox, aad: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let cipher = XChaCha20Poly1305::new(Key::from_slice(key));
    cipher
        .decrypt(
            XNonce::from_slice(&sealed.nonce),
            Payload {
                msg: &sealed.ciphertext,
                aad,
            },
        )
        .map(Zeroizing::new)
        .map_err(|e| BearbyError::CryptoError {
            reason: format!("XChaCha20-Poly1305 decryption failed: {e}"),
        })
}

/// Serializes byte vectors as hex strings in human-readable formats.
mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&hex::encode(bytes))
        } else {
            serializer.serialize_bytes(bytes)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        if deserializer.is_human_readable() {
            let text = String::deserialize(deserializer)?;
            hex::decode(text).map_err(serde::de::Error::custom)
        } else {
            Vec::<u8>::deserialize(deserializer)
        }
    }
}
