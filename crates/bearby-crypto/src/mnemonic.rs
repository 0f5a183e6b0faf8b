//! BIP39 mnemonic phrases, entropy and seed derivation.
//!
//! Phrases use the English wordlist. The seed is the standard BIP39
//! PBKDF2-HMAC-SHA512 seed (2048 rounds) with an empty passphrase.
//!
//! Reference: <https://github.com/bitcoin/bips/blob/master/bip-0039.mediawiki>

use bearby_types::{BearbyError, Result};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Entropy sizes accepted by [`generate_mnemonic`], in bits.
pub const SUPPORTED_STRENGTHS: [usize; 5] = [128, 160, 192, 224, 256];

// ---------------------------------------------------------------------------
// Mnemonic
// ---------------------------------------------------------------------------

/// A validated BIP39 phrase. The inner string is zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Mnemonic(String);

impl Mnemonic {
    /// Returns the phrase with words separated by single spaces.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the individual words in order.
    pub fn words(&self) -> Vec<&str> {
        self.0.split(' ').collect()
    }

    /// Number of words in the phrase.
    pub fn word_count(&self) -> usize {
        self.0.split(' ').count()
    }
}

// ---------------------------------------------------------------------------
// Seed
// ---------------------------------------------------------------------------

/// The 64-byte wallet seed. Zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Seed([u8; 64]);

impl Seed {
    /// Fixed byte length of a BIP39 seed.
    pub const LEN: usize = 64;

    /// Wraps raw seed bytes (e.g. after decrypting the vault).
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Builds a seed from a slice of exactly [`Self::LEN`] bytes.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError` for any other length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; 64] = bytes.try_into().map_err(|_| BearbyError::CryptoError {
            reason: format!("seed must be {} bytes, got {}", Self::LEN, bytes.len()),
        })?;
        Ok(Self(arr))
    }

    /// Returns the raw 64-byte seed.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

// Seed does not implement Clone/Debug to prevent leakage.

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Maps raw entropy to its checksummed word sequence.
///
/// # Errors
///
/// Returns `InvalidMnemonic` unless `entropy` is 16, 20, 24, 28 or 32
/// bytes long.
pub fn entropy_to_mnemonic(entropy: &[u8]) -> Result<Mnemonic> {
    let phrase = bip39::Mnemonic::from_entropy(entropy).map_err(|e| BearbyError::InvalidMnemonic {
        reason: e.to_string(),
    })?;
    Ok(Mnemonic(phrase.to_string()))
}

/// Recovers the entropy encoded by a phrase.
///
/// # Errors
///
/// Returns `InvalidMnemonic` on unknown words, a bad word count or a
/// checksum mismatch.
pub fn mnemonic_to_entropy(phrase: &str) -> Result<Vec<u8>> {
    Ok(parse(phrase)?.to_entropy())
}

/// Draws `strength` bits from the OS CSPRNG and returns their phrase.
///
/// # Errors
///
/// Returns `InvalidMnemonic` if `strength` is not one of
/// [`SUPPORTED_STRENGTHS`].
pub fn generate_mnemonic(strength: usize) -> Result<Mnemonic> {
    if !SUPPORTED_STRENGTHS.contains(&strength) {
        return Err(BearbyError::InvalidMnemonic {
            reason: format!("unsupported strength {strength}, expected one of {SUPPORTED_STRENGTHS:?}"),
        });
    }

    let mut entropy = vec![0u8; strength / 8];
    OsRng.fill_bytes(&mut entropy);

    let result = entropy_to_mnemonic(&entropy);

    entropy.zeroize();
    result
}

/// Validates a phrase and returns it in normalized form.
///
/// # Errors
///
/// Returns `InvalidMnemonic` if the phrase is not valid BIP39.
pub fn validate_mnemonic(phrase: &str) -> Result<Mnemonic> {
    Ok(Mnemonic(parse(phrase)?.to_string()))
}

/// Derives the 64-byte seed for a phrase (empty passphrase).
///
/// # Errors
///
/// Returns `InvalidMnemonic` if the phrase is not valid BIP39.
pub fn mnemonic_to_seed(phrase: &str) -> Result<Seed> {
    Ok(Seed(parse(phrase)?.to_seed("")))
}

fn parse(phrase: &str) -> Result<bip39::Mnemonic> {
    let normalized = phrase.split_whitespace().collect::<Vec<_>>().join(" ");
    bip39::Mnemonic::parse_in_normalized(bip39::Language::English, &normalized.to_lowercase())
        .map_err(|e| BearbyError::InvalidMnemonic {
            reason: e.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
