//! HKDF-SHA256 sub-key derivation (RFC 5869).
//!
//! Used to derive purpose-bound symmetric keys from the wallet seed, so
//! the seed itself never keys a cipher directly.

use bearby_types::{BearbyError, Result};
use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// 32-byte key derived by [`derive_subkey`], zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SubKey([u8; 32]);

impl SubKey {
    /// Returns the raw key material.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

// SubKey does not implement Clone/Debug to prevent leakage.

/// Expands `ikm` into a 32-byte key bound to `salt` and `info`.
///
/// An empty `salt` means the RFC 5869 default (zero-filled).
///
/// # Errors
///
/// Returns `CryptoError` if the expansion fails.
pub fn derive_subkey(ikm: &[u8], salt: &[u8], info: &[u8]) -> Result<SubKey> {
    let salt = if salt.is_empty() { None } else { Some(salt) };
    let hk = Hkdf::<Sha256>::new(salt, ikm);

    let mut key = SubKey([0u8; 32]);
    hk.expand(info, &mut key.0).map_err(|e| BearbyError::CryptoError {
        reason: format!("HKDF-SHA256 expansion failed: {e}"),
    })?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_separates_keys() -> std::result::Result<(), BearbyError> {
        let ikm = [7u8; 64];
        let a = derive_subkey(&ikm, b"", b"purpose-a")?;
        let b = derive_subkey(&ikm, b"", b"purpose-b")?;
        let a_again = derive_subkey(&ikm, b"", b"purpose-a")?;
        assert_ne!(a.as_bytes(), b.as_bytes());
        assert_eq!(a.as_bytes(), a_again.as_bytes());
        Ok(())
    }

    // RFC 5869 test case 1, first 32 bytes of OKM.
    #[test]
    fn rfc5869_case1_prefix() -> std::result::Result<(), BearbyError> {
        let ikm = [0x0bu8; 22];
        let salt: Vec<u8> = (0x00u8..=0x0c).collect();
        let info: Vec<u8> = (0xf0u8..=0xf9).collect();

        let key = derive_subkey(&ikm, &salt, &info)?;
        assert_eq!(
            hex::encode(key.as_bytes()),
            "3cb25f25faacd57a90434f64d0362f2a2d2d0a90cf1a5a4c5db02d56ecc4c5bf"
        );
        Ok(())
    }
}
