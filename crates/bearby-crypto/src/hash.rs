//! Hash functions used by the wallet.
//!
//! Addresses commit to the BLAKE3 digest of the public key.

/// Length of every digest returned by this module.
pub const HASH_LEN: usize = 32;

/// Computes the 32-byte BLAKE3 digest of `data`.
pub fn blake3_hash(data: &[u8]) -> [u8; HASH_LEN] {
    *blake3::hash(data).as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blake3_empty_input() {
        assert_eq!(
            hex::encode(blake3_hash(b"")),
            "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262"
        );
    }

    #[test]
    fn blake3_of_public_key() {
        let public_key = [
            0x5b, 0x6a, 0xe2, 0x59, 0x5c, 0x52, 0xf7, 0xea, 0x02, 0x25, 0x75, 0x82, 0xa4, 0xbe,
            0xac, 0xff, 0x65, 0xbc, 0x07, 0x53, 0x11, 0x1a, 0xe5, 0xcb, 0xbb, 0x3e, 0xaa, 0xcf,
            0x18, 0xad, 0x3a, 0xbd,
        ];
        assert_eq!(
            hex::encode(blake3_hash(&public_key)),
            "b6cda5e8b5995ffb2710839c74989c0b69249de330aced521f3c454cdef0f12c"
        );
    }
}
