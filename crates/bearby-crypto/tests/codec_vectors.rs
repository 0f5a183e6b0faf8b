//! Known-vector tests for the codec primitives.
//!
//! Vectors sourced from:
//! - base58 / base58check: Massa wallet test suite
//! - Private-key import: Massa wallet test suite
//! - Ed25519 public key: RFC 8032 §7.1, TEST 1

use bearby_crypto::address::{address_from_public_key, decode_address};
use bearby_crypto::base58::{base58_decode, base58_encode, base58check_decode, base58check_encode};
use bearby_crypto::hash::blake3_hash;
use bearby_crypto::keys::{private_key_from_base58, public_key_from_private_key};
use bearby_crypto::varint::{decode_varint, encode_varint};
use bearby_types::BearbyError;

// ---------------------------------------------------------------------------
// Test constants
// ---------------------------------------------------------------------------

const PUBKEY: &str = "5b6ae2595c52f7ea02257582a4beacff65bc0753111ae5cbbb3eaacf18ad3abd";
const PUBKEY_B58CHECK: &str = "hG8zRRJF2v3qkwyZ2fnHJeaVw9uT4huCkwcWJVvgypEwMNHVC";
const PUBKEY_HASH: &str = "b6cda5e8b5995ffb2710839c74989c0b69249de330aced521f3c454cdef0f12c";
const PUBKEY_HASH_B58CHECK: &str = "2PWTzCKkkE9P5Supt3Fkb4QVZ3cdfB281TGaup7Nv1DY1is9fL";

/// `(text key, private key, public key, address)`
const IMPORTS: [(&str, &str, &str, &str); 2] = [
    (
        "S12tw4YShWtjWfy7YBQ9Erbcg6DYgWnMgb5hGjn9hAKGtgrLNa7L",
        "f99d3fac98a9adb3b622500b50c020b05efe01408249aab3a25c8839f3c61b26",
        "5b6ae2595c52f7ea02257582a4beacff65bc0753111ae5cbbb3eaacf18ad3abd",
        "A12PWTzCKkkE9P5Supt3Fkb4QVZ3cdfB281TGaup7Nv1DY12a6F1",
    ),
    (
        "S12jtn2WJ3R89DBitafREHgXa1tcEJc28Kd3yqoEcMVpjYpJ1CQY",
        "e516d63c7fb169d6cd1bd2b0594f8b2ffad0a4f665a71f91d67070405753c2e4",
        "b9f7fe423a31008e17bccf6a9c96b94bb1c11de0fd0184e3770a40c72c553113",
        "A12BXgeMYsiCPQKFUoLpsx2U7Zr1TkFTQXa6PRwEKjdz9WVCvYGL",
    ),
];

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn unhex(text: &str) -> Vec<u8> {
    hex::decode(text).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// base58
// ---------------------------------------------------------------------------

#[test]
fn base58check_public_key_and_hash() -> Result<(), BearbyError> {
    assert_eq!(base58check_encode(&unhex(PUBKEY)), PUBKEY_B58CHECK);
    assert_eq!(base58check_decode(PUBKEY_B58CHECK)?, unhex(PUBKEY));

    let hash = blake3_hash(&unhex(PUBKEY));
    assert_eq!(hex::encode(hash), PUBKEY_HASH);
    assert_eq!(base58check_encode(&hash), PUBKEY_HASH_B58CHECK);
    Ok(())
}

#[test]
fn raw_base58_roundtrip_varied_inputs() -> Result<(), BearbyError> {
    let inputs: [&[u8]; 6] = [
        b"",
        &[0x00],
        &[0x00, 0x00, 0x00],
        &[0x00, 0xff, 0x00],
        b"hello world",
        &[0xff; 40],
    ];

    for input in inputs {
        let text = base58_encode(input);
        assert_eq!(base58_decode(&text)?, input);
        let leading = input.iter().take_while(|b| **b == 0).count();
        assert!(text.starts_with(&"1".repeat(leading)));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Keys and addresses
// ---------------------------------------------------------------------------

#[test]
fn imported_keys_match_known_addresses() -> Result<(), BearbyError> {
    for (text, private_key, public_key, address) in IMPORTS {
        let key = private_key_from_base58(text)?;
        assert_eq!(hex::encode(key.as_bytes()), private_key);

        let public = key.public_key();
        assert_eq!(public.to_hex(), public_key);
        assert_eq!(address_from_public_key(&public), address);
        assert_eq!(decode_address(address)?, blake3_hash(public.as_bytes()));
    }
    Ok(())
}

#[test]
fn ed25519_rfc8032_test1_public_key() -> Result<(), BearbyError> {
    let secret = unhex("9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60");
    let public = public_key_from_private_key(&secret)?;
    assert_eq!(
        public.to_hex(),
        "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a"
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Version marker
// ---------------------------------------------------------------------------

#[test]
fn version_marker_is_single_zero_byte() -> Result<(), BearbyError> {
    let marker = encode_varint(bearby_crypto::VERSION_NUMBER);
    assert_eq!(marker, vec![0x00]);
    assert_eq!(decode_varint(&marker)?, (0, 1));
    Ok(())
}
