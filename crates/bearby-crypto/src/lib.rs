//! Cryptographic primitives for the Bearby wallet core.
//!
//! This crate is the **sole** location for encoding and cryptographic
//! operations. Everything here is stateless: functions are pure over
//! their inputs, apart from drawing OS randomness where documented.
//!
//! # Modules
//!
//! - [`varint`] — unsigned LEB128 variable-length integers
//! - [`base58`] — raw base58 and base58check text encoding
//! - [`hash`] — BLAKE3 digests
//! - [`keys`] — Ed25519 private/public keys and their text form
//! - [`address`] — public-key → address derivation and validation
//! - [`mnemonic`] — BIP39 phrases, entropy and seeds
//! - [`hd_derive`] — SLIP-0010 Ed25519 derivation paths
//! - [`kdf`] — Argon2id password → vault key
//! - [`aead`] — XChaCha20-Poly1305 sealing
//! - [`hkdf`] — HKDF-SHA256 sub-key derivation

pub mod address;
pub mod aead;
pub mod base58;
pub mod hash;
pub mod hd_derive;
pub mod hkdf;
pub mod kdf;
pub mod keys;
pub mod mnemonic;
pub mod varint;

/// Version number embedded in addresses, private keys and the vault
/// marker.
pub const VERSION_NUMBER: u64 = 0;
