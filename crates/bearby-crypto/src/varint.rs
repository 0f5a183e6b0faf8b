//! Unsigned variable-length integers (LEB128).
//!
//! Each byte carries seven value bits, least-significant group first.
//! The high bit is set on every byte except the last.

use bearby_types::{BearbyError, Result};

/// Longest encoding of a `u64` (ceil(64 / 7)).
pub const MAX_VARINT_LEN: usize = 10;

const CONTINUATION: u8 = 0x80;
const PAYLOAD_MASK: u8 = 0x7f;

/// Encodes `value` as a varint.
pub fn encode_varint(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAX_VARINT_LEN);
    let mut rest = value;

    loop {
        let group = (rest as u8) & PAYLOAD_MASK;
        rest >>= 7;

        if rest == 0 {
            out.push(group);
            return out;
        }

        out.push(group | CONTINUATION);
    }
}

/// Decodes a varint from the start of `bytes`.
///
/// Returns the value and the number of bytes consumed, so callers can
/// advance a cursor through a longer buffer. Trailing bytes after the
/// terminating group are ignored.
///
/// # Errors
///
/// Returns `CodecError` when the input ends before a terminating byte
/// or when the encoded value does not fit in a `u64`.
pub fn decode_varint(bytes: &[u8]) -> Result<(u64, usize)> {
    let mut value: u64 = 0;

    for (i, &byte) in bytes.iter().enumerate().take(MAX_VARINT_LEN) {
        let group = u64::from(byte & PAYLOAD_MASK);
        let shift = 7 * i as u32;

        // The tenth byte may only carry the single top bit.
        if i == MAX_VARINT_LEN - 1 && group > 1 {
            return Err(BearbyError::CodecError {
                reason: "varint overflows 64 bits".into(),
            });
        }

        value |= group << shift;

        if byte & CONTINUATION == 0 {
            return Ok((value, i + 1));
        }
    }

    if bytes.len() >= MAX_VARINT_LEN {
        return Err(BearbyError::CodecError {
            reason: format!("varint longer than {MAX_VARINT_LEN} bytes"),
        });
    }

    Err(BearbyError::CodecError {
        reason: format!("truncated varint after {} bytes", bytes.len()),
    })
}
