//! Unsigned base-128 varints, as used for record length prefixes.
//!
//! Each byte carries seven data bits, least-significant group first. The high
//! bit is set on every byte except the last. A `u64` needs at most
//! [`MAX_VARINT_LEN`] bytes, and the final (tenth) byte may only carry a single
//! data bit.

use crate::error::{Error, Result};

/// Maximum encoded length of a 64-bit varint.
pub const MAX_VARINT_LEN: usize = 10;

const CONTINUATION: u8 = 0x80;
const DATA_MASK: u8 = 0x7F;

/// Decodes a varint from the start of `bytes`.
///
/// Returns the value and how many bytes it occupied. Bytes after the
/// terminating byte are ignored.
///
/// # Errors
/// * `Error::Truncated` - `bytes` is empty or ends while the continuation bit is still set
/// * `Error::VarintOverflow` - the encoding does not fit in 64 bits
pub fn decode(bytes: &[u8]) -> Result<(u64, usize)> {
    let mut value = 0u64;
    for (i, &byte) in bytes.iter().enumerate() {
        check_budget(i, byte)?;
        value |= u64::from(byte & DATA_MASK) << (7 * i);
        if byte & CONTINUATION == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(Error::truncated(bytes.len() + 1, bytes.len()))
}

/// Encodes `value` in its minimal-length form.
pub fn encode(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_len(value));
    encode_into(value, &mut out);
    out
}

/// Appends the minimal-length encoding of `value` to `out`.
pub fn encode_into(mut value: u64, out: &mut Vec<u8>) {
    while value >= u64::from(CONTINUATION) {
        out.push((value as u8 & DATA_MASK) | CONTINUATION);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Number of bytes `encode(value)` produces.
pub fn encoded_len(value: u64) -> usize {
    let bits = 64 - (value | 1).leading_zeros() as usize;
    bits.div_ceil(7)
}

// The tenth byte holds bit 63 only; anything else there (including a
// continuation bit) cannot be represented.
fn check_budget(index: usize, byte: u8) -> Result<()> {
    if index >= MAX_VARINT_LEN || (index == MAX_VARINT_LEN - 1 && byte > 1) {
        return Err(Error::VarintOverflow);
    }
    Ok(())
}

/// Builds a varint one byte at a time, for callers that pull bytes from a stream.
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    bytes: [u8; MAX_VARINT_LEN],
    len: usize,
}

impl Accumulator {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the next byte. Returns `Some(value)` once the terminating byte arrives.
    pub fn push(&mut self, byte: u8) -> Result<Option<u64>> {
        check_budget(self.len, byte)?;
        self.bytes[self.len] = byte;
        self.len += 1;
        if byte & CONTINUATION != 0 {
            return Ok(None);
        }
        let (value, _) = decode(self.as_bytes())?;
        Ok(Some(value))
    }

    /// Bytes accumulated so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Discards accumulated bytes so the next `push` starts a new varint.
    pub fn clear(&mut self) {
        self.len = 0;
    }
}
