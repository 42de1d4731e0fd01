//! Unsigned LEB128 varints and zigzag mapping for signed integers.

use bytes::{Buf, BufMut};

use crate::error::{FrameError, Result};

/// Longest encoding of a `u64`.
pub const MAX_VARINT_LEN: usize = 10;

/// Append `value` as an unsigned varint.
pub fn put_uvarint(dst: &mut impl BufMut, mut value: u64) {
    while value >= 0x80 {
        dst.put_u8((value as u8 & 0x7F) | 0x80);
        value >>= 7;
    }
    dst.put_u8(value as u8);
}

/// Number of bytes [`put_uvarint`] writes for `value`.
pub fn uvarint_len(value: u64) -> usize {
    let bits = 64 - (value | 1).leading_zeros() as usize;
    bits.div_ceil(7)
}

/// Decode a varint at the start of `src`.
///
/// Returns the value and the number of bytes consumed, or `None` when `src`
/// ends before the varint does.
pub fn decode_uvarint(src: &[u8]) -> Result<Option<(u64, usize)>> {
    let mut value = 0u64;
    for (i, &byte) in src.iter().enumerate() {
        if i == MAX_VARINT_LEN - 1 && byte > 1 {
            return Err(FrameError::VarintOverflow);
        }
        value |= u64::from(byte & 0x7F) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(Some((value, i + 1)));
        }
        if i + 1 == MAX_VARINT_LEN {
            return Err(FrameError::VarintOverflow);
        }
    }
    Ok(None)
}

/// Read a varint from a payload buffer, treating a short buffer as malformed.
pub fn get_uvarint(src: &mut impl Buf) -> Result<u64> {
    match decode_uvarint(src.chunk())? {
        Some((value, used)) => {
            src.advance(used);
            Ok(value)
        }
        None => Err(FrameError::MalformedPayload("truncated varint".into())),
    }
}

/// Map a signed integer so small magnitudes encode in few bytes.
pub fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

pub fn zigzag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}
