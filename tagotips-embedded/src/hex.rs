//! Hex codec for textual key and identifier material.
//!
//! Decoding is strict (even length, `0-9a-fA-F` only); encoding is lowercase.
//! Both directions write into caller buffers.

#[cfg(feature = "alloc")]
use alloc::{string::String, vec::Vec};

use zeroize::Zeroize;

use crate::error::CryptoError;

const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

/// Decode `hex` into `out`, returning the number of bytes written.
///
/// Fails with `InvalidHex` on odd length or a non-hex character and with
/// `BufferTooSmall` when `out` cannot hold `hex.len() / 2` bytes. On a bad
/// character the bytes already decoded are wiped.
pub fn hex_to_bytes(hex: &str, out: &mut [u8]) -> Result<usize, CryptoError> {
    let hex = hex.as_bytes();
    if hex.len() % 2 != 0 {
        return Err(CryptoError::invalid_hex());
    }
    let n = hex.len() / 2;
    if out.len() < n {
        return Err(CryptoError::buffer_too_small());
    }

    for (i, pair) in hex.chunks_exact(2).enumerate() {
        match (hex_digit(pair[0]), hex_digit(pair[1])) {
            (Some(hi), Some(lo)) => out[i] = (hi << 4) | lo,
            _ => {
                out[..i].zeroize();
                return Err(CryptoError::invalid_hex());
            }
        }
    }
    Ok(n)
}

/// Encode `bytes` as lowercase hex into `out` and return the text.
pub fn bytes_to_hex<'a>(bytes: &[u8], out: &'a mut [u8]) -> Result<&'a str, CryptoError> {
    let n = bytes.len() * 2;
    if out.len() < n {
        return Err(CryptoError::buffer_too_small());
    }
    for (pair, &b) in out.chunks_exact_mut(2).zip(bytes) {
        pair[0] = HEX_CHARS[(b >> 4) as usize];
        pair[1] = HEX_CHARS[(b & 0x0f) as usize];
    }
    // Only ASCII from HEX_CHARS was written, so this never fails.
    core::str::from_utf8(&out[..n]).map_err(|_| CryptoError::buffer_too_small())
}

/// Decode a hex string into an owned buffer.
#[cfg(feature = "alloc")]
pub fn hex_to_vec(hex: &str) -> Result<Vec<u8>, CryptoError> {
    let mut out = alloc::vec![0u8; hex.len() / 2];
    hex_to_bytes(hex, &mut out)?;
    Ok(out)
}

/// Encode bytes as an owned lowercase hex string.
#[cfg(feature = "alloc")]
#[must_use]
pub fn bytes_to_hex_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(HEX_CHARS[(b >> 4) as usize] as char);
        out.push(HEX_CHARS[(b & 0x0f) as usize] as char);
    }
    out
}

fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}
