use zeroize::Zeroize;

use crate::consts::{AUTH_TOKEN_PREFIX, HASH_SIZE, MAX_DERIVED_KEY_SIZE};
use crate::error::CryptoError;
use crate::hmac::HmacSha256;
use crate::sha256::Sha256;
use crate::types::EncryptionKey;

/// Derive the Authorization Hash from an authorization token.
///
/// The token format is `at` + 32 hex chars. The `at` prefix is stripped,
/// and SHA-256 is computed over the remaining hex string (UTF-8 encoded).
/// Returns the first 8 bytes of the digest.
#[must_use]
pub fn derive_auth_hash(token: &str) -> [u8; HASH_SIZE] {
    truncated_digest(strip_token_prefix(token))
}

/// Derive the Device Hash from a device serial number.
///
/// Computes SHA-256 of the serial (UTF-8 encoded) and returns the first 8 bytes.
#[must_use]
pub fn derive_device_hash(serial: &str) -> [u8; HASH_SIZE] {
    truncated_digest(serial)
}

/// Derive key material from an authorization token and device serial
/// using HMAC-SHA256, filling all of `out`.
///
/// The `at` prefix is stripped from the token; the remaining hex string
/// (UTF-8 encoded) is the HMAC key and the serial (UTF-8 encoded) is the
/// HMAC message. `out` receives the leading `out.len()` bytes of the
/// 32-byte MAC; asking for more than 32 bytes fails with `InvalidKeySize`.
pub fn derive_key(token: &str, serial: &str, out: &mut [u8]) -> Result<(), CryptoError> {
    if out.len() > MAX_DERIVED_KEY_SIZE {
        return Err(CryptoError::invalid_key_size());
    }
    hmac_truncated(token, serial, out);
    Ok(())
}

/// Derive the 16-byte AES-128 envelope key for a token/serial pair.
#[must_use]
pub fn derive_encryption_key(token: &str, serial: &str) -> EncryptionKey {
    let mut key = EncryptionKey::zeroed();
    hmac_truncated(token, serial, key.as_mut_bytes());
    key
}

/// `out.len()` must not exceed the 32-byte MAC.
fn hmac_truncated(token: &str, serial: &str, out: &mut [u8]) {
    debug_assert!(out.len() <= MAX_DERIVED_KEY_SIZE);
    let mut full = HmacSha256::mac(strip_token_prefix(token).as_bytes(), serial.as_bytes());
    out.copy_from_slice(&full[..out.len()]);
    full.zeroize();
}

fn strip_token_prefix(token: &str) -> &str {
    token.strip_prefix(AUTH_TOKEN_PREFIX).unwrap_or(token)
}

fn truncated_digest(input: &str) -> [u8; HASH_SIZE] {
    let mut digest = Sha256::digest(input.as_bytes());
    let mut hash = [0u8; HASH_SIZE];
    hash.copy_from_slice(&digest[..HASH_SIZE]);
    digest.zeroize();
    hash
}
