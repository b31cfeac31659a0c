//! TagoTiP/S envelope: `Header(21) || Ciphertext(N) || Tag(8)`.
//!
//! Every call is self-contained. Key schedules and MAC state live on the stack
//! and are wiped before returning, on error paths too.

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use crate::aes::key_expand;
use crate::ccm;
use crate::consts::{
    HASH_SIZE, HEADER_SIZE, KEY_SIZE, MAX_INNER_FRAME_SIZE, MIN_ENVELOPE_SIZE, PROTOCOL_VERSION,
    RESERVED_FLAGS_VALUE, TAG_SIZE,
};
use crate::error::CryptoError;
use crate::nonce::construct_nonce;
use crate::types::{CipherSuite, EnvelopeHeader, EnvelopeMethod, Flags};

/// Check if a message is a TagoTiP/S envelope or a plaintext fallback.
///
/// Returns `true` if the first byte is NOT `0x41` (ASCII `A`).
/// An empty message returns `false`.
#[must_use]
pub fn is_envelope(data: &[u8]) -> bool {
    match data.first() {
        Some(&b) => b != RESERVED_FLAGS_VALUE,
        None => false,
    }
}

/// Exact sealed size for an inner frame of `inner_len` bytes.
#[must_use]
pub const fn envelope_len(inner_len: usize) -> usize {
    HEADER_SIZE + inner_len + TAG_SIZE
}

/// Parse just the 21-byte envelope header for server-side routing (key lookup before decryption).
///
/// The Flags byte is validated (reserved value, cipher ID, method ID); the
/// protocol version is left to `open`.
pub fn parse_header(envelope: &[u8]) -> Result<EnvelopeHeader, CryptoError> {
    let header = EnvelopeHeader::from_bytes(envelope).inspect_err(|_e| {
        #[cfg(feature = "tracing")]
        tracing::debug!(len = envelope.len(), "envelope shorter than header");
    })?;
    Flags::decode(header.flags).inspect_err(|_e| {
        #[cfg(feature = "tracing")]
        tracing::debug!(flags = header.flags, kind = ?_e.kind, "invalid flags byte");
    })?;
    Ok(header)
}

/// Encrypt raw inner frame bytes into a TagoTiP/S envelope written to `out`.
///
/// Returns the envelope length (`21 + inner_frame.len() + 8`). `out` is left
/// untouched when any check fails.
pub fn seal(
    inner_frame: &[u8],
    method: EnvelopeMethod,
    counter: u32,
    auth_hash: &[u8; HASH_SIZE],
    device_hash: &[u8; HASH_SIZE],
    key: &[u8; KEY_SIZE],
    out: &mut [u8],
) -> Result<usize, CryptoError> {
    if inner_frame.len() > MAX_INNER_FRAME_SIZE {
        #[cfg(feature = "tracing")]
        tracing::debug!(inner_len = inner_frame.len(), "inner frame too large to seal");
        return Err(CryptoError::inner_frame_too_large());
    }

    let total = envelope_len(inner_frame.len());
    if out.len() < total {
        #[cfg(feature = "tracing")]
        tracing::debug!(needed = total, capacity = out.len(), "seal output buffer too small");
        return Err(CryptoError::buffer_too_small());
    }

    let flags = Flags::encode(CipherSuite::Aes128Ccm, PROTOCOL_VERSION, method)?;

    let header = EnvelopeHeader {
        flags,
        counter,
        auth_hash: *auth_hash,
        device_hash: *device_hash,
    };
    let aad = header.to_bytes();
    let nonce = construct_nonce(flags, device_hash, counter);

    let round_keys = key_expand(key);
    let (head, body) = out[..total].split_at_mut(HEADER_SIZE);
    ccm::encrypt(&round_keys, &nonce, &aad, inner_frame, body)?;
    head.copy_from_slice(&aad);
    drop(round_keys);

    #[cfg(feature = "tracing")]
    tracing::trace!(counter, method = ?method, len = total, "sealed envelope");

    Ok(total)
}

/// Decrypt a TagoTiP/S envelope into `out`.
///
/// Returns `(header, method, inner_frame_len)`; the inner frame is
/// `out[..inner_frame_len]`. On authentication failure that region of `out`
/// is zeroed and `DecryptionFailed` is returned.
pub fn open(
    envelope: &[u8],
    key: &[u8; KEY_SIZE],
    out: &mut [u8],
) -> Result<(EnvelopeHeader, EnvelopeMethod, usize), CryptoError> {
    if envelope.len() < MIN_ENVELOPE_SIZE {
        #[cfg(feature = "tracing")]
        tracing::debug!(len = envelope.len(), "envelope too short to open");
        return Err(CryptoError::envelope_too_short());
    }

    let header = parse_header(envelope)?;
    let (cipher, version, method) = Flags::decode(header.flags)?;

    if version != PROTOCOL_VERSION {
        #[cfg(feature = "tracing")]
        tracing::debug!(version, "unsupported envelope version");
        return Err(CryptoError::unsupported_version());
    }
    if !cipher.is_supported() {
        #[cfg(feature = "tracing")]
        tracing::debug!(cipher = cipher.id(), "cipher suite not implemented");
        return Err(CryptoError::unsupported_cipher());
    }

    let ciphertext_with_tag = &envelope[HEADER_SIZE..];
    let inner_len = ciphertext_with_tag.len() - TAG_SIZE;
    if inner_len > MAX_INNER_FRAME_SIZE {
        #[cfg(feature = "tracing")]
        tracing::debug!(inner_len, "envelope carries an oversized inner frame");
        return Err(CryptoError::inner_frame_too_large());
    }
    if out.len() < inner_len {
        #[cfg(feature = "tracing")]
        tracing::debug!(needed = inner_len, capacity = out.len(), "open output buffer too small");
        return Err(CryptoError::buffer_too_small());
    }

    let aad = &envelope[..HEADER_SIZE];
    let nonce = construct_nonce(header.flags, &header.device_hash, header.counter);

    let round_keys = key_expand(key);
    let result = ccm::decrypt(&round_keys, &nonce, aad, ciphertext_with_tag, out);
    drop(round_keys);

    match result {
        Ok(n) => {
            #[cfg(feature = "tracing")]
            tracing::trace!(counter = header.counter, method = ?method, inner_len = n, "opened envelope");
            Ok((header, method, n))
        }
        Err(e) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(counter = header.counter, "envelope authentication failed");
            Err(e)
        }
    }
}

/// Owned variant of [`seal`]: returns the envelope as a new `Vec`.
#[cfg(feature = "alloc")]
pub fn seal_to_vec(
    inner_frame: &[u8],
    method: EnvelopeMethod,
    counter: u32,
    auth_hash: &[u8; HASH_SIZE],
    device_hash: &[u8; HASH_SIZE],
    key: &[u8; KEY_SIZE],
) -> Result<Vec<u8>, CryptoError> {
    if inner_frame.len() > MAX_INNER_FRAME_SIZE {
        return Err(CryptoError::inner_frame_too_large());
    }
    let mut envelope = alloc::vec![0u8; envelope_len(inner_frame.len())];
    seal(inner_frame, method, counter, auth_hash, device_hash, key, &mut envelope)?;
    Ok(envelope)
}

/// Owned variant of [`open`]: returns `(header, method, inner_frame_bytes)`.
#[cfg(feature = "alloc")]
pub fn open_to_vec(
    envelope: &[u8],
    key: &[u8; KEY_SIZE],
) -> Result<(EnvelopeHeader, EnvelopeMethod, Vec<u8>), CryptoError> {
    let mut inner = alloc::vec![0u8; envelope.len().saturating_sub(MIN_ENVELOPE_SIZE)];
    let (header, method, n) = open(envelope, key, &mut inner)?;
    inner.truncate(n);
    Ok((header, method, inner))
}
