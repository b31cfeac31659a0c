//! AES-128-CCM (NIST SP 800-38C, RFC 3610).
//!
//! Fixed parameters: tag length t = 8, length field L = 2, nonce 13 bytes.
//! The payload limit of the L = 2 length field is 65535 bytes; the envelope
//! layer narrows it further.

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::aes::{RoundKeys, encrypt_block};
use crate::consts::{BLOCK_SIZE, NONCE_SIZE, TAG_SIZE};
use crate::error::CryptoError;

/// Size of the CCM length field (L).
const LEN_FIELD_SIZE: usize = 2;

/// Largest payload the two-byte length field can describe.
pub const MAX_PAYLOAD_SIZE: usize = u16::MAX as usize;

/// Largest AAD that uses the two-byte AAD length encoding (`0 < a < 2^16 - 2^8`).
pub const MAX_AAD_SIZE: usize = 0xfeff;

/// B0 flags without the Adata bit: `((t - 2) / 2) << 3 | (L - 1)` = 0x19.
const B0_FLAGS: u8 = ((((TAG_SIZE - 2) / 2) << 3) | (LEN_FIELD_SIZE - 1)) as u8;

/// Adata bit of the B0 flags; set whenever AAD is present (B0 flags become 0x59).
const B0_ADATA: u8 = 0x40;

/// Counter block flags: `L - 1`.
const CTR_FLAGS: u8 = (LEN_FIELD_SIZE - 1) as u8;

/// Encrypt and authenticate `plaintext`, writing `ciphertext || tag` to `out`.
///
/// Returns the number of bytes written (`plaintext.len() + 8`). Nothing is
/// written when a length check fails.
pub fn encrypt(
    round_keys: &RoundKeys,
    nonce: &[u8; NONCE_SIZE],
    aad: &[u8],
    plaintext: &[u8],
    out: &mut [u8],
) -> Result<usize, CryptoError> {
    check_lengths(aad, plaintext.len())?;
    let total = plaintext.len() + TAG_SIZE;
    if out.len() < total {
        return Err(CryptoError::buffer_too_small());
    }

    let mut mac = cbc_mac(round_keys, nonce, aad, plaintext);
    let (ciphertext, tag) = out[..total].split_at_mut(plaintext.len());
    apply_keystream(round_keys, nonce, plaintext, ciphertext);

    let mut s0 = encrypt_block(round_keys, &counter_block(nonce, 0));
    for ((t, m), s) in tag.iter_mut().zip(&mac).zip(&s0) {
        *t = m ^ s;
    }

    mac.zeroize();
    s0.zeroize();
    Ok(total)
}

/// Verify and decrypt `ciphertext || tag`, writing the plaintext to `plaintext`.
///
/// The tag comparison is constant-time. On a mismatch the recovered plaintext
/// is wiped before the error is returned, so `plaintext` never holds
/// unauthenticated data.
pub fn decrypt(
    round_keys: &RoundKeys,
    nonce: &[u8; NONCE_SIZE],
    aad: &[u8],
    input: &[u8],
    plaintext: &mut [u8],
) -> Result<usize, CryptoError> {
    if input.len() < TAG_SIZE {
        return Err(CryptoError::decryption_failed());
    }
    let pt_len = input.len() - TAG_SIZE;
    check_lengths(aad, pt_len)?;
    if plaintext.len() < pt_len {
        return Err(CryptoError::buffer_too_small());
    }

    let (ciphertext, encrypted_tag) = input.split_at(pt_len);

    let mut s0 = encrypt_block(round_keys, &counter_block(nonce, 0));
    let mut received = [0u8; TAG_SIZE];
    for ((r, e), s) in received.iter_mut().zip(encrypted_tag).zip(&s0) {
        *r = e ^ s;
    }

    let out = &mut plaintext[..pt_len];
    apply_keystream(round_keys, nonce, ciphertext, out);

    let mut mac = cbc_mac(round_keys, nonce, aad, out);
    let matches: bool = mac[..TAG_SIZE].ct_eq(&received[..]).into();

    mac.zeroize();
    s0.zeroize();
    received.zeroize();

    if !matches {
        out.zeroize();
        return Err(CryptoError::decryption_failed());
    }
    Ok(pt_len)
}

fn check_lengths(aad: &[u8], payload_len: usize) -> Result<(), CryptoError> {
    if payload_len > MAX_PAYLOAD_SIZE {
        return Err(CryptoError::inner_frame_too_large());
    }
    if aad.len() > MAX_AAD_SIZE {
        return Err(CryptoError::aad_too_large());
    }
    Ok(())
}

/// `Ai = flags(1) || nonce(13) || i(2, BE)`.
fn counter_block(nonce: &[u8; NONCE_SIZE], i: u16) -> [u8; BLOCK_SIZE] {
    let mut block = [0u8; BLOCK_SIZE];
    block[0] = CTR_FLAGS;
    block[1..=NONCE_SIZE].copy_from_slice(nonce);
    block[BLOCK_SIZE - LEN_FIELD_SIZE..].copy_from_slice(&i.to_be_bytes());
    block
}

/// XOR `input` with the keystream from A1, A2, ... into `output`.
fn apply_keystream(
    round_keys: &RoundKeys,
    nonce: &[u8; NONCE_SIZE],
    input: &[u8],
    output: &mut [u8],
) {
    let mut counter: u16 = 1;
    for (src, dst) in input.chunks(BLOCK_SIZE).zip(output.chunks_mut(BLOCK_SIZE)) {
        let mut keystream = encrypt_block(round_keys, &counter_block(nonce, counter));
        for ((d, s), k) in dst.iter_mut().zip(src).zip(&keystream) {
            *d = s ^ k;
        }
        keystream.zeroize();
        counter = counter.wrapping_add(1);
    }
}

/// CBC-MAC over B0, the length-prefixed AAD and the payload, each zero-padded
/// to the block size. Returns the full final block; the tag is its prefix.
fn cbc_mac(
    round_keys: &RoundKeys,
    nonce: &[u8; NONCE_SIZE],
    aad: &[u8],
    payload: &[u8],
) -> [u8; BLOCK_SIZE] {
    let mut block = [0u8; BLOCK_SIZE];
    block[0] = if aad.is_empty() {
        B0_FLAGS
    } else {
        B0_FLAGS | B0_ADATA
    };
    block[1..=NONCE_SIZE].copy_from_slice(nonce);
    // Lengths were checked against the field widths by the callers.
    block[BLOCK_SIZE - LEN_FIELD_SIZE..].copy_from_slice(&(payload.len() as u16).to_be_bytes());
    let mut y = encrypt_block(round_keys, &block);

    if !aad.is_empty() {
        block = [0u8; BLOCK_SIZE];
        block[..2].copy_from_slice(&(aad.len() as u16).to_be_bytes());
        let first = aad.len().min(BLOCK_SIZE - 2);
        block[2..2 + first].copy_from_slice(&aad[..first]);
        absorb(round_keys, &mut y, &block);

        for chunk in aad[first..].chunks(BLOCK_SIZE) {
            absorb(round_keys, &mut y, chunk);
        }
    }

    for chunk in payload.chunks(BLOCK_SIZE) {
        absorb(round_keys, &mut y, chunk);
    }

    block.zeroize();
    y
}

/// One CBC step. A short `chunk` is implicitly zero-padded.
fn absorb(round_keys: &RoundKeys, y: &mut [u8; BLOCK_SIZE], chunk: &[u8]) {
    for (a, b) in y.iter_mut().zip(chunk) {
        *a ^= b;
    }
    *y = encrypt_block(round_keys, y);
}
