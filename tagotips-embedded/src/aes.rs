//! AES-128 forward cipher (FIPS-197).
//!
//! Only encryption is implemented: CCM drives the block cipher in the forward
//! direction for both the CBC-MAC and the CTR keystream.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::consts::{BLOCK_SIZE, KEY_SIZE, ROUND_KEYS_SIZE};

const ROUNDS: usize = 10;

#[rustfmt::skip]
const SBOX: [u8; 256] = [
    0x63, 0x7c, 0x77, 0x7b, 0xf2, 0x6b, 0x6f, 0xc5, 0x30, 0x01, 0x67, 0x2b, 0xfe, 0xd7, 0xab, 0x76,
    0xca, 0x82, 0xc9, 0x7d, 0xfa, 0x59, 0x47, 0xf0, 0xad, 0xd4, 0xa2, 0xaf, 0x9c, 0xa4, 0x72, 0xc0,
    0xb7, 0xfd, 0x93, 0x26, 0x36, 0x3f, 0xf7, 0xcc, 0x34, 0xa5, 0xe5, 0xf1, 0x71, 0xd8, 0x31, 0x15,
    0x04, 0xc7, 0x23, 0xc3, 0x18, 0x96, 0x05, 0x9a, 0x07, 0x12, 0x80, 0xe2, 0xeb, 0x27, 0xb2, 0x75,
    0x09, 0x83, 0x2c, 0x1a, 0x1b, 0x6e, 0x5a, 0xa0, 0x52, 0x3b, 0xd6, 0xb3, 0x29, 0xe3, 0x2f, 0x84,
    0x53, 0xd1, 0x00, 0xed, 0x20, 0xfc, 0xb1, 0x5b, 0x6a, 0xcb, 0xbe, 0x39, 0x4a, 0x4c, 0x58, 0xcf,
    0xd0, 0xef, 0xaa, 0xfb, 0x43, 0x4d, 0x33, 0x85, 0x45, 0xf9, 0x02, 0x7f, 0x50, 0x3c, 0x9f, 0xa8,
    0x51, 0xa3, 0x40, 0x8f, 0x92, 0x9d, 0x38, 0xf5, 0xbc, 0xb6, 0xda, 0x21, 0x10, 0xff, 0xf3, 0xd2,
    0xcd, 0x0c, 0x13, 0xec, 0x5f, 0x97, 0x44, 0x17, 0xc4, 0xa7, 0x7e, 0x3d, 0x64, 0x5d, 0x19, 0x73,
    0x60, 0x81, 0x4f, 0xdc, 0x22, 0x2a, 0x90, 0x88, 0x46, 0xee, 0xb8, 0x14, 0xde, 0x5e, 0x0b, 0xdb,
    0xe0, 0x32, 0x3a, 0x0a, 0x49, 0x06, 0x24, 0x5c, 0xc2, 0xd3, 0xac, 0x62, 0x91, 0x95, 0xe4, 0x79,
    0xe7, 0xc8, 0x37, 0x6d, 0x8d, 0xd5, 0x4e, 0xa9, 0x6c, 0x56, 0xf4, 0xea, 0x65, 0x7a, 0xae, 0x08,
    0xba, 0x78, 0x25, 0x2e, 0x1c, 0xa6, 0xb4, 0xc6, 0xe8, 0xdd, 0x74, 0x1f, 0x4b, 0xbd, 0x8b, 0x8a,
    0x70, 0x3e, 0xb5, 0x66, 0x48, 0x03, 0xf6, 0x0e, 0x61, 0x35, 0x57, 0xb9, 0x86, 0xc1, 0x1d, 0x9e,
    0xe1, 0xf8, 0x98, 0x11, 0x69, 0xd9, 0x8e, 0x94, 0x9b, 0x1e, 0x87, 0xe9, 0xce, 0x55, 0x28, 0xdf,
    0x8c, 0xa1, 0x89, 0x0d, 0xbf, 0xe6, 0x42, 0x68, 0x41, 0x99, 0x2d, 0x0f, 0xb0, 0x54, 0xbb, 0x16,
];

const RCON: [u8; ROUNDS] = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1b, 0x36];

/// Expanded AES-128 key schedule (11 round keys).
///
/// Zeroed on drop, so every exit path of the caller wipes it.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct RoundKeys([u8; ROUND_KEYS_SIZE]);

impl RoundKeys {
    /// Raw schedule bytes, round key `i` at `[16 * i..16 * (i + 1)]`.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; ROUND_KEYS_SIZE] {
        &self.0
    }

    fn round(&self, i: usize) -> &[u8] {
        &self.0[i * BLOCK_SIZE..(i + 1) * BLOCK_SIZE]
    }
}

impl core::fmt::Debug for RoundKeys {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("RoundKeys(..)")
    }
}

/// Expand a 16-byte key into the 176-byte round-key schedule.
#[must_use]
pub fn key_expand(key: &[u8; KEY_SIZE]) -> RoundKeys {
    let mut round_keys = RoundKeys([0u8; ROUND_KEYS_SIZE]);
    let rk = &mut round_keys.0;
    rk[..KEY_SIZE].copy_from_slice(key);

    for i in 4..4 * (ROUNDS + 1) {
        let prev = (i - 1) * 4;
        let mut word = [rk[prev], rk[prev + 1], rk[prev + 2], rk[prev + 3]];

        if i % 4 == 0 {
            // RotWord, SubWord, Rcon
            word.rotate_left(1);
            for b in &mut word {
                *b = SBOX[*b as usize];
            }
            word[0] ^= RCON[i / 4 - 1];
        }

        for j in 0..4 {
            rk[i * 4 + j] = rk[(i - 4) * 4 + j] ^ word[j];
        }
        word.zeroize();
    }

    round_keys
}

/// Encrypt a single 16-byte block.
#[must_use]
pub fn encrypt_block(round_keys: &RoundKeys, input: &[u8; BLOCK_SIZE]) -> [u8; BLOCK_SIZE] {
    let mut state = *input;
    add_round_key(&mut state, round_keys.round(0));

    for round in 1..=ROUNDS {
        sub_bytes(&mut state);
        shift_rows(&mut state);
        if round < ROUNDS {
            mix_columns(&mut state);
        }
        add_round_key(&mut state, round_keys.round(round));
    }

    state
}

fn add_round_key(state: &mut [u8; BLOCK_SIZE], round_key: &[u8]) {
    for (s, k) in state.iter_mut().zip(round_key) {
        *s ^= k;
    }
}

fn sub_bytes(state: &mut [u8; BLOCK_SIZE]) {
    for b in state.iter_mut() {
        *b = SBOX[*b as usize];
    }
}

/// State is column-major: byte `r + 4c` is row `r`, column `c`.
fn shift_rows(s: &mut [u8; BLOCK_SIZE]) {
    // Row 1: left by 1
    let t = s[1];
    s[1] = s[5];
    s[5] = s[9];
    s[9] = s[13];
    s[13] = t;
    // Row 2: left by 2
    s.swap(2, 10);
    s.swap(6, 14);
    // Row 3: left by 3
    let t = s[15];
    s[15] = s[11];
    s[11] = s[7];
    s[7] = s[3];
    s[3] = t;
}

fn xtime(x: u8) -> u8 {
    (x << 1) ^ (((x >> 7) & 1) * 0x1b)
}

fn mix_columns(s: &mut [u8; BLOCK_SIZE]) {
    for col in s.chunks_exact_mut(4) {
        let [a0, a1, a2, a3] = [col[0], col[1], col[2], col[3]];
        let [x0, x1, x2, x3] = [xtime(a0), xtime(a1), xtime(a2), xtime(a3)];
        col[0] = x0 ^ a1 ^ x1 ^ a2 ^ a3;
        col[1] = a0 ^ x1 ^ a2 ^ x2 ^ a3;
        col[2] = a0 ^ a1 ^ x2 ^ a3 ^ x3;
        col[3] = a0 ^ x0 ^ a1 ^ a2 ^ x3;
    }
}
