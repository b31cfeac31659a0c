//! SHA-256 (FIPS 180-4).
//!
//! Incremental hasher with a fixed 64-byte block buffer. The working state is
//! wiped when the hasher is finalized or dropped.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::consts::DIGEST_SIZE;

const BLOCK_LEN: usize = 64;

/// Offset of the 64-bit message length inside the final padded block.
const LENGTH_OFFSET: usize = BLOCK_LEN - 8;

const K: [u32; 64] = [
    0x428a_2f98, 0x7137_4491, 0xb5c0_fbcf, 0xe9b5_dba5, 0x3956_c25b, 0x59f1_11f1, 0x923f_82a4,
    0xab1c_5ed5, 0xd807_aa98, 0x1283_5b01, 0x2431_85be, 0x550c_7dc3, 0x72be_5d74, 0x80de_b1fe,
    0x9bdc_06a7, 0xc19b_f174, 0xe49b_69c1, 0xefbe_4786, 0x0fc1_9dc6, 0x240c_a1cc, 0x2de9_2c6f,
    0x4a74_84aa, 0x5cb0_a9dc, 0x76f9_88da, 0x983e_5152, 0xa831_c66d, 0xb003_27c8, 0xbf59_7fc7,
    0xc6e0_0bf3, 0xd5a7_9147, 0x06ca_6351, 0x1429_2967, 0x27b7_0a85, 0x2e1b_2138, 0x4d2c_6dfc,
    0x5338_0d13, 0x650a_7354, 0x766a_0abb, 0x81c2_c92e, 0x9272_2c85, 0xa2bf_e8a1, 0xa81a_664b,
    0xc24b_8b70, 0xc76c_51a3, 0xd192_e819, 0xd699_0624, 0xf40e_3585, 0x106a_a070, 0x19a4_c116,
    0x1e37_6c08, 0x2748_774c, 0x34b0_bcb5, 0x391c_0cb3, 0x4ed8_aa4a, 0x5b9c_ca4f, 0x682e_6ff3,
    0x748f_82ee, 0x78a5_636f, 0x84c8_7814, 0x8cc7_0208, 0x90be_fffa, 0xa450_6ceb, 0xbef9_a3f7,
    0xc671_78f2,
];

const H0: [u32; 8] = [
    0x6a09_e667, 0xbb67_ae85, 0x3c6e_f372, 0xa54f_f53a, 0x510e_527f, 0x9b05_688c, 0x1f83_d9ab,
    0x5be0_cd19,
];

/// Incremental SHA-256 hasher.
///
/// `update` may be called any number of times with chunks of any size; the
/// result is identical to hashing the concatenated input in one call.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Sha256 {
    state: [u32; 8],
    buf: [u8; BLOCK_LEN],
    /// Total number of bytes absorbed so far.
    total: u64,
}

impl Sha256 {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: H0,
            buf: [0u8; BLOCK_LEN],
            total: 0,
        }
    }

    /// Absorb `data` into the hash state.
    pub fn update(&mut self, mut data: &[u8]) {
        let buffered = (self.total % BLOCK_LEN as u64) as usize;
        self.total = self.total.wrapping_add(data.len() as u64);

        if buffered > 0 {
            let fill = BLOCK_LEN - buffered;
            if data.len() < fill {
                self.buf[buffered..buffered + data.len()].copy_from_slice(data);
                return;
            }
            self.buf[buffered..].copy_from_slice(&data[..fill]);
            compress(&mut self.state, &self.buf);
            data = &data[fill..];
        }

        let mut blocks = data.chunks_exact(BLOCK_LEN);
        for block in &mut blocks {
            compress(&mut self.state, block);
        }

        let rest = blocks.remainder();
        self.buf[..rest.len()].copy_from_slice(rest);
    }

    /// Apply the final padding and return the 32-byte digest.
    ///
    /// Consumes the hasher; its state is zeroed on drop.
    #[must_use]
    pub fn finalize(mut self) -> [u8; DIGEST_SIZE] {
        let total_bits = self.total.wrapping_mul(8);
        let mut buffered = (self.total % BLOCK_LEN as u64) as usize;

        self.buf[buffered] = 0x80;
        buffered += 1;

        if buffered > LENGTH_OFFSET {
            self.buf[buffered..].fill(0);
            compress(&mut self.state, &self.buf);
            buffered = 0;
        }

        self.buf[buffered..LENGTH_OFFSET].fill(0);
        self.buf[LENGTH_OFFSET..].copy_from_slice(&total_bits.to_be_bytes());
        compress(&mut self.state, &self.buf);

        let mut digest = [0u8; DIGEST_SIZE];
        for (out, word) in digest.chunks_exact_mut(4).zip(self.state.iter()) {
            out.copy_from_slice(&word.to_be_bytes());
        }
        digest
    }

    /// One-shot convenience: `new`, `update`, `finalize`.
    #[must_use]
    pub fn digest(data: &[u8]) -> [u8; DIGEST_SIZE] {
        let mut hasher = Self::new();
        hasher.update(data);
        hasher.finalize()
    }
}

impl Default for Sha256 {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash `data` in one call.
#[must_use]
pub fn hash(data: &[u8]) -> [u8; DIGEST_SIZE] {
    Sha256::digest(data)
}

/// Run the 64-round compression function over one 64-byte block.
#[allow(clippy::many_single_char_names)]
fn compress(state: &mut [u32; 8], block: &[u8]) {
    debug_assert_eq!(block.len(), BLOCK_LEN);

    let mut w = [0u32; 64];
    for (i, word) in block.chunks_exact(4).enumerate() {
        w[i] = u32::from_be_bytes([word[0], word[1], word[2], word[3]]);
    }
    for i in 16..64 {
        let s0 = w[i - 15].rotate_right(7) ^ w[i - 15].rotate_right(18) ^ (w[i - 15] >> 3);
        let s1 = w[i - 2].rotate_right(17) ^ w[i - 2].rotate_right(19) ^ (w[i - 2] >> 10);
        w[i] = w[i - 16]
            .wrapping_add(s0)
            .wrapping_add(w[i - 7])
            .wrapping_add(s1);
    }

    let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = *state;

    for i in 0..64 {
        let big_s1 = e.rotate_right(6) ^ e.rotate_right(11) ^ e.rotate_right(25);
        let ch = (e & f) ^ (!e & g);
        let t1 = h
            .wrapping_add(big_s1)
            .wrapping_add(ch)
            .wrapping_add(K[i])
            .wrapping_add(w[i]);
        let big_s0 = a.rotate_right(2) ^ a.rotate_right(13) ^ a.rotate_right(22);
        let maj = (a & b) ^ (a & c) ^ (b & c);
        let t2 = big_s0.wrapping_add(maj);

        h = g;
        g = f;
        f = e;
        e = d.wrapping_add(t1);
        d = c;
        c = b;
        b = a;
        a = t1.wrapping_add(t2);
    }

    for (s, v) in state.iter_mut().zip([a, b, c, d, e, f, g, h]) {
        *s = s.wrapping_add(v);
    }

    w.zeroize();
}
