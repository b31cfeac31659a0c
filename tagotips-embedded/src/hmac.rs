//! HMAC-SHA256 (RFC 2104) over the in-crate SHA-256.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::consts::DIGEST_SIZE;
use crate::sha256::Sha256;

const BLOCK_LEN: usize = 64;
const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

/// Incremental HMAC-SHA256.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct HmacSha256 {
    inner: Sha256,
    outer: Sha256,
}

impl HmacSha256 {
    /// Key the MAC. Keys longer than the 64-byte block are hashed first.
    #[must_use]
    pub fn new(key: &[u8]) -> Self {
        let mut block_key = [0u8; BLOCK_LEN];
        if key.len() > BLOCK_LEN {
            let mut digest = Sha256::digest(key);
            block_key[..DIGEST_SIZE].copy_from_slice(&digest);
            digest.zeroize();
        } else {
            block_key[..key.len()].copy_from_slice(key);
        }

        let mut pad = [0u8; BLOCK_LEN];

        let mut inner = Sha256::new();
        for (p, k) in pad.iter_mut().zip(block_key.iter()) {
            *p = k ^ IPAD;
        }
        inner.update(&pad);

        let mut outer = Sha256::new();
        for (p, k) in pad.iter_mut().zip(block_key.iter()) {
            *p = k ^ OPAD;
        }
        outer.update(&pad);

        pad.zeroize();
        block_key.zeroize();

        Self { inner, outer }
    }

    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    /// Finish the MAC and return the 32-byte tag.
    #[must_use]
    pub fn finalize(self) -> [u8; DIGEST_SIZE] {
        let mut inner_digest = self.inner.clone().finalize();
        let mut outer = self.outer.clone();
        outer.update(&inner_digest);
        inner_digest.zeroize();
        outer.finalize()
    }

    /// One-shot convenience over a single message.
    #[must_use]
    pub fn mac(key: &[u8], data: &[u8]) -> [u8; DIGEST_SIZE] {
        let mut mac = Self::new(key);
        mac.update(data);
        mac.finalize()
    }
}
