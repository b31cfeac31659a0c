//! Self-contained TagoTiP/S envelope codec for heapless targets.
//!
//! SHA-256, HMAC-SHA256, AES-128 and AES-128-CCM are implemented in-crate;
//! no allocator is needed unless the `alloc` feature is enabled.

#![no_std]
#![forbid(unsafe_code)]

#[cfg(any(feature = "alloc", test))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod aes;
pub mod ccm;
pub mod consts;
pub mod envelope;
pub mod error;
pub mod hash;
pub mod hex;
pub mod hmac;
pub mod nonce;
pub mod sha256;
pub mod types;

pub use error::{CryptoError, CryptoErrorKind};
pub use types::{CipherSuite, EncryptionKey, EnvelopeHeader, EnvelopeMethod, Flags};

pub use envelope::{envelope_len, is_envelope, open, parse_header, seal};
#[cfg(feature = "alloc")]
pub use envelope::{open_to_vec, seal_to_vec};
pub use hash::{derive_auth_hash, derive_device_hash, derive_encryption_key, derive_key};
pub use hex::{bytes_to_hex, hex_to_bytes};
#[cfg(feature = "alloc")]
pub use hex::{bytes_to_hex_string, hex_to_vec};
pub use nonce::construct_nonce;
