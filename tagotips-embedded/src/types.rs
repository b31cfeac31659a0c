use core::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::consts::{
    COUNTER_SIZE, FLAGS_CIPHER_MASK, FLAGS_CIPHER_SHIFT, FLAGS_METHOD_MASK, FLAGS_SIZE,
    FLAGS_VERSION_MASK, FLAGS_VERSION_SHIFT, HASH_SIZE, HEADER_SIZE, KEY_SIZE, MAX_VERSION,
    RESERVED_FLAGS_VALUE,
};
use crate::error::CryptoError;
use crate::hex::hex_to_bytes;

/// AEAD cipher suite identifier carried in the Flags byte.
///
/// All five suites parse; only [`CipherSuite::Aes128Ccm`] is implemented by
/// this crate, the rest are rejected by `open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherSuite {
    /// Suite 0: AES-128-CCM (16B key, 8B tag, 13B nonce).
    Aes128Ccm = 0,
    /// Suite 1: AES-128-GCM (16B key, 16B tag, 12B nonce).
    Aes128Gcm = 1,
    /// Suite 2: AES-256-CCM (32B key, 8B tag, 13B nonce).
    Aes256Ccm = 2,
    /// Suite 3: AES-256-GCM (32B key, 16B tag, 12B nonce).
    Aes256Gcm = 3,
    /// Suite 4: ChaCha20-Poly1305 (32B key, 16B tag, 12B nonce).
    ChaCha20Poly1305 = 4,
}

impl CipherSuite {
    /// Create from cipher suite ID. Returns error for IDs above 4.
    pub fn from_id(id: u8) -> Result<Self, CryptoError> {
        match id {
            0 => Ok(Self::Aes128Ccm),
            1 => Ok(Self::Aes128Gcm),
            2 => Ok(Self::Aes256Ccm),
            3 => Ok(Self::Aes256Gcm),
            4 => Ok(Self::ChaCha20Poly1305),
            _ => Err(CryptoError::unsupported_cipher()),
        }
    }

    /// Cipher suite ID (0-4).
    #[must_use]
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Required encryption key size in bytes.
    ///
    /// The size accessors describe every registered suite, including the
    /// ones this crate parses but does not implement.
    #[must_use]
    pub fn key_size(self) -> usize {
        match self {
            Self::Aes128Ccm | Self::Aes128Gcm => 16,
            Self::Aes256Ccm | Self::Aes256Gcm | Self::ChaCha20Poly1305 => 32,
        }
    }

    /// Authentication tag size in bytes.
    #[must_use]
    pub fn tag_size(self) -> usize {
        match self {
            Self::Aes128Ccm | Self::Aes256Ccm => 8,
            Self::Aes128Gcm | Self::Aes256Gcm | Self::ChaCha20Poly1305 => 16,
        }
    }

    /// Nonce size in bytes.
    #[must_use]
    pub fn nonce_size(self) -> usize {
        match self {
            Self::Aes128Ccm | Self::Aes256Ccm => 13,
            Self::Aes128Gcm | Self::Aes256Gcm | Self::ChaCha20Poly1305 => 12,
        }
    }

    /// Whether this crate can seal and open envelopes of this suite.
    #[must_use]
    pub fn is_supported(self) -> bool {
        matches!(self, Self::Aes128Ccm)
    }
}

/// Envelope method (bits 2-0 of the Flags byte).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeMethod {
    /// PUSH (0) — send data to server.
    Push = 0,
    /// PULL (1) — retrieve data from server.
    Pull = 1,
    /// PING (2) — keepalive.
    Ping = 2,
    /// ACK (3) — downlink response.
    Ack = 3,
}

impl EnvelopeMethod {
    /// Create from method ID. Returns error for IDs above 3.
    pub fn from_id(id: u8) -> Result<Self, CryptoError> {
        match id {
            0 => Ok(Self::Push),
            1 => Ok(Self::Pull),
            2 => Ok(Self::Ping),
            3 => Ok(Self::Ack),
            _ => Err(CryptoError::invalid_method()),
        }
    }

    /// Method ID (0-3).
    #[must_use]
    pub fn id(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for EnvelopeMethod {
    type Error = CryptoError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::from_id(id)
    }
}

/// Flags byte encoder/decoder.
pub struct Flags;

impl Flags {
    /// Encode cipher suite, version, and method into a Flags byte.
    /// Returns error if the resulting byte is the reserved value 0x41.
    pub fn encode(
        cipher: CipherSuite,
        version: u8,
        method: EnvelopeMethod,
    ) -> Result<u8, CryptoError> {
        if version > MAX_VERSION {
            return Err(CryptoError::unsupported_version());
        }
        let byte =
            (cipher.id() << FLAGS_CIPHER_SHIFT) | (version << FLAGS_VERSION_SHIFT) | method.id();
        if byte == RESERVED_FLAGS_VALUE {
            return Err(CryptoError::reserved_flags_value());
        }
        Ok(byte)
    }

    /// Decode a Flags byte into (cipher suite, version, method).
    ///
    /// The reserved byte is rejected before any field is looked at.
    pub fn decode(byte: u8) -> Result<(CipherSuite, u8, EnvelopeMethod), CryptoError> {
        if byte == RESERVED_FLAGS_VALUE {
            return Err(CryptoError::reserved_flags_value());
        }
        let cipher_id = (byte & FLAGS_CIPHER_MASK) >> FLAGS_CIPHER_SHIFT;
        let version = (byte & FLAGS_VERSION_MASK) >> FLAGS_VERSION_SHIFT;
        let method_id = byte & FLAGS_METHOD_MASK;

        let cipher = CipherSuite::from_id(cipher_id)?;
        let method = EnvelopeMethod::from_id(method_id)?;

        Ok((cipher, version, method))
    }
}

/// Parsed envelope header (first 21 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeHeader {
    /// Raw flags byte.
    pub flags: u8,
    /// Sequence counter (big-endian u32 on the wire).
    pub counter: u32,
    /// Authorization Hash (first 8 bytes of SHA-256 of token without "at" prefix).
    pub auth_hash: [u8; HASH_SIZE],
    /// Device Hash (first 8 bytes of SHA-256 of serial).
    pub device_hash: [u8; HASH_SIZE],
}

impl EnvelopeHeader {
    /// Serialize the header to a 21-byte array (used verbatim as AAD).
    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        let mut pos = 0;
        out[pos] = self.flags;
        pos += FLAGS_SIZE;
        out[pos..pos + COUNTER_SIZE].copy_from_slice(&self.counter.to_be_bytes());
        pos += COUNTER_SIZE;
        out[pos..pos + HASH_SIZE].copy_from_slice(&self.auth_hash);
        pos += HASH_SIZE;
        out[pos..pos + HASH_SIZE].copy_from_slice(&self.device_hash);
        out
    }

    /// Parse a header from raw bytes. Only the length is checked here.
    pub fn from_bytes(data: &[u8]) -> Result<Self, CryptoError> {
        if data.len() < HEADER_SIZE {
            return Err(CryptoError::envelope_too_short());
        }
        let flags = data[0];
        let counter = u32::from_be_bytes([data[1], data[2], data[3], data[4]]);
        let mut auth_hash = [0u8; HASH_SIZE];
        auth_hash.copy_from_slice(&data[5..13]);
        let mut device_hash = [0u8; HASH_SIZE];
        device_hash.copy_from_slice(&data[13..21]);
        Ok(Self {
            flags,
            counter,
            auth_hash,
            device_hash,
        })
    }
}

/// 16-byte AES-128 encryption key, wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey([u8; KEY_SIZE]);

impl EncryptionKey {
    #[must_use]
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Build a key from key material of exactly 16 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != KEY_SIZE {
            return Err(CryptoError::invalid_key_size());
        }
        let mut key = Self::zeroed();
        key.0.copy_from_slice(bytes);
        Ok(key)
    }

    /// Parse a key from 32 hex characters (either case).
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        if hex.len() != KEY_SIZE * 2 {
            return Err(CryptoError::invalid_key_size());
        }
        // Decoded straight into the wrapper; a failed parse drops (and wipes) it.
        let mut key = Self::zeroed();
        hex_to_bytes(hex, &mut key.0)?;
        Ok(key)
    }

    pub(crate) fn zeroed() -> Self {
        Self([0u8; KEY_SIZE])
    }

    pub(crate) fn as_mut_bytes(&mut self) -> &mut [u8; KEY_SIZE] {
        &mut self.0
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionKey(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CryptoErrorKind;

    #[test]
    fn test_flags_bit_layout() {
        // cipher 4 (100), version 2 (10), method 3 (011)
        let byte = Flags::encode(CipherSuite::ChaCha20Poly1305, 2, EnvelopeMethod::Ack).unwrap();
        assert_eq!(byte, 0b1001_0011);
        assert_eq!(
            Flags::decode(byte).unwrap(),
            (CipherSuite::ChaCha20Poly1305, 2, EnvelopeMethod::Ack)
        );
    }

    #[test]
    fn test_flags_version_out_of_range() {
        let err = Flags::encode(CipherSuite::Aes128Ccm, 4, EnvelopeMethod::Push).unwrap_err();
        assert_eq!(err.kind, CryptoErrorKind::UnsupportedVersion);
    }

    #[test]
    fn test_method_try_from() {
        assert_eq!(EnvelopeMethod::try_from(2).unwrap(), EnvelopeMethod::Ping);
        assert_eq!(
            EnvelopeMethod::try_from(4).unwrap_err().kind,
            CryptoErrorKind::InvalidMethod
        );
    }

    #[test]
    fn test_header_round_trip() {
        let header = EnvelopeHeader {
            flags: 0x03,
            counter: 0x0102_0304,
            auth_hash: [0x11; 8],
            device_hash: [0x22; 8],
        };
        let bytes = header.to_bytes();
        assert_eq!(&bytes[..5], &[0x03, 0x01, 0x02, 0x03, 0x04]);
        assert_eq!(EnvelopeHeader::from_bytes(&bytes).unwrap(), header);
    }

    #[test]
    fn test_encryption_key_from_hex() {
        let key = EncryptionKey::from_hex("FE09DA81BC4400EE12AB56CD78EF9012").unwrap();
        assert_eq!(
            key.as_bytes(),
            &[
                0xfe, 0x09, 0xda, 0x81, 0xbc, 0x44, 0x00, 0xee, 0x12, 0xab, 0x56, 0xcd, 0x78,
                0xef, 0x90, 0x12,
            ]
        );
        assert_eq!(
            EncryptionKey::from_hex("fe09").unwrap_err().kind,
            CryptoErrorKind::InvalidKeySize
        );
        assert_eq!(
            EncryptionKey::from_hex("zz09da81bc4400ee12ab56cd78ef9012").unwrap_err().kind,
            CryptoErrorKind::InvalidHex
        );
    }

    #[test]
    fn test_encryption_key_from_slice() {
        let material: [u8; 17] = core::array::from_fn(|i| i as u8);

        let key = EncryptionKey::from_slice(&material[..16]).unwrap();
        assert_eq!(key.as_bytes()[..], material[..16]);

        assert_eq!(
            EncryptionKey::from_slice(&material[..15]).unwrap_err().kind,
            CryptoErrorKind::InvalidKeySize
        );
        assert_eq!(
            EncryptionKey::from_slice(&material).unwrap_err().kind,
            CryptoErrorKind::InvalidKeySize
        );
        assert_eq!(
            EncryptionKey::from_slice(&[]).unwrap_err().kind,
            CryptoErrorKind::InvalidKeySize
        );
    }

    #[test]
    fn test_encryption_key_zeroize() {
        let mut key = EncryptionKey::from_hex("fe09da81bc4400ee12ab56cd78ef9012").unwrap();
        key.zeroize();
        assert_eq!(key.as_bytes(), &[0u8; 16]);
    }

    #[test]
    fn test_encryption_key_debug_redacted() {
        use alloc::format;

        let key = EncryptionKey::from_bytes([0xab; 16]);
        assert_eq!(format!("{key:?}"), "EncryptionKey(..)");
    }
}
