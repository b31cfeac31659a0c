use core::fmt;

/// Specific kind of crypto error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CryptoErrorKind {
    /// Envelope is too short to contain a header (and tag, when opening).
    EnvelopeTooShort,
    /// Inner frame exceeds maximum allowed size.
    InnerFrameTooLarge,
    /// Output buffer is too small.
    BufferTooSmall,
    /// Cipher suite ID is not recognized, or not implemented by this crate.
    UnsupportedCipher,
    /// Protocol version is not supported.
    UnsupportedVersion,
    /// Method ID is not recognized.
    InvalidMethod,
    /// The Flags byte value 0x41 is reserved for disambiguation.
    ReservedFlagsValue,
    /// Authentication tag mismatch (wrong key, tampered data, or AAD mismatch).
    DecryptionFailed,
    /// Key material has the wrong size, or a derived key longer than 32 bytes was requested.
    InvalidKeySize,
    /// Additional authenticated data does not fit the CCM two-byte length encoding.
    AadTooLarge,
    /// Hex text has odd length or contains a non-hex character.
    InvalidHex,
}

/// Error returned by envelope, cipher and encoding operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CryptoError {
    pub kind: CryptoErrorKind,
}

impl CryptoError {
    #[must_use]
    pub fn new(kind: CryptoErrorKind) -> Self {
        Self { kind }
    }

    #[must_use]
    pub fn envelope_too_short() -> Self {
        Self::new(CryptoErrorKind::EnvelopeTooShort)
    }

    #[must_use]
    pub fn inner_frame_too_large() -> Self {
        Self::new(CryptoErrorKind::InnerFrameTooLarge)
    }

    #[must_use]
    pub fn buffer_too_small() -> Self {
        Self::new(CryptoErrorKind::BufferTooSmall)
    }

    #[must_use]
    pub fn unsupported_cipher() -> Self {
        Self::new(CryptoErrorKind::UnsupportedCipher)
    }

    #[must_use]
    pub fn unsupported_version() -> Self {
        Self::new(CryptoErrorKind::UnsupportedVersion)
    }

    #[must_use]
    pub fn invalid_method() -> Self {
        Self::new(CryptoErrorKind::InvalidMethod)
    }

    #[must_use]
    pub fn reserved_flags_value() -> Self {
        Self::new(CryptoErrorKind::ReservedFlagsValue)
    }

    #[must_use]
    pub fn decryption_failed() -> Self {
        Self::new(CryptoErrorKind::DecryptionFailed)
    }

    #[must_use]
    pub fn invalid_key_size() -> Self {
        Self::new(CryptoErrorKind::InvalidKeySize)
    }

    #[must_use]
    pub fn aad_too_large() -> Self {
        Self::new(CryptoErrorKind::AadTooLarge)
    }

    #[must_use]
    pub fn invalid_hex() -> Self {
        Self::new(CryptoErrorKind::InvalidHex)
    }
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let desc = match self.kind {
            CryptoErrorKind::EnvelopeTooShort => "envelope too short",
            CryptoErrorKind::InnerFrameTooLarge => "inner frame exceeds maximum size",
            CryptoErrorKind::BufferTooSmall => "output buffer too small",
            CryptoErrorKind::UnsupportedCipher => "unsupported cipher suite",
            CryptoErrorKind::UnsupportedVersion => "unsupported version",
            CryptoErrorKind::InvalidMethod => "invalid method",
            CryptoErrorKind::ReservedFlagsValue => "flags byte 0x41 is reserved",
            CryptoErrorKind::DecryptionFailed => "AEAD decryption failed",
            CryptoErrorKind::InvalidKeySize => "invalid encryption key size",
            CryptoErrorKind::AadTooLarge => "additional authenticated data too large",
            CryptoErrorKind::InvalidHex => "malformed hex string",
        };
        f.write_str(desc)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CryptoError {}
