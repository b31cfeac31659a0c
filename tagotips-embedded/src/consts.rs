/// Size of the envelope header (Flags + Counter + Auth Hash + Device Hash).
pub const HEADER_SIZE: usize = 21;

/// Size of the Flags field.
pub const FLAGS_SIZE: usize = 1;

/// Size of the Counter field.
pub const COUNTER_SIZE: usize = 4;

/// Size of the Authorization Hash and the Device Hash.
pub const HASH_SIZE: usize = 8;

/// AES-128 key size.
pub const KEY_SIZE: usize = 16;

/// CCM authentication tag size (t = 8).
pub const TAG_SIZE: usize = 8;

/// CCM nonce size (13 bytes, L = 2).
pub const NONCE_SIZE: usize = 13;

/// AES block size.
pub const BLOCK_SIZE: usize = 16;

/// Expanded AES-128 key schedule: 11 round keys of 16 bytes.
pub const ROUND_KEYS_SIZE: usize = 176;

/// SHA-256 digest size.
pub const DIGEST_SIZE: usize = 32;

/// Largest HMAC-SHA256 derived key that can be requested.
pub const MAX_DERIVED_KEY_SIZE: usize = DIGEST_SIZE;

/// Maximum plaintext inner frame size.
pub const MAX_INNER_FRAME_SIZE: usize = 16_384;

/// Smallest valid envelope: header and tag around an empty inner frame.
pub const MIN_ENVELOPE_SIZE: usize = HEADER_SIZE + TAG_SIZE;

/// Largest valid envelope.
pub const MAX_ENVELOPE_SIZE: usize = HEADER_SIZE + MAX_INNER_FRAME_SIZE + TAG_SIZE;

/// Reserved Flags byte value (0x41 = ASCII 'A') for disambiguation.
pub const RESERVED_FLAGS_VALUE: u8 = 0x41;

/// Flags byte bitmask for cipher suite (bits 7-5).
pub const FLAGS_CIPHER_MASK: u8 = 0b1110_0000;

/// Flags byte shift for cipher suite.
pub const FLAGS_CIPHER_SHIFT: u8 = 5;

/// Flags byte bitmask for version (bits 4-3).
pub const FLAGS_VERSION_MASK: u8 = 0b0001_1000;

/// Flags byte shift for version.
pub const FLAGS_VERSION_SHIFT: u8 = 3;

/// Flags byte bitmask for method (bits 2-0).
pub const FLAGS_METHOD_MASK: u8 = 0b0000_0111;

/// Highest protocol version that fits the Flags byte.
pub const MAX_VERSION: u8 = 3;

/// Protocol version emitted by `seal` and accepted by `open`.
pub const PROTOCOL_VERSION: u8 = 0;

/// Scheme prefix carried by authorization tokens (`at` + 32 hex chars).
pub const AUTH_TOKEN_PREFIX: &str = "at";
