use crate::consts::{HASH_SIZE, NONCE_SIZE};

/// Construct the 13-byte CCM nonce from envelope fields.
///
/// `[Flags:1] [0x00 x4] [DeviceHash[:4]:4] [Counter:4 BE]`
///
/// Never random: uniqueness per key rests on the caller never repeating a
/// counter for the same device.
#[must_use]
pub fn construct_nonce(flags: u8, device_hash: &[u8; HASH_SIZE], counter: u32) -> [u8; NONCE_SIZE] {
  let mut nonce = [0u8; NONCE_SIZE];

  nonce[0] = flags;
  // Bytes 1..5 stay zero.
  nonce[5..9].copy_from_slice(&device_hash[..4]);
  nonce[9..].copy_from_slice(&counter.to_be_bytes());

  nonce
}
