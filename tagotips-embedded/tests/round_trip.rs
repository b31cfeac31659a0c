use proptest::prelude::*;
use tagotips_embedded::consts::{MAX_ENVELOPE_SIZE, MAX_INNER_FRAME_SIZE};
use tagotips_embedded::{
  EncryptionKey, EnvelopeMethod, derive_auth_hash, derive_device_hash, derive_encryption_key,
  envelope_len, open, parse_header, seal,
};

const TOKEN: &str = "ate2bd319014b24e0a8aca9f00aea4c0d0";
const SERIAL: &str = "sensor-01";
const KEY_16: [u8; 16] = [
  0xfe, 0x09, 0xda, 0x81, 0xbc, 0x44, 0x00, 0xee, 0x12, 0xab, 0x56, 0xcd, 0x78, 0xef, 0x90,
  0x12,
];

const ALL_METHODS: [EnvelopeMethod; 4] = [
  EnvelopeMethod::Push,
  EnvelopeMethod::Pull,
  EnvelopeMethod::Ping,
  EnvelopeMethod::Ack,
];

fn round_trip(inner: &[u8], method: EnvelopeMethod, counter: u32, key: &[u8; 16]) {
  let auth_hash = derive_auth_hash(TOKEN);
  let device_hash = derive_device_hash(SERIAL);

  let mut envelope = vec![0u8; envelope_len(inner.len())];
  let n = seal(inner, method, counter, &auth_hash, &device_hash, key, &mut envelope).unwrap();
  assert_eq!(n, inner.len() + 29);
  assert_eq!(envelope[0], method.id());

  let header = parse_header(&envelope).unwrap();
  assert_eq!(header.counter, counter);
  assert_eq!(header.auth_hash, auth_hash);
  assert_eq!(header.device_hash, device_hash);

  let mut out = vec![0u8; inner.len()];
  let (opened, opened_method, len) = open(&envelope, key, &mut out).unwrap();
  assert_eq!(opened, header);
  assert_eq!(opened_method, method);
  assert_eq!(&out[..len], inner);
}

#[test]
fn test_aes128_ccm_push() {
  round_trip(b"sensor-01|[temperature:=32.5#C;humidity:=65#%]", EnvelopeMethod::Push, 1, &KEY_16);
}

#[test]
fn test_aes128_ccm_pull() {
  round_trip(b"sensor-01|[temperature]", EnvelopeMethod::Pull, 2, &KEY_16);
}

#[test]
fn test_aes128_ccm_ping() {
  round_trip(b"sensor-01", EnvelopeMethod::Ping, 3, &KEY_16);
}

#[test]
fn test_aes128_ccm_ack_ok() {
  round_trip(b"OK|3", EnvelopeMethod::Ack, 4, &KEY_16);
}

#[test]
fn test_aes128_ccm_ack_cmd() {
  round_trip(b"CMD|reboot", EnvelopeMethod::Ack, 5, &KEY_16);
}

#[test]
fn test_empty_inner_frame() {
  for method in ALL_METHODS {
    round_trip(b"", method, 0, &KEY_16);
  }
}

#[test]
fn test_block_boundaries() {
  // Lengths around the 16-byte keystream/CBC-MAC block size.
  let data = [0x5au8; 49];
  for len in [1, 15, 16, 17, 31, 32, 33, 48, 49] {
    round_trip(&data[..len], EnvelopeMethod::Push, len as u32, &KEY_16);
  }
}

#[test]
fn test_max_inner_frame() {
  let inner: Vec<u8> = (0..MAX_INNER_FRAME_SIZE).map(|i| i as u8).collect();
  let auth_hash = derive_auth_hash(TOKEN);
  let device_hash = derive_device_hash(SERIAL);

  let mut envelope = vec![0u8; MAX_ENVELOPE_SIZE];
  let n = seal(&inner, EnvelopeMethod::Push, u32::MAX, &auth_hash, &device_hash, &KEY_16, &mut envelope)
    .unwrap();
  assert_eq!(n, MAX_ENVELOPE_SIZE);

  let mut out = vec![0u8; MAX_INNER_FRAME_SIZE];
  let (header, _, len) = open(&envelope, &KEY_16, &mut out).unwrap();
  assert_eq!(header.counter, u32::MAX);
  assert_eq!(len, MAX_INNER_FRAME_SIZE);
  assert_eq!(out, inner);
}

#[test]
fn test_derived_key_round_trip() {
  let key = derive_encryption_key(TOKEN, SERIAL);
  round_trip(b"sensor-01|[temp:=32]", EnvelopeMethod::Push, 42, key.as_bytes());
}

#[test]
fn test_hex_key_round_trip() {
  let key = EncryptionKey::from_hex("fe09da81bc4400ee12ab56cd78ef9012").unwrap();
  assert_eq!(key.as_bytes(), &KEY_16);
  round_trip(b"sensor-01|[temp:=32]", EnvelopeMethod::Push, 42, key.as_bytes());
}

#[test]
fn test_counter_changes_ciphertext() {
  let auth_hash = derive_auth_hash(TOKEN);
  let device_hash = derive_device_hash(SERIAL);
  let inner = b"sensor-01|[temp:=32]";

  let mut a = [0u8; 49];
  let mut b = [0u8; 49];
  seal(inner, EnvelopeMethod::Push, 1, &auth_hash, &device_hash, &KEY_16, &mut a).unwrap();
  seal(inner, EnvelopeMethod::Push, 2, &auth_hash, &device_hash, &KEY_16, &mut b).unwrap();
  assert_ne!(a[21..], b[21..]);
}

#[test]
fn test_seal_is_deterministic() {
  let auth_hash = derive_auth_hash(TOKEN);
  let device_hash = derive_device_hash(SERIAL);
  let inner = b"sensor-01|[temp:=32]";

  let mut a = [0u8; 49];
  let mut b = [0u8; 49];
  seal(inner, EnvelopeMethod::Push, 7, &auth_hash, &device_hash, &KEY_16, &mut a).unwrap();
  seal(inner, EnvelopeMethod::Push, 7, &auth_hash, &device_hash, &KEY_16, &mut b).unwrap();
  assert_eq!(a, b);
}

#[test]
fn test_envelope_overhead_ccm() {
  assert_eq!(envelope_len(0), 29);
  assert_eq!(envelope_len(20), 49);
  assert_eq!(envelope_len(MAX_INNER_FRAME_SIZE), MAX_ENVELOPE_SIZE);
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(64))]

  #[test]
  fn prop_seal_open_round_trip(
    inner in proptest::collection::vec(any::<u8>(), 0..600),
    method_id in 0u8..4,
    counter in any::<u32>(),
    key in any::<[u8; 16]>(),
    auth_hash in any::<[u8; 8]>(),
    device_hash in any::<[u8; 8]>(),
  ) {
    let method = EnvelopeMethod::from_id(method_id).unwrap();
    let mut envelope = vec![0u8; envelope_len(inner.len())];
    let n = seal(&inner, method, counter, &auth_hash, &device_hash, &key, &mut envelope).unwrap();
    prop_assert_eq!(n, envelope.len());

    let mut out = vec![0u8; inner.len()];
    let (header, opened_method, len) = open(&envelope, &key, &mut out).unwrap();
    prop_assert_eq!(header.counter, counter);
    prop_assert_eq!(header.auth_hash, auth_hash);
    prop_assert_eq!(header.device_hash, device_hash);
    prop_assert_eq!(opened_method, method);
    prop_assert_eq!(&out[..len], &inner[..]);
  }
}
