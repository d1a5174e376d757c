// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! The single-step Concatenation Key Derivation Function, NIST SP 800-56A
//! §5.8.1, used by `ECDH-ES` (direct and `+A*KW`), per spec.md §4.5.

use sha2::Digest as _;
use sha2::Sha256;

use crate::error::Error;
use crate::error::Result;

fn fixed_info(algorithm_id: &[u8], apu: &[u8], apv: &[u8], key_data_len_bits: u32) -> Vec<u8> {
  let mut info = Vec::new();

  info.extend_from_slice(&(algorithm_id.len() as u32).to_be_bytes());
  info.extend_from_slice(algorithm_id);

  info.extend_from_slice(&(apu.len() as u32).to_be_bytes());
  info.extend_from_slice(apu);

  info.extend_from_slice(&(apv.len() as u32).to_be_bytes());
  info.extend_from_slice(apv);

  // SuppPubInfo: the desired key-data length, in bits.
  info.extend_from_slice(&key_data_len_bits.to_be_bytes());

  // SuppPrivInfo is empty for JOSE's use of ConcatKDF.
  info
}

/// Derive `key_data_len_bits / 8` bytes from the shared secret `z`. The hash
/// is always SHA-256 for JOSE (spec.md §4.5 "ConcatKDF").
pub fn derive(z: &[u8], algorithm_id: &[u8], apu: &[u8], apv: &[u8], key_data_len_bits: u32) -> Result<Vec<u8>> {
  if key_data_len_bits == 0 {
    return Err(Error::InvalidParameter("ConcatKDF requested zero-length output"));
  }

  let other_info = fixed_info(algorithm_id, apu, apv, key_data_len_bits);
  let key_data_len = (key_data_len_bits as usize + 7) / 8;

  let mut output = Vec::with_capacity(key_data_len);
  let mut counter: u32 = 1;

  while output.len() < key_data_len {
    let mut hasher = Sha256::new();
    hasher.update(counter.to_be_bytes());
    hasher.update(z);
    hasher.update(&other_info);
    output.extend_from_slice(&hasher.finalize());
    counter = counter.checked_add(1).ok_or("ConcatKDF counter overflow")?;
  }

  output.truncate(key_data_len);
  Ok(output)
}
