// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! PBES2 key derivation, RFC 7518 §4.8 (`PBES2-HS256/384/512+A*KW`).

use pbkdf2::pbkdf2;

use hmac::Hmac;
use sha2::Sha256;
use sha2::Sha384;
use sha2::Sha512;

use crate::error::Error;
use crate::error::Result;

/// Build the PBKDF2 salt value: `alg || 0x00 || p2s`, RFC 7518 §4.8.1.1.
pub fn salt(algorithm_name: &str, p2s: &[u8]) -> Vec<u8> {
  let mut salt = Vec::with_capacity(algorithm_name.len() + 1 + p2s.len());
  salt.extend_from_slice(algorithm_name.as_bytes());
  salt.push(0x00);
  salt.extend_from_slice(p2s);
  salt
}

/// Derive a key-encryption key of `kek_len` bytes from `password` using
/// PBKDF2 with the hash implied by `hash_bits` (256/384/512), `salt`, and
/// `iterations` (the `p2c` parameter).
pub fn derive(hash_bits: usize, password: &[u8], salt: &[u8], iterations: u32, kek_len: usize) -> Result<Vec<u8>> {
  let mut output = vec![0u8; kek_len];

  match hash_bits {
    256 => pbkdf2::<Hmac<Sha256>>(password, salt, iterations, &mut output),
    384 => pbkdf2::<Hmac<Sha384>>(password, salt, iterations, &mut output),
    512 => pbkdf2::<Hmac<Sha512>>(password, salt, iterations, &mut output),
    _ => return Err(Error::UnsupportedAlgorithm(format!("PBES2-HS{}", hash_bits))),
  }

  Ok(output)
}
