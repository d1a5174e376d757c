// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! AES-CBC + HMAC authenticated content encryption, RFC 7518 §5.2
//! (`A128CBC-HS256`, `A192CBC-HS384`, `A256CBC-HS512`).

use aes::Aes128;
use aes::Aes192;
use aes::Aes256;
use block_modes::block_padding::Pkcs7;
use block_modes::BlockMode;
use block_modes::Cbc;
use subtle::ConstantTimeEq;

use crate::crypto::hmac as hmac_primitive;
use crate::error::Error;
use crate::error::Result;

/// `(enc_key_len, mac_key_len, tag_len)` for a CBC-HMAC encryption scheme,
/// keyed by total CEK length in bytes, per RFC 7518 §5.2.2.1.
fn split(bits: usize) -> Result<(usize, usize)> {
  match bits {
    256 => Ok((16, 16)),
    384 => Ok((24, 24)),
    512 => Ok((32, 32)),
    _ => Err(Error::UnsupportedAlgorithm(format!("A{}CBC-HS{}", bits / 2, bits))),
  }
}

fn al(aad: &[u8]) -> [u8; 8] {
  ((aad.len() as u64) * 8).to_be_bytes()
}

fn mac_input(aad: &[u8], iv: &[u8], ciphertext: &[u8]) -> Vec<u8> {
  let mut input = Vec::with_capacity(aad.len() + iv.len() + ciphertext.len() + 8);
  input.extend_from_slice(aad);
  input.extend_from_slice(iv);
  input.extend_from_slice(ciphertext);
  input.extend_from_slice(&al(aad));
  input
}

/// The MAC hash is always one size class above the split point: `A*CBC-HS256`
/// uses HMAC-SHA256 truncated to 16 bytes, `HS384`→24, `HS512`→32.
fn hmac_truncated(total_bits: usize, mac_key: &[u8], input: &[u8], tag_len: usize) -> Result<Vec<u8>> {
  let full = hmac_primitive::sign(total_bits, mac_key, input)?;
  Ok(full[..tag_len].to_vec())
}

macro_rules! cbc_encrypt {
  ($cipher:ty, $enc_key:expr, $iv:expr, $plaintext:expr) => {{
    let cipher = Cbc::<$cipher, Pkcs7>::new_from_slices($enc_key, $iv).map_err(|_| "invalid CBC key/iv")?;
    cipher.encrypt_vec($plaintext)
  }};
}

macro_rules! cbc_decrypt {
  ($cipher:ty, $enc_key:expr, $iv:expr, $ciphertext:expr) => {{
    let cipher = Cbc::<$cipher, Pkcs7>::new_from_slices($enc_key, $iv).map_err(|_| "invalid CBC key/iv")?;
    cipher.decrypt_vec($ciphertext).map_err(|_| Error::DecryptionFailure)?
  }};
}

/// Encrypt `plaintext` under `cek` (`mac_key || enc_key`), returning
/// `(ciphertext, tag)`.
pub fn encrypt(total_bits: usize, cek: &[u8], iv: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
  let (key_len, tag_len) = split(total_bits)?;
  if cek.len() != key_len * 2 {
    return Err(Error::InvalidParameter("content encryption key has the wrong length"));
  }
  let (mac_key, enc_key) = cek.split_at(key_len);

  let ciphertext = match total_bits {
    256 => cbc_encrypt!(Aes128, enc_key, iv, plaintext),
    384 => cbc_encrypt!(Aes192, enc_key, iv, plaintext),
    512 => cbc_encrypt!(Aes256, enc_key, iv, plaintext),
    _ => unreachable!(),
  };

  let input = mac_input(aad, iv, &ciphertext);
  let tag = hmac_truncated(total_bits, mac_key, &input, tag_len)?;

  Ok((ciphertext, tag))
}

pub fn decrypt(total_bits: usize, cek: &[u8], iv: &[u8], aad: &[u8], ciphertext: &[u8], tag: &[u8]) -> Result<Vec<u8>> {
  let (key_len, tag_len) = split(total_bits)?;
  if cek.len() != key_len * 2 {
    return Err(Error::InvalidParameter("content encryption key has the wrong length"));
  }
  let (mac_key, enc_key) = cek.split_at(key_len);

  let input = mac_input(aad, iv, ciphertext);
  let expected_tag = hmac_truncated(total_bits, mac_key, &input, tag_len)?;

  if !bool::from(expected_tag.as_slice().ct_eq(tag)) {
    return Err(Error::DecryptionFailure);
  }

  let plaintext = match total_bits {
    256 => cbc_decrypt!(Aes128, enc_key, iv, ciphertext),
    384 => cbc_decrypt!(Aes192, enc_key, iv, ciphertext),
    512 => cbc_decrypt!(Aes256, enc_key, iv, ciphertext),
    _ => unreachable!(),
  };

  Ok(plaintext)
}

/// CEK length in bytes for a given CBC-HMAC scheme.
pub const fn cek_len(total_bits: usize) -> usize {
  match total_bits {
    256 => 32,
    384 => 48,
    512 => 64,
    _ => 0,
  }
}

/// IV length in bytes (always one AES block).
pub const fn iv_len() -> usize {
  16
}
