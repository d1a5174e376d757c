// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! AES Key Wrap, RFC 3394, used by `A128KW`/`A192KW`/`A256KW` and as the
//! wrapping step of `ECDH-ES+A*KW` and `PBES2-HS*+A*KW`.

use aes_kw::KekAes128;
use aes_kw::KekAes192;
use aes_kw::KekAes256;

use crate::error::Error;
use crate::error::Result;

pub fn wrap(bits: usize, kek: &[u8], cek: &[u8]) -> Result<Vec<u8>> {
  match bits {
    128 => KekAes128::new(to_array(kek)?.into())
      .wrap_vec(cek)
      .map_err(|_| "AES-KW wrap".into()),
    192 => KekAes192::new(to_array24(kek)?.into())
      .wrap_vec(cek)
      .map_err(|_| "AES-KW wrap".into()),
    256 => KekAes256::new(to_array32(kek)?.into())
      .wrap_vec(cek)
      .map_err(|_| "AES-KW wrap".into()),
    _ => Err(Error::UnsupportedAlgorithm(format!("A{}KW", bits))),
  }
}

pub fn unwrap(bits: usize, kek: &[u8], wrapped: &[u8]) -> Result<Vec<u8>> {
  match bits {
    128 => KekAes128::new(to_array(kek)?.into())
      .unwrap_vec(wrapped)
      .map_err(|_| Error::DecryptionFailure),
    192 => KekAes192::new(to_array24(kek)?.into())
      .unwrap_vec(wrapped)
      .map_err(|_| Error::DecryptionFailure),
    256 => KekAes256::new(to_array32(kek)?.into())
      .unwrap_vec(wrapped)
      .map_err(|_| Error::DecryptionFailure),
    _ => Err(Error::UnsupportedAlgorithm(format!("A{}KW", bits))),
  }
}

fn to_array(key: &[u8]) -> Result<[u8; 16]> {
  key
    .try_into()
    .map_err(|_| Error::InvalidParameter("key-encryption key has the wrong length"))
}

fn to_array24(key: &[u8]) -> Result<[u8; 24]> {
  key
    .try_into()
    .map_err(|_| Error::InvalidParameter("key-encryption key has the wrong length"))
}

fn to_array32(key: &[u8]) -> Result<[u8; 32]> {
  key
    .try_into()
    .map_err(|_| Error::InvalidParameter("key-encryption key has the wrong length"))
}
