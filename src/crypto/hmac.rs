// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! HMAC signing/verification for the `HS256`/`HS384`/`HS512` JWS algorithms.

use hmac::Hmac;
use hmac::Mac;
use hmac::NewMac;
use sha2::Sha256;
use sha2::Sha384;
use sha2::Sha512;
use subtle::ConstantTimeEq;

use crate::error::Error;
use crate::error::Result;

macro_rules! impl_hmac {
  ($name:ident, $hash:ty) => {
    pub fn $name(key: &[u8], message: &[u8]) -> Result<Vec<u8>> {
      let mut mac: Hmac<$hash> = Hmac::<$hash>::new_from_slice(key).map_err(|_| "HMAC key")?;
      mac.update(message);
      Ok(mac.finalize().into_bytes().to_vec())
    }
  };
}

impl_hmac!(hs256, Sha256);
impl_hmac!(hs384, Sha384);
impl_hmac!(hs512, Sha512);

/// Verify `signature` against `message` under `key`, comparing in constant
/// time.
pub fn verify(hash_bits: usize, key: &[u8], message: &[u8], signature: &[u8]) -> Result<()> {
  let expected: Vec<u8> = match hash_bits {
    256 => hs256(key, message)?,
    384 => hs384(key, message)?,
    512 => hs512(key, message)?,
    _ => return Err(Error::UnsupportedAlgorithm(format!("HS{}", hash_bits))),
  };

  if bool::from(expected.as_slice().ct_eq(signature)) {
    Ok(())
  } else {
    Err(Error::SignatureFailure)
  }
}

pub fn sign(hash_bits: usize, key: &[u8], message: &[u8]) -> Result<Vec<u8>> {
  match hash_bits {
    256 => hs256(key, message),
    384 => hs384(key, message),
    512 => hs512(key, message),
    _ => Err(Error::UnsupportedAlgorithm(format!("HS{}", hash_bits))),
  }
}
