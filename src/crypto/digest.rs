// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Hash-algorithm marker types used by [`crate::jwk::Jwk::thumbprint`] and by
//! the JWS/JWE dispatch tables.

use sha2::Digest as _;

/// A hash algorithm usable for an RFC 7638 thumbprint.
pub trait Digest {
  /// Output length in bytes.
  const LEN: usize;

  fn digest(data: &[u8]) -> Vec<u8>;
}

pub struct SHA2_256;
pub struct SHA2_384;
pub struct SHA2_512;

impl Digest for SHA2_256 {
  const LEN: usize = 32;

  fn digest(data: &[u8]) -> Vec<u8> {
    sha2::Sha256::digest(data).to_vec()
  }
}

impl Digest for SHA2_384 {
  const LEN: usize = 48;

  fn digest(data: &[u8]) -> Vec<u8> {
    sha2::Sha384::digest(data).to_vec()
  }
}

impl Digest for SHA2_512 {
  const LEN: usize = 64;

  fn digest(data: &[u8]) -> Vec<u8> {
    sha2::Sha512::digest(data).to_vec()
  }
}
