// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use core::convert::TryFrom;

use serde::Deserialize;
use serde::Serialize;

use crate::crypto::aes_cbc_hmac;
use crate::crypto::aes_gcm;
use crate::error::Error;
use crate::error::Result;

/// A JWE `enc` value: the content encryption algorithm, RFC 7518 §5.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum JweEncryption {
  #[serde(rename = "A128CBC-HS256")]
  A128CBC_HS256,
  #[serde(rename = "A192CBC-HS384")]
  A192CBC_HS384,
  #[serde(rename = "A256CBC-HS512")]
  A256CBC_HS512,
  A128GCM,
  A192GCM,
  A256GCM,
  C20P,
  XC20P,
}

impl JweEncryption {
  pub const ALL: &'static [Self] = &[
    Self::A128CBC_HS256,
    Self::A192CBC_HS384,
    Self::A256CBC_HS512,
    Self::A128GCM,
    Self::A192GCM,
    Self::A256GCM,
    Self::C20P,
    Self::XC20P,
  ];

  pub const fn name(self) -> &'static str {
    match self {
      Self::A128CBC_HS256 => "A128CBC-HS256",
      Self::A192CBC_HS384 => "A192CBC-HS384",
      Self::A256CBC_HS512 => "A256CBC-HS512",
      Self::A128GCM => "A128GCM",
      Self::A192GCM => "A192GCM",
      Self::A256GCM => "A256GCM",
      Self::C20P => "C20P",
      Self::XC20P => "XC20P",
    }
  }

  /// Content encryption key length in bytes.
  pub const fn cek_len(self) -> usize {
    match self {
      Self::A128CBC_HS256 => aes_cbc_hmac::cek_len(256),
      Self::A192CBC_HS384 => aes_cbc_hmac::cek_len(384),
      Self::A256CBC_HS512 => aes_cbc_hmac::cek_len(512),
      Self::A128GCM => aes_gcm::cek_len(128),
      Self::A192GCM => aes_gcm::cek_len(192),
      Self::A256GCM => aes_gcm::cek_len(256),
      Self::C20P | Self::XC20P => 32,
    }
  }

  pub const fn iv_len(self) -> usize {
    match self {
      Self::A128CBC_HS256 | Self::A192CBC_HS384 | Self::A256CBC_HS512 => aes_cbc_hmac::iv_len(),
      Self::A128GCM | Self::A192GCM | Self::A256GCM => aes_gcm::iv_len(),
      Self::C20P => 12,
      Self::XC20P => 24,
    }
  }

  pub fn encrypt(self, cek: &[u8], iv: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
    match self {
      Self::A128CBC_HS256 => aes_cbc_hmac::encrypt(256, cek, iv, aad, plaintext),
      Self::A192CBC_HS384 => aes_cbc_hmac::encrypt(384, cek, iv, aad, plaintext),
      Self::A256CBC_HS512 => aes_cbc_hmac::encrypt(512, cek, iv, aad, plaintext),
      Self::A128GCM => aes_gcm::encrypt(128, cek, iv, aad, plaintext),
      Self::A192GCM => aes_gcm::encrypt(192, cek, iv, aad, plaintext),
      Self::A256GCM => aes_gcm::encrypt(256, cek, iv, aad, plaintext),
      Self::C20P | Self::XC20P => Err(Error::UnsupportedAlgorithm(self.name().to_string())),
    }
  }

  pub fn decrypt(self, cek: &[u8], iv: &[u8], aad: &[u8], ciphertext: &[u8], tag: &[u8]) -> Result<Vec<u8>> {
    match self {
      Self::A128CBC_HS256 => aes_cbc_hmac::decrypt(256, cek, iv, aad, ciphertext, tag),
      Self::A192CBC_HS384 => aes_cbc_hmac::decrypt(384, cek, iv, aad, ciphertext, tag),
      Self::A256CBC_HS512 => aes_cbc_hmac::decrypt(512, cek, iv, aad, ciphertext, tag),
      Self::A128GCM => aes_gcm::decrypt(128, cek, iv, aad, ciphertext, tag),
      Self::A192GCM => aes_gcm::decrypt(192, cek, iv, aad, ciphertext, tag),
      Self::A256GCM => aes_gcm::decrypt(256, cek, iv, aad, ciphertext, tag),
      Self::C20P | Self::XC20P => Err(Error::UnsupportedAlgorithm(self.name().to_string())),
    }
  }
}

impl TryFrom<&str> for JweEncryption {
  type Error = Error;

  fn try_from(string: &str) -> Result<Self> {
    Self::ALL
      .iter()
      .copied()
      .find(|enc| enc.name() == string)
      .ok_or_else(|| Error::UnsupportedAlgorithm(string.to_string()))
  }
}

impl core::fmt::Display for JweEncryption {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.name())
  }
}
