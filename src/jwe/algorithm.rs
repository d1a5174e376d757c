// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use core::convert::TryFrom;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::error::Result;
use crate::jwk::JwkType;

/// A JWE `alg` value: the key management algorithm, RFC 7518 §4.1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum JweAlgorithm {
  #[serde(rename = "RSA1_5")]
  RSA1_5,
  #[serde(rename = "RSA-OAEP")]
  RSA_OAEP,
  #[serde(rename = "RSA-OAEP-256")]
  RSA_OAEP_256,
  #[serde(rename = "RSA-OAEP-384")]
  RSA_OAEP_384,
  #[serde(rename = "RSA-OAEP-512")]
  RSA_OAEP_512,
  A128KW,
  A192KW,
  A256KW,
  #[serde(rename = "dir")]
  DIR,
  #[serde(rename = "ECDH-ES")]
  ECDH_ES,
  #[serde(rename = "ECDH-ES+A128KW")]
  ECDH_ES_A128KW,
  #[serde(rename = "ECDH-ES+A192KW")]
  ECDH_ES_A192KW,
  #[serde(rename = "ECDH-ES+A256KW")]
  ECDH_ES_A256KW,
  A128GCMKW,
  A192GCMKW,
  A256GCMKW,
  #[serde(rename = "PBES2-HS256+A128KW")]
  PBES2_HS256_A128KW,
  #[serde(rename = "PBES2-HS384+A192KW")]
  PBES2_HS384_A192KW,
  #[serde(rename = "PBES2-HS512+A256KW")]
  PBES2_HS512_A256KW,
  #[serde(rename = "ECDH-ES+C20PKW")]
  ECDH_ES_C20PKW,
  #[serde(rename = "ECDH-ES+XC20PKW")]
  ECDH_ES_XC20PKW,
}

impl JweAlgorithm {
  pub const ALL: &'static [Self] = &[
    Self::RSA1_5,
    Self::RSA_OAEP,
    Self::RSA_OAEP_256,
    Self::RSA_OAEP_384,
    Self::RSA_OAEP_512,
    Self::A128KW,
    Self::A192KW,
    Self::A256KW,
    Self::DIR,
    Self::ECDH_ES,
    Self::ECDH_ES_A128KW,
    Self::ECDH_ES_A192KW,
    Self::ECDH_ES_A256KW,
    Self::A128GCMKW,
    Self::A192GCMKW,
    Self::A256GCMKW,
    Self::PBES2_HS256_A128KW,
    Self::PBES2_HS384_A192KW,
    Self::PBES2_HS512_A256KW,
    Self::ECDH_ES_C20PKW,
    Self::ECDH_ES_XC20PKW,
  ];

  pub const fn name(self) -> &'static str {
    match self {
      Self::RSA1_5 => "RSA1_5",
      Self::RSA_OAEP => "RSA-OAEP",
      Self::RSA_OAEP_256 => "RSA-OAEP-256",
      Self::RSA_OAEP_384 => "RSA-OAEP-384",
      Self::RSA_OAEP_512 => "RSA-OAEP-512",
      Self::A128KW => "A128KW",
      Self::A192KW => "A192KW",
      Self::A256KW => "A256KW",
      Self::DIR => "dir",
      Self::ECDH_ES => "ECDH-ES",
      Self::ECDH_ES_A128KW => "ECDH-ES+A128KW",
      Self::ECDH_ES_A192KW => "ECDH-ES+A192KW",
      Self::ECDH_ES_A256KW => "ECDH-ES+A256KW",
      Self::A128GCMKW => "A128GCMKW",
      Self::A192GCMKW => "A192GCMKW",
      Self::A256GCMKW => "A256GCMKW",
      Self::PBES2_HS256_A128KW => "PBES2-HS256+A128KW",
      Self::PBES2_HS384_A192KW => "PBES2-HS384+A192KW",
      Self::PBES2_HS512_A256KW => "PBES2-HS512+A256KW",
      Self::ECDH_ES_C20PKW => "ECDH-ES+C20PKW",
      Self::ECDH_ES_XC20PKW => "ECDH-ES+XC20PKW",
    }
  }

  /// The `kty` a recipient key must carry for this algorithm.
  pub fn key_type(self) -> JwkType {
    match self {
      Self::RSA1_5 | Self::RSA_OAEP | Self::RSA_OAEP_256 | Self::RSA_OAEP_384 | Self::RSA_OAEP_512 => JwkType::Rsa,
      Self::ECDH_ES
      | Self::ECDH_ES_A128KW
      | Self::ECDH_ES_A192KW
      | Self::ECDH_ES_A256KW
      | Self::ECDH_ES_C20PKW
      | Self::ECDH_ES_XC20PKW => JwkType::Ec,
      _ => JwkType::Oct,
    }
  }

  /// True for the three algorithms whose key management step is itself an
  /// AEAD, and therefore contributes an `iv`/`tag` pair to the JWE header
  /// (RFC 7518 §4.7).
  pub const fn is_gcm_kw(self) -> bool {
    matches!(self, Self::A128GCMKW | Self::A192GCMKW | Self::A256GCMKW)
  }

  pub const fn is_ecdh(self) -> bool {
    matches!(
      self,
      Self::ECDH_ES | Self::ECDH_ES_A128KW | Self::ECDH_ES_A192KW | Self::ECDH_ES_A256KW
    )
  }

  pub const fn is_pbes2(self) -> bool {
    matches!(
      self,
      Self::PBES2_HS256_A128KW | Self::PBES2_HS384_A192KW | Self::PBES2_HS512_A256KW
    )
  }
}

impl TryFrom<&str> for JweAlgorithm {
  type Error = Error;

  fn try_from(string: &str) -> Result<Self> {
    Self::ALL
      .iter()
      .copied()
      .find(|alg| alg.name() == string)
      .ok_or_else(|| Error::UnsupportedAlgorithm(string.to_string()))
  }
}

impl core::fmt::Display for JweAlgorithm {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.name())
  }
}
