// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use core::convert::TryFrom;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::error::Result;
use crate::jwk::JwkType;

/// A JWS `alg` value, RFC 7518 §3.1 and RFC 8037 §3.1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum JwsAlgorithm {
  HS256,
  HS384,
  HS512,
  RS256,
  RS384,
  RS512,
  PS256,
  PS384,
  PS512,
  ES256,
  ES384,
  ES512,
  #[cfg(feature = "es256k")]
  ES256K,
  EdDSA,
  #[serde(rename = "none")]
  NONE,
}

impl JwsAlgorithm {
  #[cfg(not(feature = "es256k"))]
  pub const ALL: &'static [Self] = &[
    Self::HS256,
    Self::HS384,
    Self::HS512,
    Self::RS256,
    Self::RS384,
    Self::RS512,
    Self::PS256,
    Self::PS384,
    Self::PS512,
    Self::ES256,
    Self::ES384,
    Self::ES512,
    Self::EdDSA,
    Self::NONE,
  ];

  #[cfg(feature = "es256k")]
  pub const ALL: &'static [Self] = &[
    Self::HS256,
    Self::HS384,
    Self::HS512,
    Self::RS256,
    Self::RS384,
    Self::RS512,
    Self::PS256,
    Self::PS384,
    Self::PS512,
    Self::ES256,
    Self::ES384,
    Self::ES512,
    Self::ES256K,
    Self::EdDSA,
    Self::NONE,
  ];

  pub const fn name(self) -> &'static str {
    match self {
      Self::HS256 => "HS256",
      Self::HS384 => "HS384",
      Self::HS512 => "HS512",
      Self::RS256 => "RS256",
      Self::RS384 => "RS384",
      Self::RS512 => "RS512",
      Self::PS256 => "PS256",
      Self::PS384 => "PS384",
      Self::PS512 => "PS512",
      Self::ES256 => "ES256",
      Self::ES384 => "ES384",
      Self::ES512 => "ES512",
      #[cfg(feature = "es256k")]
      Self::ES256K => "ES256K",
      Self::EdDSA => "EdDSA",
      Self::NONE => "none",
    }
  }

  /// The `kty` (and, for EC, curve) this algorithm is compatible with, per
  /// spec.md §4.1's algorithm-to-key-type compatibility table.
  pub fn key_type(self) -> Option<JwkType> {
    match self {
      Self::HS256 | Self::HS384 | Self::HS512 => Some(JwkType::Oct),
      Self::RS256 | Self::RS384 | Self::RS512 | Self::PS256 | Self::PS384 | Self::PS512 => Some(JwkType::Rsa),
      Self::ES256 | Self::ES384 | Self::ES512 => Some(JwkType::Ec),
      #[cfg(feature = "es256k")]
      Self::ES256K => Some(JwkType::Ec),
      Self::EdDSA => Some(JwkType::Okp),
      Self::NONE => None,
    }
  }
}

impl TryFrom<&str> for JwsAlgorithm {
  type Error = Error;

  fn try_from(string: &str) -> Result<Self> {
    Self::ALL
      .iter()
      .copied()
      .find(|alg| alg.name() == string)
      .ok_or_else(|| Error::UnsupportedAlgorithm(string.to_string()))
  }
}

impl core::fmt::Display for JwsAlgorithm {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.name())
  }
}
