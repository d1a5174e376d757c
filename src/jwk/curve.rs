// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use core::convert::TryFrom;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::error::Result;

/// The NIST curves usable by an EC [`crate::jwk::Jwk`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EcCurve {
  #[serde(rename = "P-256")]
  P256,
  #[serde(rename = "P-384")]
  P384,
  #[serde(rename = "P-521")]
  P521,
  #[cfg(feature = "es256k")]
  #[serde(rename = "secp256k1")]
  Secp256k1,
}

impl EcCurve {
  #[cfg(not(feature = "es256k"))]
  pub const ALL: &'static [Self] = &[Self::P256, Self::P384, Self::P521];
  #[cfg(feature = "es256k")]
  pub const ALL: &'static [Self] = &[Self::P256, Self::P384, Self::P521, Self::Secp256k1];

  pub const fn name(self) -> &'static str {
    match self {
      Self::P256 => "P-256",
      Self::P384 => "P-384",
      Self::P521 => "P-521",
      #[cfg(feature = "es256k")]
      Self::Secp256k1 => "secp256k1",
    }
  }

  /// Fixed coordinate width in bytes, per spec.md §3 invariant 1
  /// (`ceil(bits / 8)`).
  pub const fn coordinate_len(self) -> usize {
    match self {
      Self::P256 => 32,
      Self::P384 => 48,
      Self::P521 => 66,
      #[cfg(feature = "es256k")]
      Self::Secp256k1 => 32,
    }
  }
}

impl TryFrom<&str> for EcCurve {
  type Error = Error;

  fn try_from(string: &str) -> Result<Self> {
    match string {
      "P-256" => Ok(Self::P256),
      "P-384" => Ok(Self::P384),
      "P-521" => Ok(Self::P521),
      #[cfg(feature = "es256k")]
      "secp256k1" => Ok(Self::Secp256k1),
      _ => Err(Error::UnsupportedAlgorithm(string.to_string())),
    }
  }
}

/// The Edwards curves usable by an OKP [`crate::jwk::Jwk`] for signing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdCurve {
  Ed25519,
  Ed448,
}

impl EdCurve {
  pub const ALL: &'static [Self] = &[Self::Ed25519, Self::Ed448];

  pub const fn name(self) -> &'static str {
    match self {
      Self::Ed25519 => "Ed25519",
      Self::Ed448 => "Ed448",
    }
  }
}

impl TryFrom<&str> for EdCurve {
  type Error = Error;

  fn try_from(string: &str) -> Result<Self> {
    match string {
      "Ed25519" => Ok(Self::Ed25519),
      "Ed448" => Ok(Self::Ed448),
      _ => Err(Error::UnsupportedAlgorithm(string.to_string())),
    }
  }
}

/// The Montgomery curves usable by an OKP [`crate::jwk::Jwk`] for ECDH.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EcxCurve {
  X25519,
  X448,
}

impl EcxCurve {
  pub const ALL: &'static [Self] = &[Self::X25519, Self::X448];

  pub const fn name(self) -> &'static str {
    match self {
      Self::X25519 => "X25519",
      Self::X448 => "X448",
    }
  }
}

impl TryFrom<&str> for EcxCurve {
  type Error = Error;

  fn try_from(string: &str) -> Result<Self> {
    match string {
      "X25519" => Ok(Self::X25519),
      "X448" => Ok(Self::X448),
      _ => Err(Error::UnsupportedAlgorithm(string.to_string())),
    }
  }
}
