// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use core::convert::TryFrom;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::error::Result;

/// The `kty` parameter, RFC 7517 §4.1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JwkType {
  #[serde(rename = "EC")]
  Ec,
  #[serde(rename = "RSA")]
  Rsa,
  #[serde(rename = "oct")]
  Oct,
  #[serde(rename = "OKP")]
  Okp,
}

impl JwkType {
  pub const ALL: &'static [Self] = &[Self::Ec, Self::Rsa, Self::Oct, Self::Okp];

  pub const fn name(self) -> &'static str {
    match self {
      Self::Ec => "EC",
      Self::Rsa => "RSA",
      Self::Oct => "oct",
      Self::Okp => "OKP",
    }
  }
}

impl TryFrom<&str> for JwkType {
  type Error = Error;

  fn try_from(string: &str) -> Result<Self> {
    match string {
      "EC" => Ok(Self::Ec),
      "RSA" => Ok(Self::Rsa),
      "oct" => Ok(Self::Oct),
      "OKP" => Ok(Self::Okp),
      _ => Err(Error::UnsupportedAlgorithm(string.to_string())),
    }
  }
}

/// The `use` parameter, RFC 7517 §4.2. Unknown values round-trip via
/// `Custom` rather than failing deserialization.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum JwkUse {
  Signature,
  Encryption,
  Custom(String),
}

impl JwkUse {
  pub fn as_str(&self) -> &str {
    match self {
      Self::Signature => "sig",
      Self::Encryption => "enc",
      Self::Custom(value) => value.as_str(),
    }
  }
}

impl Serialize for JwkUse {
  fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.as_str())
  }
}

impl<'de> Deserialize<'de> for JwkUse {
  fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let value: String = String::deserialize(deserializer)?;
    Ok(match value.as_str() {
      "sig" => Self::Signature,
      "enc" => Self::Encryption,
      _ => Self::Custom(value),
    })
  }
}

/// The `key_ops` parameter, RFC 7517 §4.3.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JwkOperation {
  #[serde(rename = "sign")]
  Sign,
  #[serde(rename = "verify")]
  Verify,
  #[serde(rename = "encrypt")]
  Encrypt,
  #[serde(rename = "decrypt")]
  Decrypt,
  #[serde(rename = "wrapKey")]
  WrapKey,
  #[serde(rename = "unwrapKey")]
  UnwrapKey,
  #[serde(rename = "deriveKey")]
  DeriveKey,
  #[serde(rename = "deriveBits")]
  DeriveBits,
}

impl JwkOperation {
  pub const fn name(self) -> &'static str {
    match self {
      Self::Sign => "sign",
      Self::Verify => "verify",
      Self::Encrypt => "encrypt",
      Self::Decrypt => "decrypt",
      Self::WrapKey => "wrapKey",
      Self::UnwrapKey => "unwrapKey",
      Self::DeriveKey => "deriveKey",
      Self::DeriveBits => "deriveBits",
    }
  }
}
