// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use miniz_oxide::deflate::compress_to_vec;
use miniz_oxide::inflate::decompress_to_vec;
use serde::Deserialize as _;

use crate::error::Error;
use crate::error::Result;

/// A JWE `zip` value, RFC 7516 §4.1.3. Only `DEF` (DEFLATE, RFC 1951) is
/// registered; anything else round-trips as an opaque label with
/// compression unimplemented.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum JweCompression {
  Deflate,
  Custom(String),
}

impl JweCompression {
  pub fn name(&self) -> &str {
    match self {
      Self::Deflate => "DEF",
      Self::Custom(value) => value.as_str(),
    }
  }

  pub fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
    match self {
      Self::Deflate => Ok(compress_to_vec(data, 6)),
      Self::Custom(name) => Err(Error::UnsupportedAlgorithm(name.clone())),
    }
  }

  pub fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
    match self {
      Self::Deflate => decompress_to_vec(data).map_err(|_| Error::DecryptionFailure),
      Self::Custom(name) => Err(Error::UnsupportedAlgorithm(name.clone())),
    }
  }
}

impl serde::Serialize for JweCompression {
  fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.name())
  }
}

impl<'de> serde::Deserialize<'de> for JweCompression {
  fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let value = String::deserialize(deserializer)?;
    Ok(match value.as_str() {
      "DEF" => Self::Deflate,
      _ => Self::Custom(value),
    })
  }
}
