// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Small shared helpers: base64url codec, the `Secret` key-material adapter,
//! and raw Diffie-Hellman for the curves this crate supports.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::error::Result;
use crate::jwk::EcxCurve;
use crate::jwk::Jwk;

/// An empty set of custom claims/parameters, used as the default type
/// parameter for [`crate::jwt::JwtClaims`] and the JOSE headers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

/// Encode `data` as URL-safe base64 without padding.
pub fn encode_b64(data: impl AsRef<[u8]>) -> String {
  base64::encode_config(data, base64::URL_SAFE_NO_PAD)
}

/// Decode URL-safe base64, tolerating padding on the input.
pub fn decode_b64(data: impl AsRef<[u8]>) -> Result<Vec<u8>> {
  base64::decode_config(data, base64::URL_SAFE_NO_PAD)
    .or_else(|_| base64::decode_config(data, base64::URL_SAFE))
    .map_err(Error::from)
}

/// Re-encode an already-JSON-serializable value as canonical (lexicographic
/// key order) JSON bytes.
pub fn to_json_vec<T: Serialize>(value: &T) -> Result<Vec<u8>> {
  serde_json::to_vec(value).map_err(Error::from)
}

pub fn from_json_slice<T: DeserializeOwned>(slice: &[u8]) -> Result<T> {
  serde_json::from_slice(slice).map_err(Error::from)
}

/// Uniform view over key material usable as one side of an ECDH agreement
/// or as raw symmetric/asymmetric bytes, used by JWE recipients.
pub enum Secret<'a> {
  Jwk(&'a Jwk),
  Bytes(&'a [u8]),
}

impl<'a> Secret<'a> {
  pub fn to_x25519_public(&self) -> Result<x25519_dalek::PublicKey> {
    match self {
      Self::Jwk(jwk) => jwk.to_x25519_public(),
      Self::Bytes(bytes) => {
        let mut buf = [0u8; 32];
        if bytes.len() != 32 {
          return Err(Error::InvalidParameter("expected a 32-byte X25519 public key"));
        }
        buf.copy_from_slice(bytes);
        Ok(x25519_dalek::PublicKey::from(buf))
      }
    }
  }

  pub fn to_x25519_secret(&self) -> Result<x25519_dalek::StaticSecret> {
    match self {
      Self::Jwk(jwk) => jwk.to_x25519_secret(),
      Self::Bytes(bytes) => {
        let mut buf = [0u8; 32];
        if bytes.len() != 32 {
          return Err(Error::InvalidParameter("expected a 32-byte X25519 secret key"));
        }
        buf.copy_from_slice(bytes);
        Ok(x25519_dalek::StaticSecret::from(buf))
      }
    }
  }

  pub fn to_x448_public(&self) -> Result<crate::crypto::x448::X448PublicKey> {
    match self {
      Self::Jwk(jwk) => jwk.to_x448_public(),
      Self::Bytes(_) => Err(Error::UnsupportedAlgorithm("X448".into())),
    }
  }
}

/// Perform raw Diffie-Hellman between `public` (a [`Jwk`] or equivalent) and
/// `secret` (a private OKP [`Jwk`]) over the given curve. Returns the shared
/// secret `Z` as specified by RFC 7748.
pub fn diffie_hellman(curve: EcxCurve, public: &Jwk, secret: &Jwk) -> Result<Vec<u8>> {
  match curve {
    EcxCurve::X25519 => {
      let public_key: x25519_dalek::PublicKey = Secret::Jwk(public).to_x25519_public()?;
      let secret_key: x25519_dalek::StaticSecret = Secret::Jwk(secret).to_x25519_secret()?;
      Ok(secret_key.diffie_hellman(&public_key).as_bytes().to_vec())
    }
    EcxCurve::X448 => Err(Error::UnsupportedAlgorithm("X448".into())),
  }
}
