// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use rand::rngs::OsRng;
use serde::Serialize;
use serde_json::Value;

use crate::crypto::ec;
use crate::crypto::ed25519;
use crate::crypto::hmac;
use crate::crypto::rsa;
use crate::error::Error;
use crate::error::Result;
use crate::jwk::Jwk;
use crate::jws::JwsAlgorithm;
use crate::jws::JwsFormat;
use crate::jws::JwsHeader;
use crate::utils::decode_b64;
use crate::utils::encode_b64;
use crate::utils::to_json_vec;
use crate::utils::Empty;

struct Recipient<'a, T> {
  key: &'a Jwk,
  protected: Option<JwsHeader<T>>,
  unprotected: Option<JwsHeader<T>>,
}

/// Builds a JWS over a payload for one or more recipients, per spec.md §4.4
/// "Sign". A `Compact` encoding supports exactly one recipient; `General`
/// and `Flatten` additionally allow an unprotected header per recipient.
pub struct Encoder<'a, T = Empty> {
  payload: Vec<u8>,
  format: JwsFormat,
  detached: bool,
  recipients: Vec<Recipient<'a, T>>,
}

impl<'a, T: Clone + Serialize> Encoder<'a, T> {
  pub fn new(payload: impl Into<Vec<u8>>) -> Self {
    Self {
      payload: payload.into(),
      format: JwsFormat::Compact,
      detached: false,
      recipients: Vec::new(),
    }
  }

  pub fn format(mut self, format: JwsFormat) -> Self {
    self.format = format;
    self
  }

  /// Omit the payload from the compact/flattened encoding, per RFC 7515
  /// Appendix F. The caller is responsible for re-supplying the payload at
  /// verification time.
  pub fn detached(mut self, value: bool) -> Self {
    self.detached = value;
    self
  }

  pub fn recipient(mut self, key: &'a Jwk, protected: JwsHeader<T>) -> Self {
    self.recipients.push(Recipient {
      key,
      protected: Some(protected),
      unprotected: None,
    });
    self
  }

  pub fn recipient_with_unprotected(
    mut self,
    key: &'a Jwk,
    protected: JwsHeader<T>,
    unprotected: JwsHeader<T>,
  ) -> Self {
    self.recipients.push(Recipient {
      key,
      protected: Some(protected),
      unprotected: Some(unprotected),
    });
    self
  }

  pub fn encode(self) -> Result<String> {
    if self.recipients.len() != 1 {
      return Err(Error::InvalidParameter(
        "compact encoding requires exactly one recipient",
      ));
    }
    let recipient = &self.recipients[0];
    if recipient.unprotected.is_some() {
      return Err(Error::InvalidParameter(
        "compact encoding has no unprotected header",
      ));
    }
    let protected = recipient
      .protected
      .as_ref()
      .ok_or(Error::InvalidParameter("missing protected header"))?;
    let protected = merge_kid(protected, recipient.key);
    let protected = &protected;

    let protected_b64 = encode_b64(to_json_vec(protected)?);
    let payload_b64 = if protected.is_b64_encoded() {
      encode_b64(&self.payload)
    } else {
      check_no_dots(&self.payload)?;
      String::from_utf8(self.payload.clone()).map_err(|_| Error::InvalidParameter("non-UTF8 unencoded payload"))?
    };

    let signing_input = format!("{}.{}", protected_b64, payload_b64);
    let signature = sign_with(protected.alg(), recipient.key, signing_input.as_bytes())?;
    let signature_b64 = encode_b64(signature);

    let payload_part = if self.detached { "" } else { payload_b64.as_str() };
    Ok(format!("{}.{}.{}", protected_b64, payload_part, signature_b64))
  }

  pub fn encode_json(self) -> Result<Value> {
    if self.recipients.is_empty() {
      return Err(Error::InvalidParameter("at least one recipient is required"));
    }
    if self.format == JwsFormat::Flatten && self.recipients.len() != 1 {
      return Err(Error::InvalidParameter(
        "flattened encoding requires exactly one recipient",
      ));
    }

    let mut signatures = Vec::with_capacity(self.recipients.len());
    let mut default_payload_b64: Option<String> = None;

    for recipient in &self.recipients {
      let protected = recipient.protected.as_ref().map(|header| merge_kid(header, recipient.key));

      check_no_duplicate_headers(protected.as_ref(), recipient.unprotected.as_ref())?;

      let protected_b64 = match &protected {
        Some(header) => Some(encode_b64(to_json_vec(header)?)),
        None => None,
      };

      let b64_mode = protected.as_ref().map(|header| header.is_b64_encoded()).unwrap_or(true);

      let payload_b64 = if b64_mode {
        encode_b64(&self.payload)
      } else {
        check_no_dots(&self.payload)?;
        String::from_utf8(self.payload.clone()).map_err(|_| Error::InvalidParameter("non-UTF8 unencoded payload"))?
      };

      if let Some(existing) = &default_payload_b64 {
        if existing != &payload_b64 {
          return Err(Error::InvalidParameter(
            "recipients disagree on payload encoding (b64)",
          ));
        }
      } else {
        default_payload_b64 = Some(payload_b64.clone());
      }

      let alg = header_alg(recipient)?;
      let signing_input = format!("{}.{}", protected_b64.clone().unwrap_or_default(), payload_b64);
      let signature = sign_with(alg, recipient.key, signing_input.as_bytes())?;

      let mut entry = serde_json::Map::new();
      if let Some(protected_b64) = protected_b64 {
        entry.insert("protected".to_string(), Value::String(protected_b64));
      }
      if let Some(unprotected) = &recipient.unprotected {
        entry.insert("header".to_string(), serde_json::to_value(unprotected)?);
      }
      entry.insert("signature".to_string(), Value::String(encode_b64(signature)));
      signatures.push(Value::Object(entry));
    }

    let payload_b64 = default_payload_b64.unwrap_or_default();
    let mut top = serde_json::Map::new();
    if !self.detached {
      top.insert("payload".to_string(), Value::String(payload_b64));
    }

    match self.format {
      JwsFormat::General => {
        top.insert("signatures".to_string(), Value::Array(signatures));
      }
      JwsFormat::Flatten => {
        if let Value::Object(entry) = signatures.into_iter().next().expect("checked non-empty") {
          top.extend(entry);
        }
      }
      JwsFormat::Compact => return Err(Error::InvalidParameter("use `encode` for compact JWS")),
    }

    Ok(Value::Object(top))
  }
}

/// Effective protected header for `key`, per spec.md §4.4 "Sign" step 1:
/// `alg` is always the caller's (set at header construction); `kid` is
/// merged in from the key only when the key has one and the caller didn't
/// already set one explicitly.
fn merge_kid<T: Clone>(header: &JwsHeader<T>, key: &Jwk) -> JwsHeader<T> {
  let mut header = header.clone();
  if header.kid().is_none() {
    if let Some(kid) = key.kid() {
      header.set_kid(kid);
    }
  }
  header
}

/// Rejects a protected/unprotected header pair that share any member name,
/// per spec.md §4.4 "Sign" step 3 and §7's `IntegrityViolation` taxonomy
/// entry.
fn check_no_duplicate_headers<T: Serialize>(
  protected: Option<&JwsHeader<T>>,
  unprotected: Option<&JwsHeader<T>>,
) -> Result<()> {
  let (protected, unprotected) = match (protected, unprotected) {
    (Some(protected), Some(unprotected)) => (protected, unprotected),
    _ => return Ok(()),
  };

  let protected = serde_json::to_value(protected)?;
  let unprotected = serde_json::to_value(unprotected)?;

  let protected = protected.as_object().expect("JwsHeader serializes to an object");
  let unprotected = unprotected.as_object().expect("JwsHeader serializes to an object");

  if unprotected.keys().any(|key| protected.contains_key(key)) {
    return Err(Error::IntegrityViolation);
  }

  Ok(())
}

fn header_alg<T>(recipient: &Recipient<'_, T>) -> Result<JwsAlgorithm> {
  recipient
    .protected
    .as_ref()
    .map(|header| header.alg())
    .or_else(|| recipient.unprotected.as_ref().map(|header| header.alg()))
    .ok_or(Error::InvalidParameter("recipient has no header"))
}

fn check_no_dots(payload: &[u8]) -> Result<()> {
  if payload.contains(&b'.') {
    Err(Error::InvalidContentChar('.'))
  } else {
    Ok(())
  }
}

/// Produce the raw JWS signature over `signing_input` for `alg` using key
/// material drawn from `key`. Shared with [`super::decoder`] so signing and
/// verification agree on exactly which bits a given `alg` hashes with.
pub(crate) fn sign_with(alg: JwsAlgorithm, key: &Jwk, signing_input: &[u8]) -> Result<Vec<u8>> {
  match alg {
    JwsAlgorithm::HS256 => hmac::sign(256, &oct_bytes(key)?, signing_input),
    JwsAlgorithm::HS384 => hmac::sign(384, &oct_bytes(key)?, signing_input),
    JwsAlgorithm::HS512 => hmac::sign(512, &oct_bytes(key)?, signing_input),
    JwsAlgorithm::RS256 => rsa::pkcs1v15_sign(256, &key.to_rsa_private()?, signing_input),
    JwsAlgorithm::RS384 => rsa::pkcs1v15_sign(384, &key.to_rsa_private()?, signing_input),
    JwsAlgorithm::RS512 => rsa::pkcs1v15_sign(512, &key.to_rsa_private()?, signing_input),
    JwsAlgorithm::PS256 => rsa::pss_sign(256, &key.to_rsa_private()?, signing_input, &mut OsRng),
    JwsAlgorithm::PS384 => rsa::pss_sign(384, &key.to_rsa_private()?, signing_input, &mut OsRng),
    JwsAlgorithm::PS512 => rsa::pss_sign(512, &key.to_rsa_private()?, signing_input, &mut OsRng),
    JwsAlgorithm::ES256 | JwsAlgorithm::ES384 | JwsAlgorithm::ES512 => {
      let curve = key.try_ec_curve()?;
      ec::sign(curve, &key.to_ec_private_scalar()?, signing_input)
    }
    #[cfg(feature = "es256k")]
    JwsAlgorithm::ES256K => {
      let curve = key.try_ec_curve()?;
      ec::sign(curve, &key.to_ec_private_scalar()?, signing_input)
    }
    JwsAlgorithm::EdDSA => ed25519::sign(&key.to_ed25519_secret()?, signing_input),
    JwsAlgorithm::NONE => Ok(Vec::new()),
  }
}

pub(crate) fn verify_with(alg: JwsAlgorithm, key: &Jwk, signing_input: &[u8], signature: &[u8]) -> Result<()> {
  match alg {
    JwsAlgorithm::HS256 => hmac::verify(256, &oct_bytes(key)?, signing_input, signature),
    JwsAlgorithm::HS384 => hmac::verify(384, &oct_bytes(key)?, signing_input, signature),
    JwsAlgorithm::HS512 => hmac::verify(512, &oct_bytes(key)?, signing_input, signature),
    JwsAlgorithm::RS256 => rsa::pkcs1v15_verify(256, &key.to_rsa_public()?, signing_input, signature),
    JwsAlgorithm::RS384 => rsa::pkcs1v15_verify(384, &key.to_rsa_public()?, signing_input, signature),
    JwsAlgorithm::RS512 => rsa::pkcs1v15_verify(512, &key.to_rsa_public()?, signing_input, signature),
    JwsAlgorithm::PS256 => rsa::pss_verify(256, &key.to_rsa_public()?, signing_input, signature),
    JwsAlgorithm::PS384 => rsa::pss_verify(384, &key.to_rsa_public()?, signing_input, signature),
    JwsAlgorithm::PS512 => rsa::pss_verify(512, &key.to_rsa_public()?, signing_input, signature),
    JwsAlgorithm::ES256 | JwsAlgorithm::ES384 | JwsAlgorithm::ES512 => {
      let curve = key.try_ec_curve()?;
      ec::verify(curve, &key.to_ec_public_sec1()?, signing_input, signature)
    }
    #[cfg(feature = "es256k")]
    JwsAlgorithm::ES256K => {
      let curve = key.try_ec_curve()?;
      ec::verify(curve, &key.to_ec_public_sec1()?, signing_input, signature)
    }
    JwsAlgorithm::EdDSA => ed25519::verify(&key.to_ed25519_public()?, signing_input, signature),
    JwsAlgorithm::NONE => {
      if signature.is_empty() {
        Ok(())
      } else {
        Err(Error::SignatureFailure)
      }
    }
  }
}

fn oct_bytes(key: &Jwk) -> Result<Vec<u8>> {
  decode_b64(key.try_oct_params()?.k)
}
