// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Error;
use crate::error::Result;
use crate::jwk::Jwk;
use crate::jwk::JwkSet;
use crate::jws::encoder::verify_with;
use crate::jws::JwsAlgorithm;
use crate::jws::JwsFormat;
use crate::jws::JwsHeader;
use crate::jws::Token;
use crate::utils::decode_b64;
use crate::utils::from_json_slice;
use crate::utils::Empty;

enum KeySource<'a> {
  Single(&'a Jwk),
  Set(&'a JwkSet),
}

/// Verifies a JWS, per spec.md §4.4 "Verify". A decoder is configured with
/// a key (or a [`JwkSet`] to pick from by `kid`), an optional set of
/// acceptable algorithms (recommended whenever keys are shared across
/// algorithms, to rule out algorithm-confusion attacks), and the expected
/// format.
pub struct Decoder<'a, T = Empty> {
  keys: KeySource<'a>,
  format: JwsFormat,
  allowed_algs: Option<Vec<JwsAlgorithm>>,
  detached_payload: Option<&'a [u8]>,
  allow_none: bool,
  _marker: core::marker::PhantomData<T>,
}

impl<'a, T: DeserializeOwned> Decoder<'a, T> {
  pub fn new(key: &'a Jwk) -> Self {
    Self {
      keys: KeySource::Single(key),
      format: JwsFormat::Compact,
      allowed_algs: None,
      detached_payload: None,
      allow_none: false,
      _marker: core::marker::PhantomData,
    }
  }

  pub fn new_with_set(keys: &'a JwkSet) -> Self {
    Self {
      keys: KeySource::Set(keys),
      format: JwsFormat::Compact,
      allowed_algs: None,
      detached_payload: None,
      allow_none: false,
      _marker: core::marker::PhantomData,
    }
  }

  pub fn format(mut self, format: JwsFormat) -> Self {
    self.format = format;
    self
  }

  pub fn allow_algs(mut self, algs: impl IntoIterator<Item = JwsAlgorithm>) -> Self {
    self.allowed_algs = Some(algs.into_iter().collect());
    self
  }

  pub fn detached_payload(mut self, payload: &'a [u8]) -> Self {
    self.detached_payload = Some(payload);
    self
  }

  /// Opts into accepting an unsigned `alg: none` JWS (RFC 7515 §8.5). Off by
  /// default: per spec.md §4.4, `none` is accepted only when the caller
  /// explicitly opts in, so a token cannot downgrade itself into skipping
  /// verification.
  pub fn allow_none(mut self, allow: bool) -> Self {
    self.allow_none = allow;
    self
  }

  pub fn decode(&self, data: &[u8]) -> Result<Token<T>> {
    match self.format {
      JwsFormat::Compact => self.decode_compact(data),
      JwsFormat::General | JwsFormat::Flatten => self.decode_json(data),
    }
  }

  /// The candidate keys to attempt, per spec.md §4.4 "Key-set verification":
  /// with an explicit single key there is exactly one candidate; with a
  /// [`JwkSet`] and a `kid` on the header, only keys whose `kid` matches
  /// *and* whose own `alg` (if set) agrees with the header's `alg`; with no
  /// `kid`, every key in the set, tried in set order ("explicit algorithm"
  /// strategy — the header's `alg` is the algorithm attempted against each).
  fn candidate_keys(&self, header: &JwsHeader<T>) -> Result<Vec<&'a Jwk>> {
    match self.keys {
      KeySource::Single(key) => Ok(vec![key]),
      KeySource::Set(set) => {
        let candidates: Vec<&'a Jwk> = match header.kid() {
          Some(kid) => set
            .iter()
            .filter(|key| {
              key.kid().as_deref() == Some(kid.as_str())
                && key.alg().map_or(true, |alg| alg == header.alg().to_string())
            })
            .collect(),
          None => set.iter().collect(),
        };
        if candidates.is_empty() {
          Err(Error::KeyNotFound)
        } else {
          Ok(candidates)
        }
      }
    }
  }

  /// Try every candidate key against `verify` in set order (spec.md §5
  /// "first success wins"), aggregating per-key failures and surfacing only
  /// the final "no key verified" error.
  fn verify_with_candidates(
    &self,
    header: &JwsHeader<T>,
    mut verify: impl FnMut(&'a Jwk) -> Result<()>,
  ) -> Result<()> {
    let mut last_error = Error::KeyNotFound;
    for key in self.candidate_keys(header)? {
      match verify(key) {
        Ok(()) => return Ok(()),
        Err(err) => last_error = err,
      }
    }
    Err(last_error)
  }

  fn check_alg(&self, alg: JwsAlgorithm) -> Result<()> {
    if alg == JwsAlgorithm::NONE && !self.allow_none {
      return Err(Error::UnsupportedAlgorithm(alg.to_string()));
    }
    if let Some(allowed) = &self.allowed_algs {
      if !allowed.contains(&alg) {
        return Err(Error::UnsupportedAlgorithm(alg.to_string()));
      }
    }
    Ok(())
  }

  fn decode_compact(&self, data: &[u8]) -> Result<Token<T>> {
    let text = core::str::from_utf8(data).map_err(|_| Error::InvalidContent("JWS must be UTF-8"))?;
    let mut parts = text.split('.');
    let protected_b64 = parts.next().ok_or(Error::InvalidContent("missing protected header"))?;
    let payload_b64 = parts.next().ok_or(Error::InvalidContent("missing payload"))?;
    let signature_b64 = parts.next().ok_or(Error::InvalidContent("missing signature"))?;
    if parts.next().is_some() {
      return Err(Error::InvalidContent("too many segments"));
    }

    let protected_bytes = decode_b64(protected_b64)?;
    let protected: JwsHeader<T> = from_json_slice(&protected_bytes)?;
    self.check_alg(protected.alg())?;

    let payload_bytes = self.resolve_payload(payload_b64, protected.is_b64_encoded())?;
    let signing_input = format!("{}.{}", protected_b64, payload_b64);
    let signature = decode_b64(signature_b64)?;

    self.verify_with_candidates(&protected, |key| {
      verify_with(protected.alg(), key, signing_input.as_bytes(), &signature)
    })?;

    Ok(Token {
      protected: Some(protected),
      unprotected: None,
      claims: payload_bytes,
    })
  }

  fn resolve_payload(&self, payload_b64: &str, is_b64: bool) -> Result<Vec<u8>> {
    if payload_b64.is_empty() {
      return self
        .detached_payload
        .map(|payload| payload.to_vec())
        .ok_or(Error::InvalidContent("detached payload not supplied"));
    }
    if is_b64 {
      decode_b64(payload_b64)
    } else {
      Ok(payload_b64.as_bytes().to_vec())
    }
  }

  fn decode_json(&self, data: &[u8]) -> Result<Token<T>> {
    let value: Value = serde_json::from_slice(data)?;
    let obj = value.as_object().ok_or(Error::InvalidContent("JWS JSON must be an object"))?;

    let payload_b64 = obj.get("payload").and_then(Value::as_str).unwrap_or_default();

    let entries: Vec<&Value> = if let Some(Value::Array(signatures)) = obj.get("signatures") {
      signatures.iter().collect()
    } else {
      vec![&value]
    };

    let mut last_error = Error::InvalidContent("no signatures present");

    for entry in entries {
      let entry_obj = entry.as_object().ok_or(Error::InvalidContent("signature entry must be an object"))?;

      let protected: Option<JwsHeader<T>> = match entry_obj.get("protected").and_then(Value::as_str) {
        Some(protected_b64) => Some(from_json_slice(&decode_b64(protected_b64)?)?),
        None => None,
      };
      let unprotected: Option<JwsHeader<T>> = match entry_obj.get("header") {
        Some(header_value) => Some(serde_json::from_value(header_value.clone())?),
        None => None,
      };

      let alg = match (&protected, &unprotected) {
        (Some(header), _) => header.alg(),
        (None, Some(header)) => header.alg(),
        (None, None) => {
          last_error = Error::InvalidContent("signature entry has no header");
          continue;
        }
      };

      if self.check_alg(alg).is_err() {
        last_error = Error::UnsupportedAlgorithm(alg.to_string());
        continue;
      }

      let is_b64 = protected.as_ref().map(|h| h.is_b64_encoded()).unwrap_or(true);
      let protected_b64 = entry_obj.get("protected").and_then(Value::as_str).unwrap_or("");
      let signature_b64 = entry_obj
        .get("signature")
        .and_then(Value::as_str)
        .ok_or(Error::InvalidContent("missing signature"))?;

      let payload_bytes = match self.resolve_payload(payload_b64, is_b64) {
        Ok(bytes) => bytes,
        Err(err) => {
          last_error = err;
          continue;
        }
      };
      let signing_input = format!("{}.{}", protected_b64, payload_b64);
      let signature = decode_b64(signature_b64)?;

      let header_for_key = protected.as_ref().or(unprotected.as_ref()).expect("checked above");

      match self.verify_with_candidates(header_for_key, |key| {
        verify_with(alg, key, signing_input.as_bytes(), &signature)
      }) {
        Ok(()) => {
          return Ok(Token {
            protected,
            unprotected,
            claims: payload_bytes,
          });
        }
        Err(err) => last_error = err,
      }
    }

    Err(last_error)
  }
}
