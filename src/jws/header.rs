// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;
use serde::Serialize;
use url::Url;

use crate::jwk::Jwk;
use crate::jws::JwsAlgorithm;
use crate::utils::Empty;

/// A JWS header (RFC 7515 §4), generic over a caller-defined set of custom
/// parameters `T` (spec.md §6 "pluggable decode registry", realized here as
/// a type parameter rather than a runtime registry — see SPEC_FULL.md §4.6).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JwsHeader<T = Empty> {
  alg: JwsAlgorithm,
  #[serde(skip_serializing_if = "Option::is_none")]
  jku: Option<Url>,
  #[serde(skip_serializing_if = "Option::is_none")]
  jwk: Option<Jwk>,
  #[serde(skip_serializing_if = "Option::is_none")]
  kid: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  x5u: Option<Url>,
  #[serde(skip_serializing_if = "Option::is_none")]
  x5c: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  x5t: Option<String>,
  #[serde(rename = "x5t#S256", skip_serializing_if = "Option::is_none")]
  x5t_s256: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  typ: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  cty: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  crit: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  b64: Option<bool>,
  #[serde(flatten)]
  custom: T,
}

impl<T: Default> JwsHeader<T> {
  pub fn new(alg: JwsAlgorithm) -> Self {
    Self {
      alg,
      jku: None,
      jwk: None,
      kid: None,
      x5u: None,
      x5c: None,
      x5t: None,
      x5t_s256: None,
      typ: None,
      cty: None,
      crit: None,
      b64: None,
      custom: T::default(),
    }
  }
}

macro_rules! getset_opt {
  ($field:ident, $get:ident, $set:ident, $ty:ty) => {
    pub fn $get(&self) -> Option<&$ty> {
      self.$field.as_ref()
    }

    pub fn $set(&mut self, value: impl Into<$ty>) {
      self.$field = Some(value.into());
    }
  };
}

impl<T> JwsHeader<T> {
  pub fn alg(&self) -> JwsAlgorithm {
    self.alg
  }

  pub fn set_alg(&mut self, alg: JwsAlgorithm) {
    self.alg = alg;
  }

  getset_opt!(jku, jku, set_jku, Url);
  getset_opt!(kid, kid, set_kid, String);
  getset_opt!(x5u, x5u, set_x5u, Url);
  getset_opt!(typ, typ, set_typ, String);
  getset_opt!(cty, cty, set_cty, String);

  pub fn jwk(&self) -> Option<&Jwk> {
    self.jwk.as_ref()
  }

  pub fn set_jwk(&mut self, value: Jwk) {
    self.jwk = Some(value);
  }

  pub fn x5c(&self) -> Option<&[String]> {
    self.x5c.as_deref()
  }

  pub fn set_x5c(&mut self, value: impl IntoIterator<Item = String>) {
    self.x5c = Some(value.into_iter().collect());
  }

  pub fn x5t(&self) -> Option<&str> {
    self.x5t.as_deref()
  }

  pub fn set_x5t(&mut self, value: impl Into<String>) {
    self.x5t = Some(value.into());
  }

  pub fn x5t_s256(&self) -> Option<&str> {
    self.x5t_s256.as_deref()
  }

  pub fn set_x5t_s256(&mut self, value: impl Into<String>) {
    self.x5t_s256 = Some(value.into());
  }

  pub fn crit(&self) -> Option<&[String]> {
    self.crit.as_deref()
  }

  pub fn set_crit(&mut self, value: impl IntoIterator<Item = impl Into<String>>) {
    self.crit = Some(value.into_iter().map(Into::into).collect());
  }

  /// Whether the payload is base64url-encoded, RFC 7797. Absent means
  /// "true" (the RFC 7515 default).
  pub fn b64(&self) -> Option<bool> {
    self.b64
  }

  pub fn set_b64(&mut self, value: bool) {
    self.b64 = Some(value);
  }

  /// The effective `b64` value, defaulting to `true` when unset.
  pub fn is_b64_encoded(&self) -> bool {
    self.b64.unwrap_or(true)
  }

  pub fn custom(&self) -> &T {
    &self.custom
  }

  pub fn custom_mut(&mut self) -> &mut T {
    &mut self.custom
  }
}
