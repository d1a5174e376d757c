// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;
use serde::Serialize;
use url::Url;

use crate::error::Result;
use crate::jwe::JweAlgorithm;
use crate::jwe::JweCompression;
use crate::jwe::JweEncryption;
use crate::jwk::Jwk;
use crate::utils::decode_b64;
use crate::utils::encode_b64;
use crate::utils::Empty;

/// A JWE header (RFC 7516 §4), generic over a caller-defined set of custom
/// parameters `T`. Carries both the RFC 7515-shaped common parameters and
/// the per-algorithm parameters of RFC 7518 §4.6-§4.8 (`epk`/`apu`/`apv`
/// for ECDH-ES, `p2s`/`p2c` for PBES2, `iv`/`tag` for the AES-GCM key-wrap
/// algorithms).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JweHeader<T = Empty> {
  #[serde(skip_serializing_if = "Option::is_none")]
  alg: Option<JweAlgorithm>,
  #[serde(skip_serializing_if = "Option::is_none")]
  enc: Option<JweEncryption>,
  #[serde(skip_serializing_if = "Option::is_none")]
  zip: Option<JweCompression>,
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
  epk: Option<Jwk>,
  #[serde(skip_serializing_if = "Option::is_none")]
  apu: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  apv: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  p2s: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  p2c: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  iv: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  tag: Option<String>,
  #[serde(flatten)]
  custom: T,
}

impl<T: Default> JweHeader<T> {
  pub fn new(enc: JweEncryption) -> Self {
    Self {
      alg: None,
      enc: Some(enc),
      zip: None,
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
      epk: None,
      apu: None,
      apv: None,
      p2s: None,
      p2c: None,
      iv: None,
      tag: None,
      custom: T::default(),
    }
  }

  /// A header with neither `alg` nor `enc` set, used for the per-recipient
  /// unprotected header in the JSON serializations (RFC 7516 §7.2), where
  /// `enc` lives in the shared protected header instead.
  pub(crate) fn blank() -> Self {
    Self {
      alg: None,
      enc: None,
      zip: None,
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
      epk: None,
      apu: None,
      apv: None,
      p2s: None,
      p2c: None,
      iv: None,
      tag: None,
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

impl<T> JweHeader<T> {
  pub fn alg(&self) -> Option<JweAlgorithm> {
    self.alg
  }

  pub fn set_alg(&mut self, alg: JweAlgorithm) {
    self.alg = Some(alg);
  }

  pub fn enc(&self) -> Option<JweEncryption> {
    self.enc
  }

  pub fn set_enc(&mut self, enc: JweEncryption) {
    self.enc = Some(enc);
  }

  pub fn zip(&self) -> Option<&JweCompression> {
    self.zip.as_ref()
  }

  pub fn set_zip(&mut self, zip: JweCompression) {
    self.zip = Some(zip);
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

  pub fn crit(&self) -> Option<&[String]> {
    self.crit.as_deref()
  }

  pub fn set_crit(&mut self, value: impl IntoIterator<Item = impl Into<String>>) {
    self.crit = Some(value.into_iter().map(Into::into).collect());
  }

  pub fn epk(&self) -> Option<&Jwk> {
    self.epk.as_ref()
  }

  pub fn set_epk(&mut self, value: Jwk) {
    self.epk = Some(value);
  }

  pub fn apu(&self) -> Result<Option<Vec<u8>>> {
    self.apu.as_deref().map(decode_b64).transpose()
  }

  pub fn set_apu(&mut self, value: impl AsRef<[u8]>) {
    self.apu = Some(encode_b64(value));
  }

  pub fn apv(&self) -> Result<Option<Vec<u8>>> {
    self.apv.as_deref().map(decode_b64).transpose()
  }

  pub fn set_apv(&mut self, value: impl AsRef<[u8]>) {
    self.apv = Some(encode_b64(value));
  }

  pub fn p2s(&self) -> Result<Option<Vec<u8>>> {
    self.p2s.as_deref().map(decode_b64).transpose()
  }

  pub fn set_p2s(&mut self, value: impl AsRef<[u8]>) {
    self.p2s = Some(encode_b64(value));
  }

  pub fn p2c(&self) -> Option<u32> {
    self.p2c
  }

  pub fn set_p2c(&mut self, value: u32) {
    self.p2c = Some(value);
  }

  pub fn iv(&self) -> Result<Option<Vec<u8>>> {
    self.iv.as_deref().map(decode_b64).transpose()
  }

  pub fn set_iv(&mut self, value: impl AsRef<[u8]>) {
    self.iv = Some(encode_b64(value));
  }

  pub fn tag(&self) -> Result<Option<Vec<u8>>> {
    self.tag.as_deref().map(decode_b64).transpose()
  }

  pub fn set_tag(&mut self, value: impl AsRef<[u8]>) {
    self.tag = Some(encode_b64(value));
  }

  pub fn custom(&self) -> &T {
    &self.custom
  }

  pub fn custom_mut(&mut self) -> &mut T {
    &mut self.custom
  }
}
