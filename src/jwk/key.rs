// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use core::convert::TryFrom;
use std::collections::BTreeMap;
use std::sync::RwLock;

use serde::de::Error as _;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde_json::Value;
use url::Url;

use crate::crypto::digest::Digest;
use crate::error::Error;
use crate::error::Result;
use crate::jwk::EcCurve;
use crate::jwk::EcxCurve;
use crate::jwk::EdCurve;
use crate::jwk::JwkOperation;
use crate::jwk::JwkParams;
use crate::jwk::JwkParamsEc;
use crate::jwk::JwkParamsOct;
use crate::jwk::JwkParamsOkp;
use crate::jwk::JwkParamsRsa;
use crate::jwk::JwkType;
use crate::jwk::JwkUse;
use crate::utils::decode_b64;
use crate::utils::encode_b64;

/// The common, optional-except-`kty` attributes shared by every key variant,
/// plus the variant-specific parameters and a verbatim extras map for any
/// JSON key this crate does not model. See spec.md §3 "Key".
#[derive(Clone, Debug)]
struct JwkInner {
  kty: JwkType,
  use_: Option<JwkUse>,
  key_ops: Option<Vec<JwkOperation>>,
  alg: Option<String>,
  kid: Option<String>,
  x5u: Option<Url>,
  x5c: Option<Vec<Vec<u8>>>,
  x5t: Option<Vec<u8>>,
  x5t_s256: Option<Vec<u8>>,
  params: JwkParams,
  extras: BTreeMap<String, Value>,
}

/// A polymorphic JOSE key (JWK), RFC 7517. Shared attributes are accessed
/// through getter/setter pairs; variant-specific parameters through
/// [`Jwk::params`] / the `try_*_params` family.
///
/// Field mutation is serialized behind an internal lock (spec.md §5): the
/// structure of a `Jwk` is fixed at construction, but individual field
/// values may be updated concurrently.
pub struct Jwk {
  inner: RwLock<JwkInner>,
}

impl Clone for Jwk {
  fn clone(&self) -> Self {
    Self {
      inner: RwLock::new(self.inner.read().expect("Jwk lock poisoned").clone()),
    }
  }
}

impl Jwk {
  /// Construct a `Jwk` directly from variant-specific parameters, with no
  /// other attributes set.
  pub fn from_params(params: impl Into<JwkParams>) -> Self {
    let params: JwkParams = params.into();
    Self {
      inner: RwLock::new(JwkInner {
        kty: params.kty(),
        use_: None,
        key_ops: None,
        alg: None,
        kid: None,
        x5u: None,
        x5c: None,
        x5t: None,
        x5t_s256: None,
        params,
        extras: BTreeMap::new(),
      }),
    }
  }

  fn read(&self) -> std::sync::RwLockReadGuard<'_, JwkInner> {
    self.inner.read().expect("Jwk lock poisoned")
  }

  fn write(&self) -> std::sync::RwLockWriteGuard<'_, JwkInner> {
    self.inner.write().expect("Jwk lock poisoned")
  }

  pub fn kty(&self) -> JwkType {
    self.read().kty
  }

  pub fn use_(&self) -> Option<JwkUse> {
    self.read().use_.clone()
  }

  pub fn set_use(&mut self, value: impl Into<JwkUse>) {
    self.write().use_ = Some(value.into());
  }

  pub fn key_ops(&self) -> Option<Vec<JwkOperation>> {
    self.read().key_ops.clone()
  }

  pub fn set_key_ops(&mut self, value: impl IntoIterator<Item = JwkOperation>) {
    self.write().key_ops = Some(value.into_iter().collect());
  }

  pub fn alg(&self) -> Option<String> {
    self.read().alg.clone()
  }

  pub fn set_alg(&mut self, value: impl Into<String>) {
    self.write().alg = Some(value.into());
  }

  pub fn kid(&self) -> Option<String> {
    self.read().kid.clone()
  }

  pub fn set_kid(&mut self, value: impl Into<String>) {
    self.write().kid = Some(value.into());
  }

  pub fn x5u(&self) -> Option<Url> {
    self.read().x5u.clone()
  }

  pub fn set_x5u(&mut self, value: Url) {
    self.write().x5u = Some(value);
  }

  pub fn x5c(&self) -> Option<Vec<Vec<u8>>> {
    self.read().x5c.clone()
  }

  pub fn set_x5c(&mut self, value: impl IntoIterator<Item = Vec<u8>>) {
    self.write().x5c = Some(value.into_iter().collect());
  }

  pub fn x5t(&self) -> Option<Vec<u8>> {
    self.read().x5t.clone()
  }

  pub fn set_x5t(&mut self, value: impl Into<Vec<u8>>) {
    self.write().x5t = Some(value.into());
  }

  pub fn x5t_s256(&self) -> Option<Vec<u8>> {
    self.read().x5t_s256.clone()
  }

  pub fn set_x5t_s256(&mut self, value: impl Into<Vec<u8>>) {
    self.write().x5t_s256 = Some(value.into());
  }

  /// A user-defined JSON member not modeled by this type, preserved
  /// verbatim across parse/emit.
  pub fn get_extra(&self, key: &str) -> Option<Value> {
    self.read().extras.get(key).cloned()
  }

  pub fn set_extra(&mut self, key: impl Into<String>, value: Value) {
    self.write().extras.insert(key.into(), value);
  }

  pub fn params(&self) -> Option<JwkParams> {
    Some(self.read().params.clone())
  }

  pub fn try_rsa_params(&self) -> Result<JwkParamsRsa> {
    match &self.read().params {
      JwkParams::Rsa(params) => Ok(params.clone()),
      _ => Err(Error::KeyTypeMismatch),
    }
  }

  pub fn try_ec_params(&self) -> Result<JwkParamsEc> {
    match &self.read().params {
      JwkParams::Ec(params) => Ok(params.clone()),
      _ => Err(Error::KeyTypeMismatch),
    }
  }

  pub fn try_okp_params(&self) -> Result<JwkParamsOkp> {
    match &self.read().params {
      JwkParams::Okp(params) => Ok(params.clone()),
      _ => Err(Error::KeyTypeMismatch),
    }
  }

  pub fn try_oct_params(&self) -> Result<JwkParamsOct> {
    match &self.read().params {
      JwkParams::Oct(params) => Ok(params.clone()),
      _ => Err(Error::KeyTypeMismatch),
    }
  }

  pub fn try_ec_curve(&self) -> Result<EcCurve> {
    let params = self.try_ec_params()?;
    EcCurve::try_from(params.crv.as_str())
  }

  pub fn try_ed_curve(&self) -> Result<EdCurve> {
    let params = self.try_okp_params()?;
    EdCurve::try_from(params.crv.as_str())
  }

  pub fn try_ecx_curve(&self) -> Result<EcxCurve> {
    let params = self.try_okp_params()?;
    EcxCurve::try_from(params.crv.as_str())
  }

  /// True if this key carries no private components (spec.md §4.3
  /// "PublicKeyOf").
  pub fn is_public(&self) -> bool {
    self.read().params.is_public()
  }

  pub fn is_private(&self) -> bool {
    !self.is_public()
  }

  /// Projects this key onto the fields safe to publish: private components
  /// (`d`, CRT factors, `k`) are dropped, metadata is retained.
  pub fn to_public(&self) -> Jwk {
    let inner = self.read();
    let params = inner
      .params
      .to_public()
      .unwrap_or_else(|| inner.params.clone());

    Jwk {
      inner: RwLock::new(JwkInner {
        kty: inner.kty,
        use_: inner.use_.clone(),
        key_ops: inner.key_ops.clone(),
        alg: inner.alg.clone(),
        kid: inner.kid.clone(),
        x5u: inner.x5u.clone(),
        x5c: inner.x5c.clone(),
        x5t: inner.x5t.clone(),
        x5t_s256: inner.x5t_s256.clone(),
        params,
        extras: inner.extras.clone(),
      }),
    }
  }

  /// RFC 7638 thumbprint over the minimal canonical subset of fields,
  /// hashed with `D`. Returns the raw digest bytes.
  pub fn thumbprint<D: Digest>(&self) -> Result<Vec<u8>> {
    let json: Vec<u8> = self.thumbprint_json()?;
    Ok(D::digest(&json))
  }

  /// As [`Jwk::thumbprint`], base64url-encoded without padding.
  pub fn thumbprint_b64<D: Digest>(&self) -> Result<String> {
    Ok(encode_b64(self.thumbprint::<D>()?))
  }

  fn thumbprint_json(&self) -> Result<Vec<u8>> {
    let inner = self.read();
    let mut map: BTreeMap<&'static str, &str> = BTreeMap::new();

    match &inner.params {
      JwkParams::Rsa(params) => {
        map.insert("e", &params.e);
        map.insert("kty", "RSA");
        map.insert("n", &params.n);
      }
      JwkParams::Ec(params) => {
        map.insert("crv", &params.crv);
        map.insert("kty", "EC");
        map.insert("x", &params.x);
        map.insert("y", &params.y);
      }
      JwkParams::Okp(params) => {
        map.insert("crv", &params.crv);
        map.insert("kty", "OKP");
        map.insert("x", &params.x);
      }
      JwkParams::Oct(params) => {
        map.insert("k", &params.k);
        map.insert("kty", "oct");
      }
    }

    serde_json::to_vec(&map).map_err(Error::from)
  }
}

impl PartialEq for Jwk {
  fn eq(&self, other: &Self) -> bool {
    let a = self.read();
    let b = other.read();
    a.kty == b.kty
      && a.use_ == b.use_
      && a.key_ops == b.key_ops
      && a.alg == b.alg
      && a.kid == b.kid
      && a.x5u == b.x5u
      && a.x5c == b.x5c
      && a.x5t == b.x5t
      && a.x5t_s256 == b.x5t_s256
      && a.params == b.params
      && a.extras == b.extras
  }
}

impl Eq for Jwk {}

impl std::fmt::Debug for Jwk {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Jwk").field("kty", &self.kty()).finish()
  }
}

const RSA_KEYS: &[&str] = &["n", "e", "d", "p", "q", "dp", "dq", "qi", "oth"];
const EC_KEYS: &[&str] = &["crv", "x", "y", "d"];
const OKP_KEYS: &[&str] = &["crv", "x", "d"];
const OCT_KEYS: &[&str] = &["k"];

impl Serialize for Jwk {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let inner = self.read();
    let mut map: BTreeMap<String, Value> = inner.extras.clone();

    map.insert("kty".to_string(), Value::String(inner.kty.name().to_string()));

    if let Some(use_) = &inner.use_ {
      map.insert("use".to_string(), Value::String(use_.as_str().to_string()));
    }
    if let Some(key_ops) = &inner.key_ops {
      map.insert(
        "key_ops".to_string(),
        Value::Array(key_ops.iter().map(|op| Value::String(op.name().to_string())).collect()),
      );
    }
    if let Some(alg) = &inner.alg {
      map.insert("alg".to_string(), Value::String(alg.clone()));
    }
    if let Some(kid) = &inner.kid {
      map.insert("kid".to_string(), Value::String(kid.clone()));
    }
    if let Some(x5u) = &inner.x5u {
      map.insert("x5u".to_string(), Value::String(x5u.to_string()));
    }
    if let Some(x5c) = &inner.x5c {
      map.insert(
        "x5c".to_string(),
        Value::Array(
          x5c
            .iter()
            .map(|cert| Value::String(base64::encode(cert)))
            .collect(),
        ),
      );
    }
    if let Some(x5t) = &inner.x5t {
      map.insert("x5t".to_string(), Value::String(encode_b64(x5t)));
    }
    if let Some(x5t_s256) = &inner.x5t_s256 {
      map.insert("x5t#S256".to_string(), Value::String(encode_b64(x5t_s256)));
    }

    let params_value = match &inner.params {
      JwkParams::Rsa(params) => serde_json::to_value(params),
      JwkParams::Ec(params) => serde_json::to_value(params),
      JwkParams::Okp(params) => serde_json::to_value(params),
      JwkParams::Oct(params) => serde_json::to_value(params),
    }
    .map_err(serde::ser::Error::custom)?;

    if let Value::Object(obj) = params_value {
      for (key, value) in obj {
        if !value.is_null() {
          map.insert(key, value);
        }
      }
    }

    map.serialize(serializer)
  }
}

impl<'de> Deserialize<'de> for Jwk {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let mut map: BTreeMap<String, Value> = BTreeMap::deserialize(deserializer)?;

    let kty_value = map.remove("kty").ok_or_else(|| D::Error::missing_field("kty"))?;
    let kty_str = kty_value.as_str().ok_or_else(|| D::Error::custom("`kty` must be a string"))?;
    let kty = JwkType::try_from(kty_str).map_err(D::Error::custom)?;

    let use_ = match map.remove("use") {
      Some(value) => Some(serde_json::from_value(value).map_err(D::Error::custom)?),
      None => None,
    };
    let key_ops = match map.remove("key_ops") {
      Some(value) => Some(serde_json::from_value(value).map_err(D::Error::custom)?),
      None => None,
    };
    let alg = match map.remove("alg") {
      Some(Value::String(s)) => Some(s),
      Some(_) => return Err(D::Error::custom("`alg` must be a string")),
      None => None,
    };
    let kid = match map.remove("kid") {
      Some(Value::String(s)) => Some(s),
      Some(_) => return Err(D::Error::custom("`kid` must be a string")),
      None => None,
    };
    let x5u = match map.remove("x5u") {
      Some(Value::String(s)) => Some(Url::parse(&s).map_err(D::Error::custom)?),
      Some(_) => return Err(D::Error::custom("`x5u` must be a string")),
      None => None,
    };
    let x5c = match map.remove("x5c") {
      Some(Value::Array(values)) => {
        let mut certs = Vec::with_capacity(values.len());
        for value in values {
          let s = value.as_str().ok_or_else(|| D::Error::custom("`x5c` entries must be strings"))?;
          certs.push(base64::decode(s).map_err(D::Error::custom)?);
        }
        Some(certs)
      }
      Some(_) => return Err(D::Error::custom("`x5c` must be an array")),
      None => None,
    };
    let x5t = match map.remove("x5t") {
      Some(Value::String(s)) => Some(decode_b64(s.as_bytes()).map_err(D::Error::custom)?),
      Some(_) => return Err(D::Error::custom("`x5t` must be a string")),
      None => None,
    };
    let x5t_s256 = match map.remove("x5t#S256") {
      Some(Value::String(s)) => Some(decode_b64(s.as_bytes()).map_err(D::Error::custom)?),
      Some(_) => return Err(D::Error::custom("`x5t#S256` must be a string")),
      None => None,
    };

    let params = match kty {
      JwkType::Rsa => {
        let value = Value::Object(take_keys(&mut map, RSA_KEYS));
        JwkParams::Rsa(serde_json::from_value(value).map_err(D::Error::custom)?)
      }
      JwkType::Ec => {
        let value = Value::Object(take_keys(&mut map, EC_KEYS));
        JwkParams::Ec(serde_json::from_value(value).map_err(D::Error::custom)?)
      }
      JwkType::Okp => {
        let value = Value::Object(take_keys(&mut map, OKP_KEYS));
        JwkParams::Okp(serde_json::from_value(value).map_err(D::Error::custom)?)
      }
      JwkType::Oct => {
        let value = Value::Object(take_keys(&mut map, OCT_KEYS));
        JwkParams::Oct(serde_json::from_value(value).map_err(D::Error::custom)?)
      }
    };

    Ok(Jwk {
      inner: RwLock::new(JwkInner {
        kty,
        use_,
        key_ops,
        alg,
        kid,
        x5u,
        x5c,
        x5t,
        x5t_s256,
        params,
        extras: map,
      }),
    })
  }
}

fn take_keys(map: &mut BTreeMap<String, Value>, keys: &[&str]) -> serde_json::Map<String, Value> {
  let mut out = serde_json::Map::new();
  for key in keys {
    if let Some(value) = map.remove(*key) {
      out.insert((*key).to_string(), value);
    }
  }
  out
}

impl From<JwkParamsRsa> for JwkParams {
  fn from(params: JwkParamsRsa) -> Self {
    Self::Rsa(params)
  }
}

impl From<JwkParamsEc> for JwkParams {
  fn from(params: JwkParamsEc) -> Self {
    Self::Ec(params)
  }
}

impl From<JwkParamsOkp> for JwkParams {
  fn from(params: JwkParamsOkp) -> Self {
    Self::Okp(params)
  }
}

impl From<JwkParamsOct> for JwkParams {
  fn from(params: JwkParamsOct) -> Self {
    Self::Oct(params)
  }
}
