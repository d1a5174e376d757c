// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::de::Error as _;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde_json::Value;

use crate::config;
use crate::utils::Empty;

/// A JWT claims set (RFC 7519 §4), generic over a caller-defined set of
/// custom claims `T`, mirroring [`crate::jws::JwsHeader`]/
/// [`crate::jwe::JweHeader`]'s approach to the same problem (spec.md §6
/// "pluggable decode registry").
///
/// The seven registered claims get typed accessors; anything else lives in
/// `T` and is flattened alongside them on the wire.
#[derive(Clone, Debug, PartialEq)]
pub struct JwtClaims<T = Empty> {
  iss: Option<String>,
  sub: Option<String>,
  aud: Option<Vec<String>>,
  exp: Option<i64>,
  iat: Option<i64>,
  nbf: Option<i64>,
  jti: Option<String>,
  flatten_audience: Option<bool>,
  custom: T,
}

impl<T: Default> JwtClaims<T> {
  pub fn new() -> Self {
    Self {
      iss: None,
      sub: None,
      aud: None,
      exp: None,
      iat: None,
      nbf: None,
      jti: None,
      flatten_audience: None,
      custom: T::default(),
    }
  }
}

impl<T: Default> Default for JwtClaims<T> {
  fn default() -> Self {
    Self::new()
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

macro_rules! getset_copy {
  ($field:ident, $get:ident, $set:ident, $ty:ty) => {
    pub fn $get(&self) -> Option<$ty> {
      self.$field
    }

    pub fn $set(&mut self, value: $ty) {
      self.$field = Some(value);
    }
  };
}

impl<T> JwtClaims<T> {
  getset_opt!(iss, iss, set_iss, String);
  getset_opt!(sub, sub, set_sub, String);
  getset_opt!(jti, jti, set_jti, String);
  getset_copy!(exp, exp, set_exp, i64);
  getset_copy!(iat, iat, set_iat, i64);
  getset_copy!(nbf, nbf, set_nbf, i64);

  pub fn aud(&self) -> Option<&[String]> {
    self.aud.as_deref()
  }

  pub fn set_aud(&mut self, value: impl IntoIterator<Item = impl Into<String>>) {
    self.aud = Some(value.into_iter().map(Into::into).collect());
  }

  /// Per-token override of [`config::default_flatten_audience`]: whether a
  /// single-element `aud` serializes as a bare string instead of a
  /// one-element array. `None` defers to the process-wide default.
  pub fn flatten_audience(&self) -> Option<bool> {
    self.flatten_audience
  }

  pub fn set_flatten_audience(&mut self, value: bool) {
    self.flatten_audience = Some(value);
  }

  fn flatten_audience_effective(&self) -> bool {
    self.flatten_audience.unwrap_or_else(config::default_flatten_audience)
  }

  pub fn custom(&self) -> &T {
    &self.custom
  }

  pub fn custom_mut(&mut self) -> &mut T {
    &mut self.custom
  }
}

impl<T: Serialize> Serialize for JwtClaims<T> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map: BTreeMap<String, Value> = BTreeMap::new();

    if let Some(iss) = &self.iss {
      map.insert("iss".to_string(), Value::String(iss.clone()));
    }
    if let Some(sub) = &self.sub {
      map.insert("sub".to_string(), Value::String(sub.clone()));
    }
    if let Some(aud) = &self.aud {
      let value = if self.flatten_audience_effective() && aud.len() == 1 {
        Value::String(aud[0].clone())
      } else {
        Value::Array(aud.iter().cloned().map(Value::String).collect())
      };
      map.insert("aud".to_string(), value);
    }
    if let Some(exp) = self.exp {
      map.insert("exp".to_string(), Value::from(exp));
    }
    if let Some(iat) = self.iat {
      map.insert("iat".to_string(), Value::from(iat));
    }
    if let Some(nbf) = self.nbf {
      map.insert("nbf".to_string(), Value::from(nbf));
    }
    if let Some(jti) = &self.jti {
      map.insert("jti".to_string(), Value::String(jti.clone()));
    }

    let custom_value = serde_json::to_value(&self.custom).map_err(serde::ser::Error::custom)?;
    if let Value::Object(obj) = custom_value {
      for (key, value) in obj {
        if !value.is_null() {
          map.insert(key, value);
        }
      }
    }

    map.serialize(serializer)
  }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for JwtClaims<T> {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let mut map: BTreeMap<String, Value> = BTreeMap::deserialize(deserializer)?;

    let iss = match map.remove("iss") {
      Some(Value::String(s)) => Some(s),
      Some(_) => return Err(D::Error::custom("`iss` must be a string")),
      None => None,
    };
    let sub = match map.remove("sub") {
      Some(Value::String(s)) => Some(s),
      Some(_) => return Err(D::Error::custom("`sub` must be a string")),
      None => None,
    };
    let aud = match map.remove("aud") {
      Some(Value::String(s)) => Some(vec![s]),
      Some(Value::Array(values)) => {
        let mut list = Vec::with_capacity(values.len());
        for value in values {
          let s = value.as_str().ok_or_else(|| D::Error::custom("`aud` entries must be strings"))?;
          list.push(s.to_string());
        }
        Some(list)
      }
      Some(_) => return Err(D::Error::custom("`aud` must be a string or an array of strings")),
      None => None,
    };
    let exp = match map.remove("exp") {
      Some(value) => Some(value.as_i64().ok_or_else(|| D::Error::custom("`exp` must be an integer"))?),
      None => None,
    };
    let iat = match map.remove("iat") {
      Some(value) => Some(value.as_i64().ok_or_else(|| D::Error::custom("`iat` must be an integer"))?),
      None => None,
    };
    let nbf = match map.remove("nbf") {
      Some(value) => Some(value.as_i64().ok_or_else(|| D::Error::custom("`nbf` must be an integer"))?),
      None => None,
    };
    let jti = match map.remove("jti") {
      Some(Value::String(s)) => Some(s),
      Some(_) => return Err(D::Error::custom("`jti` must be a string")),
      None => None,
    };

    let mut custom_obj = serde_json::Map::new();
    for (key, value) in map {
      custom_obj.insert(key, value);
    }
    let custom: T = serde_json::from_value(Value::Object(custom_obj)).map_err(D::Error::custom)?;

    Ok(Self {
      iss,
      sub,
      aud,
      exp,
      iat,
      nbf,
      jti,
      flatten_audience: None,
      custom,
    })
  }
}
