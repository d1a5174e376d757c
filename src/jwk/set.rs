// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use serde::de::Error as _;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde_json::Value;

use crate::jwk::Jwk;

/// An ordered collection of [`Jwk`]s with a side index by `kid`, per spec.md
/// §3 "Key set". The index is rebuilt whenever the set is mutated (DESIGN
/// NOTES §9 "concurrent maps with insertion order").
#[derive(Default)]
pub struct JwkSet {
  keys: Vec<Jwk>,
  by_kid: HashMap<String, usize>,
}

impl JwkSet {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.keys.len()
  }

  pub fn is_empty(&self) -> bool {
    self.keys.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &Jwk> {
    self.keys.iter()
  }

  pub fn get(&self, index: usize) -> Option<&Jwk> {
    self.keys.get(index)
  }

  /// Look up the first key whose `kid` equals `kid`.
  pub fn get_kid(&self, kid: &str) -> Option<&Jwk> {
    self.by_kid.get(kid).and_then(|&index| self.keys.get(index))
  }

  pub fn push(&mut self, key: Jwk) {
    if let Some(kid) = key.kid() {
      self.by_kid.entry(kid).or_insert(self.keys.len());
    }
    self.keys.push(key);
  }

  /// Remove the key at `index`, rebuilding the `kid` index.
  pub fn remove(&mut self, index: usize) -> Option<Jwk> {
    if index >= self.keys.len() {
      return None;
    }
    let removed = self.keys.remove(index);
    self.rebuild_index();
    Some(removed)
  }

  fn rebuild_index(&mut self) {
    self.by_kid.clear();
    for (index, key) in self.keys.iter().enumerate() {
      if let Some(kid) = key.kid() {
        self.by_kid.entry(kid).or_insert(index);
      }
    }
  }
}

impl<'a> IntoIterator for &'a JwkSet {
  type Item = &'a Jwk;
  type IntoIter = std::slice::Iter<'a, Jwk>;

  fn into_iter(self) -> Self::IntoIter {
    self.keys.iter()
  }
}

impl FromIterator<Jwk> for JwkSet {
  fn from_iter<T: IntoIterator<Item = Jwk>>(iter: T) -> Self {
    let mut set = Self::new();
    for key in iter {
      set.push(key);
    }
    set
  }
}

impl Serialize for JwkSet {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct Repr<'a> {
      keys: &'a [Jwk],
    }
    Repr { keys: &self.keys }.serialize(serializer)
  }
}

impl<'de> Deserialize<'de> for JwkSet {
  /// Parses `{"keys": [...] }`. A bare key object (not wrapped in a set)
  /// is accepted and treated as a one-element set, per spec.md §4.3
  /// "Parsing a set".
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let value: Value = Value::deserialize(deserializer)?;

    let keys: Vec<Jwk> = if let Some(Value::Array(_)) = value.get("keys") {
      let keys_value = value.get("keys").cloned().unwrap();
      serde_json::from_value(keys_value).map_err(D::Error::custom)?
    } else {
      let key: Jwk = serde_json::from_value(value).map_err(D::Error::custom)?;
      vec![key]
    };

    Ok(keys.into_iter().collect())
  }
}
