// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

/// The wire serialization used when encoding/decoding a JWS, RFC 7515 §3 and
/// §7.2.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JwsFormat {
  /// `BASE64URL(protected) || '.' || BASE64URL(payload) || '.' || BASE64URL(signature)`
  Compact,
  /// The general JSON serialization; any number of signatures, one object
  /// per recipient under a top-level `signatures` array.
  General,
  /// The flattened JSON serialization; exactly one signature, its members
  /// inlined at the top level instead of nested under `signatures`.
  Flatten,
}

impl Default for JwsFormat {
  fn default() -> Self {
    Self::Compact
  }
}
