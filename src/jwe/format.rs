// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

/// The wire serialization used when encoding/decoding a JWE, RFC 7516 §3
/// and §7.2.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JweFormat {
  /// `BASE64URL(protected) || '.' || BASE64URL(encrypted_key) || '.' ||
  /// BASE64URL(iv) || '.' || BASE64URL(ciphertext) || '.' || BASE64URL(tag)`
  Compact,
  /// The general JSON serialization; any number of recipients, one object
  /// per recipient under a top-level `recipients` array.
  General,
  /// The flattened JSON serialization; exactly one recipient, its members
  /// inlined at the top level instead of nested under `recipients`.
  Flatten,
}

impl Default for JweFormat {
  fn default() -> Self {
    Self::Compact
  }
}
