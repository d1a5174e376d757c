// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use crate::jws::JwsHeader;
use crate::utils::Empty;

/// The result of a successful JWS verification: the recovered payload and
/// the header(s) that were used to produce the valid signature.
///
/// `protected`/`unprotected` mirror the two header sources a JWS signature
/// may draw parameters from (RFC 7515 §5.2); a decoder merges them before
/// the caller sees either, but both are surfaced here since callers may
/// need to know which header carried which parameter (e.g. `crit`
/// handling, spec.md §4.4 "Verify" step 2).
#[derive(Clone, Debug, PartialEq)]
pub struct Token<T = Empty> {
  pub protected: Option<JwsHeader<T>>,
  pub unprotected: Option<JwsHeader<T>>,
  pub claims: Vec<u8>,
}

impl<T> Token<T> {
  /// The effective header: `protected`, falling back to `unprotected`.
  /// Individual parameters may still need to be looked up across both —
  /// callers needing that should inspect the fields directly.
  pub fn header(&self) -> Option<&JwsHeader<T>> {
    self.protected.as_ref().or(self.unprotected.as_ref())
  }
}
