// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use crate::jwe::JweHeader;
use crate::utils::Empty;

/// The result of a successful JWE decryption.
#[derive(Clone, Debug, PartialEq)]
pub struct Token<T = Empty> {
  pub protected: Option<JweHeader<T>>,
  pub unprotected: Option<JweHeader<T>>,
  pub recipient_header: Option<JweHeader<T>>,
  pub plaintext: Vec<u8>,
}

impl<T> Token<T> {
  pub fn header(&self) -> Option<&JweHeader<T>> {
    self
      .protected
      .as_ref()
      .or(self.unprotected.as_ref())
      .or(self.recipient_header.as_ref())
  }
}
