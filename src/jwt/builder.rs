// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use crate::jwt::JwtClaims;
use crate::utils::Empty;

/// Fluent accumulation of claims, per spec.md §4.6 "Builder". Claims left
/// unset stay absent from the built token rather than defaulting to zero
/// values.
pub struct JwtClaimsBuilder<T = Empty> {
  claims: JwtClaims<T>,
}

impl<T: Default> JwtClaimsBuilder<T> {
  pub fn new() -> Self {
    Self {
      claims: JwtClaims::new(),
    }
  }
}

impl<T: Default> Default for JwtClaimsBuilder<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T> JwtClaimsBuilder<T> {
  pub fn iss(mut self, value: impl Into<String>) -> Self {
    self.claims.set_iss(value);
    self
  }

  pub fn sub(mut self, value: impl Into<String>) -> Self {
    self.claims.set_sub(value);
    self
  }

  pub fn aud(mut self, value: impl IntoIterator<Item = impl Into<String>>) -> Self {
    self.claims.set_aud(value);
    self
  }

  pub fn exp(mut self, value: i64) -> Self {
    self.claims.set_exp(value);
    self
  }

  pub fn iat(mut self, value: i64) -> Self {
    self.claims.set_iat(value);
    self
  }

  pub fn nbf(mut self, value: i64) -> Self {
    self.claims.set_nbf(value);
    self
  }

  pub fn jti(mut self, value: impl Into<String>) -> Self {
    self.claims.set_jti(value);
    self
  }

  pub fn flatten_audience(mut self, value: bool) -> Self {
    self.claims.set_flatten_audience(value);
    self
  }

  pub fn custom(mut self, value: T) -> Self {
    *self.claims.custom_mut() = value;
    self
  }

  pub fn build(self) -> JwtClaims<T> {
    self.claims
  }
}
