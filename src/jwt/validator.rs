// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use crate::error::Error;
use crate::error::Result;
use crate::jwt::JwtClaims;
use crate::utils::Empty;

type Predicate<'a, T> = Box<dyn Fn(&JwtClaims<T>) -> Result<()> + 'a>;

/// The predicate pipeline run over a parsed [`JwtClaims`], per spec.md §4.6
/// "Validator". Built-in checks are opt-in per instance; a validator with
/// nothing configured always passes.
pub struct Validator<'a, T = Empty> {
  now: Option<i64>,
  skew: i64,
  check_exp: bool,
  check_nbf: bool,
  check_iat: bool,
  issuer: Option<String>,
  audience: Option<String>,
  subject: Option<String>,
  jwt_id: Option<String>,
  predicates: Vec<Predicate<'a, T>>,
}

impl<'a, T> Validator<'a, T> {
  pub fn new() -> Self {
    Self {
      now: None,
      skew: 0,
      check_exp: false,
      check_nbf: false,
      check_iat: false,
      issuer: None,
      audience: None,
      subject: None,
      jwt_id: None,
      predicates: Vec::new(),
    }
  }

  /// Fix the clock used for `exp`/`nbf`/`iat` checks to `now` (seconds since
  /// the epoch) instead of the system clock. Intended for tests.
  pub fn clock(mut self, now: i64) -> Self {
    self.now = Some(now);
    self
  }

  /// Allowed clock skew, in seconds, applied to `exp`/`nbf` comparisons.
  pub fn skew(mut self, skew: i64) -> Self {
    self.skew = skew;
    self
  }

  pub fn exp(mut self, check: bool) -> Self {
    self.check_exp = check;
    self
  }

  pub fn nbf(mut self, check: bool) -> Self {
    self.check_nbf = check;
    self
  }

  /// Reject tokens whose `iat` lies in the future (beyond `skew`).
  pub fn iat(mut self, check: bool) -> Self {
    self.check_iat = check;
    self
  }

  pub fn iss(mut self, value: impl Into<String>) -> Self {
    self.issuer = Some(value.into());
    self
  }

  pub fn aud(mut self, value: impl Into<String>) -> Self {
    self.audience = Some(value.into());
    self
  }

  pub fn sub(mut self, value: impl Into<String>) -> Self {
    self.subject = Some(value.into());
    self
  }

  pub fn jti(mut self, value: impl Into<String>) -> Self {
    self.jwt_id = Some(value.into());
    self
  }

  /// Register a custom predicate, run after all built-in checks pass.
  pub fn predicate(mut self, f: impl Fn(&JwtClaims<T>) -> Result<()> + 'a) -> Self {
    self.predicates.push(Box::new(f));
    self
  }

  fn now(&self) -> i64 {
    match self.now {
      Some(now) => now,
      None => SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before the epoch")
        .as_secs() as i64,
    }
  }

  pub fn validate(&self, claims: &JwtClaims<T>) -> Result<()> {
    let now = self.now();

    if self.check_exp {
      let exp = claims.exp().ok_or(Error::ValidationFailure("`exp` is required"))?;
      if now >= exp + self.skew {
        return Err(Error::ValidationFailure("`exp` not satisfied"));
      }
    }

    if self.check_nbf {
      let nbf = claims.nbf().ok_or(Error::ValidationFailure("`nbf` is required"))?;
      if now < nbf - self.skew {
        return Err(Error::ValidationFailure("`nbf` not satisfied"));
      }
    }

    if self.check_iat {
      let iat = claims.iat().ok_or(Error::ValidationFailure("`iat` is required"))?;
      if iat > now + self.skew {
        return Err(Error::ValidationFailure("`iat` not satisfied"));
      }
    }

    if let Some(issuer) = &self.issuer {
      let iss = claims.iss().ok_or(Error::ValidationFailure("`iss` not satisfied: claim absent"))?;
      if iss != issuer {
        return Err(Error::ValidationFailure("`iss` not satisfied: values do not match"));
      }
    }

    if let Some(audience) = &self.audience {
      let aud = claims.aud().ok_or(Error::ValidationFailure("`aud` not satisfied: claim absent"))?;
      if !aud.iter().any(|value| value == audience) {
        return Err(Error::ValidationFailure("`aud` not satisfied: values do not match"));
      }
    }

    if let Some(subject) = &self.subject {
      let sub = claims.sub().ok_or(Error::ValidationFailure("`sub` not satisfied: claim absent"))?;
      if sub != subject {
        return Err(Error::ValidationFailure("`sub` not satisfied: values do not match"));
      }
    }

    if let Some(jwt_id) = &self.jwt_id {
      let jti = claims.jti().ok_or(Error::ValidationFailure("`jti` not satisfied: claim absent"))?;
      if jti != jwt_id {
        return Err(Error::ValidationFailure("`jti` not satisfied: values do not match"));
      }
    }

    for predicate in &self.predicates {
      predicate(claims)?;
    }

    Ok(())
  }
}

impl<'a, T> Default for Validator<'a, T> {
  fn default() -> Self {
    Self::new()
  }
}
