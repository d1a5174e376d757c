// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Crate-wide error type.

use core::fmt::Debug;
use core::fmt::Display;
use core::fmt::Formatter;
use core::fmt::Result as FmtResult;

/// Alias for a `Result` with the error type [`Error`].
pub type Result<T, E = Error> = ::core::result::Result<T, E>;

/// This type represents all possible errors that can occur in this library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("invalid content: {0}")]
  InvalidContent(&'static str),
  #[error("invalid claim: {0}")]
  InvalidClaim(&'static str),
  #[error("invalid parameter: {0}")]
  InvalidParameter(&'static str),
  #[error("missing parameter: {0}")]
  MissingParameter(&'static str),
  #[error("key not found")]
  KeyNotFound,
  #[error("key type mismatch")]
  KeyTypeMismatch,
  #[error("unsupported algorithm: {0}")]
  UnsupportedAlgorithm(String),
  #[error("signature verification failed")]
  SignatureFailure,
  #[error("decryption failed")]
  DecryptionFailure,
  #[error("validation failed: `{0}` not satisfied")]
  ValidationFailure(&'static str),
  #[error("duplicate header parameter between protected and unprotected headers")]
  IntegrityViolation,
  #[error("remote capability error: {0}")]
  CapabilityError(String),
  #[error("invalid content character: {0:?}")]
  InvalidContentChar(char),
  #[error(transparent)]
  CryptoError(#[from] CryptoError),
  #[error(transparent)]
  EncodingError(#[from] base64::DecodeError),
  #[error(transparent)]
  JsonError(#[from] serde_json::Error),
  #[error(transparent)]
  UrlError(#[from] url::ParseError),
}

/// An opaque cryptographic failure.
///
/// Never distinguishes *why* a crypto primitive failed (wrong padding vs.
/// wrong MAC vs. wrong signature) so callers can't build a decryption
/// oracle out of differing error variants.
#[derive(Clone, Copy)]
pub struct CryptoError(pub(crate) &'static str);

impl CryptoError {
  pub(crate) const fn new(context: &'static str) -> Self {
    Self(context)
  }
}

impl Debug for CryptoError {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.write_str("CryptoError")
  }
}

impl Display for CryptoError {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.write_str("cryptographic operation failed")
  }
}

impl std::error::Error for CryptoError {}

impl From<&'static str> for Error {
  fn from(context: &'static str) -> Self {
    Self::CryptoError(CryptoError::new(context))
  }
}
