// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Ed25519 signing/verification for the `EdDSA` JWS algorithm.

use core::convert::TryFrom;

use ed25519_dalek::Signer as _;
use ed25519_dalek::Verifier as _;

use crate::error::Error;
use crate::error::Result;

pub fn sign(secret_seed: &[u8], message: &[u8]) -> Result<Vec<u8>> {
  let secret =
    ed25519_dalek::SecretKey::from_bytes(secret_seed).map_err(|_| "invalid Ed25519 seed")?;
  let public: ed25519_dalek::PublicKey = (&secret).into();
  let keypair = ed25519_dalek::Keypair { secret, public };
  Ok(keypair.sign(message).to_bytes().to_vec())
}

pub fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<()> {
  let public = ed25519_dalek::PublicKey::from_bytes(public_key).map_err(|_| "invalid Ed25519 public key")?;
  let signature =
    ed25519_dalek::Signature::try_from(signature).map_err(|_| Error::SignatureFailure)?;
  public.verify(message, &signature).map_err(|_| Error::SignatureFailure)
}

/// Recompute the Ed25519 public key from a private seed, used to enforce
/// spec.md §3 invariant 2 on construction from raw material.
pub fn public_from_secret(secret_seed: &[u8]) -> Result<[u8; 32]> {
  let secret = ed25519_dalek::SecretKey::from_bytes(secret_seed).map_err(|_| "invalid Ed25519 seed")?;
  let public: ed25519_dalek::PublicKey = (&secret).into();
  Ok(public.to_bytes())
}
