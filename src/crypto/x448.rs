// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! X448 is recognized as a valid `crv` value (RFC 8037 registers it) but no
//! Diffie-Hellman implementation is wired up, mirroring the behavior of the
//! Go implementation this crate's spec was distilled from: the curve name
//! round-trips through a `Jwk`, but key agreement over it is unsupported.

/// Placeholder type so [`crate::utils::Secret::to_x448_public`] has a return
/// type to name; constructing one always fails.
pub struct X448PublicKey;

impl X448PublicKey {
  pub fn to_bytes(&self) -> [u8; 56] {
    unreachable!("X448 key agreement is unsupported")
  }
}
