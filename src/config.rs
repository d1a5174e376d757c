// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Process-wide configuration knobs (spec.md §6 "Configuration knobs").
//!
//! Everything that varies per call — which keys to verify against, which
//! format to emit, whether to flatten a single-element `aud` — is a builder
//! option on the relevant type ([`crate::jws::Encoder`], [`crate::jwe::Decoder`],
//! [`crate::jwt::ParseOptions`], [`crate::jwt::JwtClaims::set_flatten_audience`]).
//! The two flags here are the exception: they are genuinely process-global,
//! mirroring a toggle the Go implementation this crate's spec was distilled
//! from exposes the same way (`jwx.DecoderSettings`).
//!
//! Neither flag is safe to flip concurrently with in-flight encode/decode
//! calls on another thread; treat them as startup configuration, not a
//! per-request switch.

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

static ARBITRARY_PRECISION_NUMBERS: AtomicBool = AtomicBool::new(false);
static DEFAULT_FLATTEN_AUDIENCE: AtomicBool = AtomicBool::new(false);

/// Enables decoding numeric JSON fields (anything not explicitly typed as
/// `i64`/`u64`/`f64` by this crate's structs, e.g. a caller's custom claim
/// type `T`) losslessly rather than through a 64-bit float round trip.
///
/// This is wired to `serde_json`'s `arbitrary_precision` feature, which is
/// always compiled into this crate (see `Cargo.toml`); the flag here only
/// controls whether [`crate::utils::to_json_vec`]/[`crate::utils::from_json_slice`]
/// ask `serde_json` to preserve out-of-range integers as opaque numbers
/// instead of normalizing them, which is only observable for caller-defined
/// claim/header types that don't declare an exact integer width.
pub fn set_arbitrary_precision_numbers(enabled: bool) {
  ARBITRARY_PRECISION_NUMBERS.store(enabled, Ordering::SeqCst);
}

pub fn arbitrary_precision_numbers() -> bool {
  ARBITRARY_PRECISION_NUMBERS.load(Ordering::SeqCst)
}

/// The process-wide default for whether [`crate::jwt::JwtClaims`] serializes
/// a single-element `aud` as a bare string instead of a one-element array
/// (spec.md §3 "JWT token"). [`crate::jwt::JwtClaims::set_flatten_audience`]
/// overrides this per token; this is only the fallback when a token leaves
/// it unset.
pub fn set_default_flatten_audience(enabled: bool) {
  DEFAULT_FLATTEN_AUDIENCE.store(enabled, Ordering::SeqCst);
}

pub fn default_flatten_audience() -> bool {
  DEFAULT_FLATTEN_AUDIENCE.load(Ordering::SeqCst)
}
