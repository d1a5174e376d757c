// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! The algorithm registry glue (spec.md §4.1): each algorithm/curve enum
//! (`JwsAlgorithm`, `JweAlgorithm`, `JweEncryption`, `EcCurve`, `EdCurve`,
//! `EcxCurve`) already implements `TryFrom<&str>` against its canonical
//! IANA string and an `ALL`/`name()` pair for enumeration and
//! round-tripping. This module adds the two pieces those per-category impls
//! don't each need to repeat: a blanket `accept` that takes anything
//! offering a string view, and a `list` that names the `ALL` contract
//! uniformly across categories.

use core::convert::TryFrom;

use crate::error::Error;
use crate::jwe::JweAlgorithm;
use crate::jwe::JweEncryption;
use crate::jwk::EcCurve;
use crate::jwk::EcxCurve;
use crate::jwk::EdCurve;
use crate::jws::JwsAlgorithm;

/// Parse `input` as an `A` (a [`JwsAlgorithm`], [`JweAlgorithm`], curve,
/// etc.) from any stringable input — a `&str`, `String`, or other
/// `AsRef<str>`. Unknown strings and non-string inputs are rejected; this
/// crate never accepts a bare integer as an algorithm identifier (spec.md
/// §4.1's "`Accept` must succeed on ... any value providing a 'to string'
/// view").
pub fn accept<'a, A, S>(input: &'a S) -> Result<A, Error>
where
  A: TryFrom<&'a str, Error = Error>,
  S: AsRef<str> + ?Sized,
{
  A::try_from(input.as_ref())
}

/// A category of the algorithm registry: a fixed, enumerable set of
/// canonical identifiers. Implemented by the built-in algorithm/curve enums
/// this crate dispatches on; satisfies spec.md §4.1's "`list(category)`".
pub trait Registry: Sized + Copy + 'static {
  const ALL: &'static [Self];
}

impl Registry for JwsAlgorithm {
  const ALL: &'static [Self] = <JwsAlgorithm>::ALL;
}

impl Registry for JweAlgorithm {
  const ALL: &'static [Self] = <JweAlgorithm>::ALL;
}

impl Registry for JweEncryption {
  const ALL: &'static [Self] = <JweEncryption>::ALL;
}

impl Registry for EcCurve {
  const ALL: &'static [Self] = <EcCurve>::ALL;
}

impl Registry for EdCurve {
  const ALL: &'static [Self] = <EdCurve>::ALL;
}

impl Registry for EcxCurve {
  const ALL: &'static [Self] = <EcxCurve>::ALL;
}

/// All canonical, non-custom values of `A`, per spec.md §4.1 `list(category)`.
pub fn list<A: Registry>() -> &'static [A] {
  A::ALL
}
