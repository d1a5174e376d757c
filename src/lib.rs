// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! A library for JOSE (JSON Object Signing and Encryption): JWK (RFC 7517,
//! RFC 7638), JWS (RFC 7515), JWE (RFC 7516), and JWT (RFC 7519) built on
//! RFC 7518 algorithms and RFC 8037 Ed25519/X25519 support.
//!
//! The four subsystems layer as [`jwk`] (keys) → [`jws`]/[`jwe`] (signing,
//! encryption) → [`jwt`] (typed claims riding on either). [`crypto`] holds
//! the primitive dispatch tables neither JOSE layer exposes directly.
//!
//! CLI front-ends, file I/O, and the HTTP client a [`jwk::remote`] fetcher
//! would use are thin collaborators and live outside this crate; only the
//! trait surface a collaborator calls against ([`jwk::remote::JwkSetFetch`])
//! is defined here.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub(crate) mod crypto;
pub mod error;
pub mod jwe;
pub mod jwk;
pub mod jws;
pub mod jwt;
pub mod registry;
pub mod utils;

pub use error::Error;
pub use error::Result;
