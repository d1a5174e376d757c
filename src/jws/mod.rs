// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! JSON Web Signature (RFC 7515) and RFC 7518 §3 / RFC 8037 §3.1 `alg`
//! values. See spec.md §3 "JWS message" and §4.4.

mod algorithm;
pub(crate) mod encoder;
mod decoder;
mod format;
mod header;
mod token;

pub use algorithm::JwsAlgorithm;
pub use decoder::Decoder;
pub use encoder::Encoder;
pub use format::JwsFormat;
pub use header::JwsHeader;
pub use token::Token;
