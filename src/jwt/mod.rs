// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! JWT (RFC 7519): a typed claims set riding on a [`crate::jws`] signature
//! and, optionally, a [`crate::jwe`] encryption layer.

mod builder;
mod claims;
mod token;
mod validator;

pub use builder::JwtClaimsBuilder;
pub use claims::JwtClaims;
pub use token::parse;
pub use token::KeySource;
pub use token::ParseOptions;
pub use validator::Validator;
