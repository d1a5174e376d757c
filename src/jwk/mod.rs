// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! JSON Web Key (RFC 7517), RFC 7518 §6 key parameters, and RFC 8037 OKP
//! parameters. See spec.md §3 "Key" / §3 "Key set" and §4.3.

mod convert;
mod curve;
mod key;
mod params;
pub mod remote;
mod set;
mod types;

/// Hash algorithms usable with [`Jwk::thumbprint`], re-exported here since
/// [`crate::crypto`] is otherwise crate-internal.
pub use crate::crypto::digest;
pub use convert::Generate;
pub use curve::EcCurve;
pub use curve::EcxCurve;
pub use curve::EdCurve;
pub use key::Jwk;
pub use params::JwkParams;
pub use params::JwkParamsEc;
pub use params::JwkParamsOct;
pub use params::JwkParamsOkp;
pub use params::JwkParamsRsa;
pub use params::JwkParamsRsaPrime;
pub use remote::JwkSetFetch;
pub use remote::RemoteJwkSet;
pub use set::JwkSet;
pub use types::JwkOperation;
pub use types::JwkType;
pub use types::JwkUse;
