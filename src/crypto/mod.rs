// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Cryptographic primitives backing the JWS/JWE algorithm dispatch tables.
//! Nothing here understands JOSE wire formats; see [`crate::jws`] and
//! [`crate::jwe`] for the algorithm strategy objects that call into this
//! module (DESIGN NOTES §9 "Algorithm dispatch").

pub mod aes_cbc_hmac;
pub mod aes_gcm;
pub mod aes_kw;
pub mod concat_kdf;
pub mod digest;
pub mod ec;
pub mod ed25519;
pub mod hmac;
pub mod pbes2;
pub mod rsa;
pub mod x448;
