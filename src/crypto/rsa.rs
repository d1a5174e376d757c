// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! RSA PKCS#1-v1.5 and RSA-PSS signing, and RSA1_5/RSA-OAEP key-wrapping.

use rsa::Hash;
use rsa::PaddingScheme;
use rsa::PublicKey as _;
use rsa::RsaPrivateKey;
use rsa::RsaPublicKey;
use sha2::Digest as _;
use sha2::Sha256;
use sha2::Sha384;
use sha2::Sha512;

use crate::error::Error;
use crate::error::Result;

fn digest(bits: usize, message: &[u8]) -> Result<(Hash, Vec<u8>)> {
  match bits {
    256 => Ok((Hash::SHA2_256, Sha256::digest(message).to_vec())),
    384 => Ok((Hash::SHA2_384, Sha384::digest(message).to_vec())),
    512 => Ok((Hash::SHA2_512, Sha512::digest(message).to_vec())),
    _ => Err(Error::UnsupportedAlgorithm(format!("RS/PS{}", bits))),
  }
}

/// RSASSA-PKCS1-v1_5 sign, as used by `RS256`/`RS384`/`RS512`.
pub fn pkcs1v15_sign(bits: usize, key: &RsaPrivateKey, message: &[u8]) -> Result<Vec<u8>> {
  let (hash, hashed) = digest(bits, message)?;
  let scheme = PaddingScheme::new_pkcs1v15_sign(Some(hash));
  key.sign(scheme, &hashed).map_err(|_| "RSA sign".into())
}

pub fn pkcs1v15_verify(bits: usize, key: &RsaPublicKey, message: &[u8], signature: &[u8]) -> Result<()> {
  let (hash, hashed) = digest(bits, message)?;
  let scheme = PaddingScheme::new_pkcs1v15_sign(Some(hash));
  key
    .verify(scheme, &hashed, signature)
    .map_err(|_| Error::SignatureFailure)
}

/// RSASSA-PSS sign, as used by `PS256`/`PS384`/`PS512`. Salt length equals
/// the hash output length.
pub fn pss_sign(bits: usize, key: &RsaPrivateKey, message: &[u8], rng: &mut impl rand::RngCore) -> Result<Vec<u8>> {
  let (_, hashed) = digest(bits, message)?;
  let scheme = match bits {
    256 => PaddingScheme::new_pss::<Sha256, _>(rng),
    384 => PaddingScheme::new_pss::<Sha384, _>(rng),
    512 => PaddingScheme::new_pss::<Sha512, _>(rng),
    _ => return Err(Error::UnsupportedAlgorithm(format!("PS{}", bits))),
  };
  key.sign(scheme, &hashed).map_err(|_| "RSA-PSS sign".into())
}

pub fn pss_verify(bits: usize, key: &RsaPublicKey, message: &[u8], signature: &[u8]) -> Result<()> {
  let (_, hashed) = digest(bits, message)?;
  let scheme = match bits {
    256 => PaddingScheme::new_pss::<Sha256, _>(rand::rngs::OsRng),
    384 => PaddingScheme::new_pss::<Sha384, _>(rand::rngs::OsRng),
    512 => PaddingScheme::new_pss::<Sha512, _>(rand::rngs::OsRng),
    _ => return Err(Error::UnsupportedAlgorithm(format!("PS{}", bits))),
  };
  key
    .verify(scheme, &hashed, signature)
    .map_err(|_| Error::SignatureFailure)
}

/// PKCS#1-v1.5 key encryption, used by `RSA1_5`.
pub fn pkcs1v15_encrypt(key: &RsaPublicKey, cek: &[u8], rng: &mut impl rand::RngCore) -> Result<Vec<u8>> {
  key
    .encrypt(rng, PaddingScheme::new_pkcs1v15_encrypt(), cek)
    .map_err(|_| "RSA1_5 encrypt".into())
}

pub fn pkcs1v15_decrypt(key: &RsaPrivateKey, ciphertext: &[u8]) -> Result<Vec<u8>> {
  key
    .decrypt(PaddingScheme::new_pkcs1v15_encrypt(), ciphertext)
    .map_err(|_| Error::DecryptionFailure)
}

/// RSA-OAEP key encryption, used by `RSA-OAEP`/`RSA-OAEP-256`.
pub fn oaep_encrypt(sha256: bool, key: &RsaPublicKey, cek: &[u8], rng: &mut impl rand::RngCore) -> Result<Vec<u8>> {
  let scheme = if sha256 {
    PaddingScheme::new_oaep::<Sha256>()
  } else {
    PaddingScheme::new_oaep::<sha1::Sha1>()
  };
  key.encrypt(rng, scheme, cek).map_err(|_| "RSA-OAEP encrypt".into())
}

pub fn oaep_decrypt(sha256: bool, key: &RsaPrivateKey, ciphertext: &[u8]) -> Result<Vec<u8>> {
  let scheme = if sha256 {
    PaddingScheme::new_oaep::<Sha256>()
  } else {
    PaddingScheme::new_oaep::<sha1::Sha1>()
  };
  key.decrypt(scheme, ciphertext).map_err(|_| Error::DecryptionFailure)
}
