// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! ECDSA sign/verify over the NIST curves, using the raw `r||s` fixed-width
//! concatenation specified by RFC 7518 §3.4 (never DER).

use p256::ecdsa::signature::Signer as _;
use p256::ecdsa::signature::Verifier as _;

use crate::error::Error;
use crate::error::Result;
use crate::jwk::EcCurve;

/// Sign `message` with `key` (PKCS#8/SEC1 DER-free raw scalar bytes) under
/// `curve`, returning the fixed-width `r || s` signature.
pub fn sign(curve: EcCurve, key: &[u8], message: &[u8]) -> Result<Vec<u8>> {
  match curve {
    EcCurve::P256 => {
      let signing_key =
        p256::ecdsa::SigningKey::from_bytes(key).map_err(|_| "invalid P-256 private scalar")?;
      let signature: p256::ecdsa::Signature = signing_key.sign(message);
      Ok(signature.as_ref().to_vec())
    }
    EcCurve::P384 => {
      let signing_key =
        p384::ecdsa::SigningKey::from_bytes(key).map_err(|_| "invalid P-384 private scalar")?;
      let signature: p384::ecdsa::Signature = signing_key.sign(message);
      Ok(signature.as_ref().to_vec())
    }
    EcCurve::P521 => {
      let signing_key =
        p521::ecdsa::SigningKey::from_bytes(key).map_err(|_| "invalid P-521 private scalar")?;
      let signature: p521::ecdsa::Signature = signing_key.sign(message);
      Ok(signature.as_ref().to_vec())
    }
    #[cfg(feature = "es256k")]
    EcCurve::Secp256k1 => {
      let signing_key =
        k256::ecdsa::SigningKey::from_bytes(key).map_err(|_| "invalid secp256k1 private scalar")?;
      let signature: k256::ecdsa::Signature = signing_key.sign(message);
      Ok(signature.as_ref().to_vec())
    }
  }
}

/// Raw ECDH over a NIST curve, used by `ECDH-ES` and its `+A*KW` variants
/// (RFC 7518 §4.6). `public_sec1` is the uncompressed SEC1 point of the
/// other party; `private_scalar` is this party's private key.
pub fn diffie_hellman(curve: EcCurve, public_sec1: &[u8], private_scalar: &[u8]) -> Result<Vec<u8>> {
  match curve {
    EcCurve::P256 => {
      let secret = p256::SecretKey::from_bytes(private_scalar).map_err(|_| "invalid P-256 private scalar")?;
      let public = p256::PublicKey::from_sec1_bytes(public_sec1).map_err(|_| "invalid P-256 public point")?;
      let shared = p256::ecdh::diffie_hellman(secret.to_nonzero_scalar(), public.as_affine());
      Ok(shared.raw_secret_bytes().to_vec())
    }
    EcCurve::P384 => {
      let secret = p384::SecretKey::from_bytes(private_scalar).map_err(|_| "invalid P-384 private scalar")?;
      let public = p384::PublicKey::from_sec1_bytes(public_sec1).map_err(|_| "invalid P-384 public point")?;
      let shared = p384::ecdh::diffie_hellman(secret.to_nonzero_scalar(), public.as_affine());
      Ok(shared.raw_secret_bytes().to_vec())
    }
    EcCurve::P521 => {
      let secret = p521::SecretKey::from_bytes(private_scalar).map_err(|_| "invalid P-521 private scalar")?;
      let public = p521::PublicKey::from_sec1_bytes(public_sec1).map_err(|_| "invalid P-521 public point")?;
      let shared = p521::ecdh::diffie_hellman(secret.to_nonzero_scalar(), public.as_affine());
      Ok(shared.raw_secret_bytes().to_vec())
    }
    #[cfg(feature = "es256k")]
    EcCurve::Secp256k1 => Err(Error::UnsupportedAlgorithm("secp256k1 ECDH".into())),
  }
}

pub fn verify(curve: EcCurve, key: &[u8], message: &[u8], signature: &[u8]) -> Result<()> {
  match curve {
    EcCurve::P256 => {
      let verify_key =
        p256::ecdsa::VerifyingKey::from_sec1_bytes(key).map_err(|_| "invalid P-256 public point")?;
      let signature =
        p256::ecdsa::Signature::try_from(signature).map_err(|_| Error::SignatureFailure)?;
      verify_key.verify(message, &signature).map_err(|_| Error::SignatureFailure)
    }
    EcCurve::P384 => {
      let verify_key =
        p384::ecdsa::VerifyingKey::from_sec1_bytes(key).map_err(|_| "invalid P-384 public point")?;
      let signature =
        p384::ecdsa::Signature::try_from(signature).map_err(|_| Error::SignatureFailure)?;
      verify_key.verify(message, &signature).map_err(|_| Error::SignatureFailure)
    }
    EcCurve::P521 => {
      let verify_key =
        p521::ecdsa::VerifyingKey::from_sec1_bytes(key).map_err(|_| "invalid P-521 public point")?;
      let signature =
        p521::ecdsa::Signature::try_from(signature).map_err(|_| Error::SignatureFailure)?;
      verify_key.verify(message, &signature).map_err(|_| Error::SignatureFailure)
    }
    #[cfg(feature = "es256k")]
    EcCurve::Secp256k1 => {
      let verify_key =
        k256::ecdsa::VerifyingKey::from_sec1_bytes(key).map_err(|_| "invalid secp256k1 public point")?;
      let signature =
        k256::ecdsa::Signature::try_from(signature).map_err(|_| Error::SignatureFailure)?;
      verify_key.verify(message, &signature).map_err(|_| Error::SignatureFailure)
    }
  }
}
