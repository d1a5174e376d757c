// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Raw key material <-> [`Jwk`] conversions (spec.md §4.3 "Raw conversions")
//! and fresh-key generation (`Jwk::random`, used throughout the teacher's
//! own `tests/jws.rs` / `tests/jwe.rs`).

use core::convert::TryFrom;

use num_bigint_dig::BigUint;
use p256::elliptic_curve::sec1::ToEncodedPoint as _;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::Error;
use crate::error::Result;
use crate::jwe::JweAlgorithm;
use crate::jwe::JweEncryption;
use crate::jwk::EcCurve;
use crate::jwk::EcxCurve;
use crate::jwk::EdCurve;
use crate::jwk::Jwk;
use crate::jwk::JwkParamsEc;
use crate::jwk::JwkParamsOct;
use crate::jwk::JwkParamsOkp;
use crate::jwk::JwkParamsRsa;
use crate::jws::JwsAlgorithm;
use crate::utils::decode_b64;
use crate::utils::encode_b64;

/// Left-pad `value` to exactly `width` bytes, per spec.md §3 invariant 1.
fn encode_uint(value: &[u8], width: usize) -> String {
  let mut buf = vec![0u8; width.saturating_sub(value.len())];
  buf.extend_from_slice(value);
  encode_b64(buf)
}

fn decode_uint(value: &str) -> Result<Vec<u8>> {
  decode_b64(value.as_bytes())
}

/// A strategy for producing fresh [`Jwk`] material appropriate to a given
/// algorithm selector (a [`JwsAlgorithm`] or a `(JweAlgorithm, JweEncryption)`
/// pair).
pub trait Generate {
  fn generate(self) -> Result<Jwk>;
}

impl Jwk {
  /// Generate fresh key material suitable for `params` (a signature
  /// algorithm or a key-management/content-encryption pair).
  pub fn random(params: impl Generate) -> Result<Jwk> {
    params.generate()
  }

  pub fn to_x25519_public(&self) -> Result<x25519_dalek::PublicKey> {
    let params = self.try_okp_params()?;
    if EcxCurve::try_from(params.crv.as_str())? != EcxCurve::X25519 {
      return Err(Error::KeyTypeMismatch);
    }
    let bytes = decode_uint(&params.x)?;
    let array: [u8; 32] = bytes
      .try_into()
      .map_err(|_| Error::InvalidParameter("X25519 public key has the wrong length"))?;
    Ok(x25519_dalek::PublicKey::from(array))
  }

  pub fn to_x25519_secret(&self) -> Result<x25519_dalek::StaticSecret> {
    let params = self.try_okp_params()?;
    if EcxCurve::try_from(params.crv.as_str())? != EcxCurve::X25519 {
      return Err(Error::KeyTypeMismatch);
    }
    let d = params.d.as_ref().ok_or(Error::KeyTypeMismatch)?;
    let bytes = decode_uint(d)?;
    let array: [u8; 32] = bytes
      .try_into()
      .map_err(|_| Error::InvalidParameter("X25519 secret key has the wrong length"))?;
    Ok(x25519_dalek::StaticSecret::from(array))
  }

  pub fn to_x448_public(&self) -> Result<crate::crypto::x448::X448PublicKey> {
    Err(Error::UnsupportedAlgorithm("X448".into()))
  }
}

// --- RSA ---------------------------------------------------------------

impl Jwk {
  pub fn from_rsa_public(key: &rsa::RsaPublicKey) -> Jwk {
    use rsa::PublicKeyParts;
    Jwk::from_params(JwkParamsRsa {
      n: encode_b64(key.n().to_bytes_be()),
      e: encode_b64(key.e().to_bytes_be()),
      ..Default::default()
    })
  }

  pub fn from_rsa_private(key: &rsa::RsaPrivateKey) -> Jwk {
    use rsa::PublicKeyParts;
    let primes = key.primes();
    let (p, q) = (primes.get(0), primes.get(1));
    Jwk::from_params(JwkParamsRsa {
      n: encode_b64(key.n().to_bytes_be()),
      e: encode_b64(key.e().to_bytes_be()),
      d: Some(encode_b64(key.d().to_bytes_be())),
      p: p.map(|p| encode_b64(p.to_bytes_be())),
      q: q.map(|q| encode_b64(q.to_bytes_be())),
      ..Default::default()
    })
  }

  pub fn to_rsa_public(&self) -> Result<rsa::RsaPublicKey> {
    let params = self.try_rsa_params()?;
    let n = BigUint::from_bytes_be(&decode_uint(&params.n)?);
    let e = BigUint::from_bytes_be(&decode_uint(&params.e)?);
    rsa::RsaPublicKey::new(n, e).map_err(|_| "invalid RSA public key".into())
  }

  pub fn to_rsa_private(&self) -> Result<rsa::RsaPrivateKey> {
    let params = self.try_rsa_params()?;
    let d = params.d.as_ref().ok_or(Error::KeyTypeMismatch)?;

    let n = BigUint::from_bytes_be(&decode_uint(&params.n)?);
    let e = BigUint::from_bytes_be(&decode_uint(&params.e)?);
    let d = BigUint::from_bytes_be(&decode_uint(d)?);

    let mut primes = Vec::new();
    if let Some(p) = &params.p {
      primes.push(BigUint::from_bytes_be(&decode_uint(p)?));
    }
    if let Some(q) = &params.q {
      primes.push(BigUint::from_bytes_be(&decode_uint(q)?));
    }

    rsa::RsaPrivateKey::from_components(n, e, d, primes)
      .map_err(|_| "invalid RSA private key".into())
  }
}

// --- EC ------------------------------------------------------------------

impl Jwk {
  pub fn to_ec_public_sec1(&self) -> Result<Vec<u8>> {
    let params = self.try_ec_params()?;
    let curve = EcCurve::try_from(params.crv.as_str())?;
    let width = curve.coordinate_len();

    let mut point = Vec::with_capacity(1 + width * 2);
    point.push(0x04);
    point.extend(left_pad(&decode_uint(&params.x)?, width));
    point.extend(left_pad(&decode_uint(&params.y)?, width));
    Ok(point)
  }

  pub fn to_ec_private_scalar(&self) -> Result<Vec<u8>> {
    let params = self.try_ec_params()?;
    let d = params.d.as_ref().ok_or(Error::KeyTypeMismatch)?;
    decode_uint(d)
  }

  /// Build an EC `Jwk` from a SEC1-encoded uncompressed point and, if
  /// present, a private scalar. Enforces spec.md §3 invariant 1 (fixed
  /// coordinate width).
  pub fn from_ec_point(curve: EcCurve, point: &[u8], d: Option<&[u8]>) -> Result<Jwk> {
    let width = curve.coordinate_len();
    if point.len() != 1 + width * 2 || point[0] != 0x04 {
      return Err(Error::InvalidParameter("expected an uncompressed SEC1 point"));
    }

    Ok(Jwk::from_params(JwkParamsEc {
      crv: curve.name().to_string(),
      x: encode_uint(&point[1..1 + width], width),
      y: encode_uint(&point[1 + width..], width),
      d: d.map(|d| encode_uint(d, width)),
    }))
  }
}

fn left_pad(bytes: &[u8], width: usize) -> Vec<u8> {
  let mut out = vec![0u8; width.saturating_sub(bytes.len())];
  out.extend_from_slice(bytes);
  out
}

// --- OKP -------------------------------------------------------------------

impl Jwk {
  pub fn from_ed25519_keypair(public: &[u8; 32], secret_seed: Option<&[u8; 32]>) -> Jwk {
    Jwk::from_params(JwkParamsOkp {
      crv: EdCurve::Ed25519.name().to_string(),
      x: encode_b64(public),
      d: secret_seed.map(encode_b64),
    })
  }

  pub fn to_ed25519_public(&self) -> Result<[u8; 32]> {
    let params = self.try_okp_params()?;
    if EdCurve::try_from(params.crv.as_str())? != EdCurve::Ed25519 {
      return Err(Error::KeyTypeMismatch);
    }
    decode_uint(&params.x)?
      .try_into()
      .map_err(|_| Error::InvalidParameter("Ed25519 public key has the wrong length"))
  }

  pub fn to_ed25519_secret(&self) -> Result<[u8; 32]> {
    let params = self.try_okp_params()?;
    if EdCurve::try_from(params.crv.as_str())? != EdCurve::Ed25519 {
      return Err(Error::KeyTypeMismatch);
    }
    let d = params.d.as_ref().ok_or(Error::KeyTypeMismatch)?;
    decode_uint(d)?
      .try_into()
      .map_err(|_| Error::InvalidParameter("Ed25519 secret key has the wrong length"))
  }
}

// --- oct -------------------------------------------------------------------

impl Jwk {
  pub fn from_oct_secret(bytes: &[u8]) -> Jwk {
    Jwk::from_params(JwkParamsOct { k: encode_b64(bytes) })
  }

  pub fn to_oct_secret(&self) -> Result<Vec<u8>> {
    let params = self.try_oct_params()?;
    decode_uint(&params.k)
  }
}

// --- generation --------------------------------------------------------

impl Generate for JwsAlgorithm {
  fn generate(self) -> Result<Jwk> {
    use JwsAlgorithm::*;

    match self {
      HS256 => Ok(random_oct(32)),
      HS384 => Ok(random_oct(48)),
      HS512 => Ok(random_oct(64)),
      RS256 | RS384 | RS512 | PS256 | PS384 | PS512 => {
        let key = rsa::RsaPrivateKey::new(&mut OsRng, 2048).map_err(|_| "RSA key generation failed")?;
        Ok(Jwk::from_rsa_private(&key))
      }
      ES256 => random_ec(EcCurve::P256),
      ES384 => random_ec(EcCurve::P384),
      ES512 => random_ec(EcCurve::P521),
      #[cfg(feature = "es256k")]
      ES256K => random_ec(EcCurve::Secp256k1),
      EdDSA => random_ed25519(),
      NONE => Ok(random_oct(32)),
    }
  }
}

impl Generate for (JweAlgorithm, JweEncryption) {
  fn generate(self) -> Result<Jwk> {
    use JweAlgorithm::*;

    let (algorithm, encryption) = self;

    match algorithm {
      DIR => Ok(random_oct(encryption.cek_len())),
      A128KW | A128GCMKW => Ok(random_oct(16)),
      A192KW | A192GCMKW => Ok(random_oct(24)),
      A256KW | A256GCMKW => Ok(random_oct(32)),
      RSA1_5 | RSA_OAEP | RSA_OAEP_256 | RSA_OAEP_384 | RSA_OAEP_512 => {
        let key = rsa::RsaPrivateKey::new(&mut OsRng, 2048).map_err(|_| "RSA key generation failed")?;
        Ok(Jwk::from_rsa_private(&key))
      }
      PBES2_HS256_A128KW | PBES2_HS384_A192KW | PBES2_HS512_A256KW => Ok(random_oct(16)),
      ECDH_ES | ECDH_ES_A128KW | ECDH_ES_A192KW | ECDH_ES_A256KW => random_ec(EcCurve::P256),
      ECDH_ES_C20PKW | ECDH_ES_XC20PKW => Err(Error::UnsupportedAlgorithm("C20P".into())),
    }
  }
}

fn random_oct(len: usize) -> Jwk {
  let mut bytes = vec![0u8; len];
  OsRng.fill_bytes(&mut bytes);
  Jwk::from_oct_secret(&bytes)
}

fn random_ec(curve: EcCurve) -> Result<Jwk> {
  match curve {
    EcCurve::P256 => {
      let secret = p256::SecretKey::random(&mut OsRng);
      let public_point = secret.public_key().to_encoded_point(false);
      Jwk::from_ec_point(curve, public_point.as_bytes(), Some(&secret.to_bytes()))
    }
    EcCurve::P384 => {
      let secret = p384::SecretKey::random(&mut OsRng);
      let public_point = secret.public_key().to_encoded_point(false);
      Jwk::from_ec_point(curve, public_point.as_bytes(), Some(&secret.to_bytes()))
    }
    EcCurve::P521 => {
      let secret = p521::SecretKey::random(&mut OsRng);
      let public_point = secret.public_key().to_encoded_point(false);
      Jwk::from_ec_point(curve, public_point.as_bytes(), Some(&secret.to_bytes()))
    }
    #[cfg(feature = "es256k")]
    EcCurve::Secp256k1 => {
      let secret = k256::SecretKey::random(&mut OsRng);
      let public_point = secret.public_key().to_encoded_point(false);
      Jwk::from_ec_point(curve, public_point.as_bytes(), Some(&secret.to_bytes()))
    }
  }
}

fn random_ed25519() -> Result<Jwk> {
  let mut seed = [0u8; 32];
  OsRng.fill_bytes(&mut seed);
  let public = crate::crypto::ed25519::public_from_secret(&seed)?;
  Ok(Jwk::from_ed25519_keypair(&public, Some(&seed)))
}
