// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use p256::elliptic_curve::sec1::ToEncodedPoint as _;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::Serialize;
use serde_json::Value;

use crate::crypto::aes_gcm;
use crate::crypto::aes_kw;
use crate::crypto::concat_kdf;
use crate::crypto::ec;
use crate::crypto::pbes2;
use crate::crypto::rsa;
use crate::error::Error;
use crate::error::Result;
use crate::jwe::JweAlgorithm;
use crate::jwe::JweCompression;
use crate::jwe::JweEncryption;
use crate::jwe::JweFormat;
use crate::jwe::JweHeader;
use crate::jwk::EcCurve;
use crate::jwk::Jwk;
use crate::utils::decode_b64;
use crate::utils::encode_b64;
use crate::utils::to_json_vec;
use crate::utils::Empty;

struct Recipient<'a, T> {
  key: &'a Jwk,
  alg: JweAlgorithm,
  header: Option<JweHeader<T>>,
}

/// Builds a JWE over a plaintext for one or more recipients, per spec.md
/// §4.5 "Encrypt". `Compact` supports exactly one recipient; `General` and
/// `Flatten` allow several recipients to wrap the same content encryption
/// key, except for the direct-agreement algorithms (`dir`, `ECDH-ES`)
/// which are only meaningful with a single recipient.
pub struct Encoder<'a, T = Empty> {
  encryption: JweEncryption,
  format: JweFormat,
  compression: Option<JweCompression>,
  aad: Vec<u8>,
  protected: JweHeader<T>,
  recipients: Vec<Recipient<'a, T>>,
}

impl<'a, T: Default + Serialize> Encoder<'a, T> {
  pub fn new(encryption: JweEncryption) -> Self {
    Self {
      encryption,
      format: JweFormat::Compact,
      compression: None,
      aad: Vec::new(),
      protected: JweHeader::new(encryption),
      recipients: Vec::new(),
    }
  }

  pub fn format(mut self, format: JweFormat) -> Self {
    self.format = format;
    self
  }

  pub fn compression(mut self, compression: JweCompression) -> Self {
    self.compression = Some(compression);
    self
  }

  pub fn aad(mut self, aad: impl Into<Vec<u8>>) -> Self {
    self.aad = aad.into();
    self
  }

  /// Set additional shared parameters on the protected header (e.g. `kid`,
  /// `typ`). `enc` is managed internally and not overridable here.
  pub fn protected(mut self, f: impl FnOnce(&mut JweHeader<T>)) -> Self {
    f(&mut self.protected);
    self
  }

  pub fn recipient(mut self, key: &'a Jwk, alg: JweAlgorithm) -> Self {
    self.recipients.push(Recipient { key, alg, header: None });
    self
  }

  pub fn recipient_with_header(mut self, key: &'a Jwk, alg: JweAlgorithm, header: JweHeader<T>) -> Self {
    self.recipients.push(Recipient {
      key,
      alg,
      header: Some(header),
    });
    self
  }

  pub fn encrypt(mut self, plaintext: &[u8]) -> Result<String> {
    if self.recipients.len() != 1 {
      return Err(Error::InvalidParameter("compact encoding requires exactly one recipient"));
    }
    let recipient = self.recipients.remove(0);

    self.protected.set_alg(recipient.alg);
    if let Some(compression) = self.compression.clone() {
      self.protected.set_zip(compression);
    }

    let (cek, encrypted_key) = wrap_cek(recipient.alg, self.encryption, recipient.key, None, &mut self.protected)?;
    let cek = zeroize::Zeroizing::new(cek);

    let protected_b64 = encode_b64(to_json_vec(&self.protected)?);
    let aad_input = build_aad(&protected_b64, &self.aad);

    let body = compress(self.compression.as_ref(), plaintext)?;
    let iv = random_bytes(self.encryption.iv_len());
    let (ciphertext, tag) = self.encryption.encrypt(&cek, &iv, &aad_input, &body)?;

    Ok(format!(
      "{}.{}.{}.{}.{}",
      protected_b64,
      encode_b64(&encrypted_key),
      encode_b64(&iv),
      encode_b64(&ciphertext),
      encode_b64(&tag)
    ))
  }

  pub fn encrypt_json(mut self, plaintext: &[u8]) -> Result<Value> {
    if self.recipients.is_empty() {
      return Err(Error::InvalidParameter("at least one recipient is required"));
    }
    if self.format == JweFormat::Flatten && self.recipients.len() != 1 {
      return Err(Error::InvalidParameter("flattened encoding requires exactly one recipient"));
    }
    let has_direct = self
      .recipients
      .iter()
      .any(|r| matches!(r.alg, JweAlgorithm::DIR | JweAlgorithm::ECDH_ES));
    if has_direct && self.recipients.len() > 1 {
      return Err(Error::InvalidParameter(
        "direct key agreement requires exactly one recipient",
      ));
    }

    if let Some(compression) = self.compression.clone() {
      self.protected.set_zip(compression);
    }

    let recipients = core::mem::take(&mut self.recipients);
    let mut shared_cek: Option<Vec<u8>> = None;
    let mut entries = Vec::with_capacity(recipients.len());

    for recipient in recipients {
      check_no_duplicate_headers(&self.protected, recipient.header.as_ref())?;

      let mut header = recipient.header.unwrap_or_else(JweHeader::blank);
      header.set_alg(recipient.alg);

      let (cek, encrypted_key) =
        wrap_cek(recipient.alg, self.encryption, recipient.key, shared_cek.as_deref(), &mut header)?;
      if shared_cek.is_none() {
        shared_cek = Some(cek);
      }

      let mut entry = serde_json::Map::new();
      entry.insert("header".to_string(), serde_json::to_value(&header)?);
      entry.insert("encrypted_key".to_string(), Value::String(encode_b64(&encrypted_key)));
      entries.push(Value::Object(entry));
    }

    let cek = zeroize::Zeroizing::new(shared_cek.expect("at least one recipient was processed"));
    let protected_b64 = encode_b64(to_json_vec(&self.protected)?);
    let aad_input = build_aad(&protected_b64, &self.aad);

    let body = compress(self.compression.as_ref(), plaintext)?;
    let iv = random_bytes(self.encryption.iv_len());
    let (ciphertext, tag) = self.encryption.encrypt(&cek, &iv, &aad_input, &body)?;

    let mut top = serde_json::Map::new();
    top.insert("protected".to_string(), Value::String(protected_b64));
    top.insert("iv".to_string(), Value::String(encode_b64(&iv)));
    top.insert("ciphertext".to_string(), Value::String(encode_b64(&ciphertext)));
    top.insert("tag".to_string(), Value::String(encode_b64(&tag)));
    if !self.aad.is_empty() {
      top.insert("aad".to_string(), Value::String(encode_b64(&self.aad)));
    }

    match self.format {
      JweFormat::General => {
        top.insert("recipients".to_string(), Value::Array(entries));
      }
      JweFormat::Flatten => {
        if let Value::Object(entry) = entries.into_iter().next().expect("checked non-empty") {
          top.extend(entry);
        }
      }
      JweFormat::Compact => return Err(Error::InvalidParameter("use `encrypt` for compact JWE")),
    }

    Ok(Value::Object(top))
  }
}

/// Rejects a shared protected header / per-recipient header pair that
/// share any member name, per spec.md §4.4 step 3 (JWS) generalized to
/// JWE by §7's `IntegrityViolation` taxonomy entry ("duplicate header
/// between protected and unprotected").
fn check_no_duplicate_headers<T: Serialize>(
  protected: &JweHeader<T>,
  unprotected: Option<&JweHeader<T>>,
) -> Result<()> {
  let unprotected = match unprotected {
    Some(unprotected) => unprotected,
    None => return Ok(()),
  };

  let protected = serde_json::to_value(protected)?;
  let unprotected = serde_json::to_value(unprotected)?;

  let protected = protected.as_object().expect("JweHeader serializes to an object");
  let unprotected = unprotected.as_object().expect("JweHeader serializes to an object");

  if unprotected.keys().any(|key| protected.contains_key(key)) {
    return Err(Error::IntegrityViolation);
  }

  Ok(())
}

fn build_aad(protected_b64: &str, extra_aad: &[u8]) -> Vec<u8> {
  if extra_aad.is_empty() {
    protected_b64.as_bytes().to_vec()
  } else {
    format!("{}.{}", protected_b64, encode_b64(extra_aad)).into_bytes()
  }
}

fn compress(compression: Option<&JweCompression>, plaintext: &[u8]) -> Result<Vec<u8>> {
  match compression {
    Some(compression) => compression.compress(plaintext),
    None => Ok(plaintext.to_vec()),
  }
}

fn random_bytes(len: usize) -> Vec<u8> {
  let mut bytes = vec![0u8; len];
  OsRng.fill_bytes(&mut bytes);
  bytes
}

fn generate_cek(encryption: JweEncryption) -> Vec<u8> {
  random_bytes(encryption.cek_len())
}

fn oct_bytes(key: &Jwk) -> Result<Vec<u8>> {
  decode_b64(key.try_oct_params()?.k)
}

fn pbes2_params(alg: JweAlgorithm) -> Result<(usize, usize)> {
  match alg {
    JweAlgorithm::PBES2_HS256_A128KW => Ok((256, 128)),
    JweAlgorithm::PBES2_HS384_A192KW => Ok((384, 192)),
    JweAlgorithm::PBES2_HS512_A256KW => Ok((512, 256)),
    _ => Err(Error::UnsupportedAlgorithm(alg.to_string())),
  }
}

fn gcm_kw_bits(alg: JweAlgorithm) -> Result<usize> {
  match alg {
    JweAlgorithm::A128GCMKW => Ok(128),
    JweAlgorithm::A192GCMKW => Ok(192),
    JweAlgorithm::A256GCMKW => Ok(256),
    _ => Err(Error::UnsupportedAlgorithm(alg.to_string())),
  }
}

fn kw_bits(alg: JweAlgorithm) -> Result<usize> {
  match alg {
    JweAlgorithm::A128KW | JweAlgorithm::ECDH_ES_A128KW => Ok(128),
    JweAlgorithm::A192KW | JweAlgorithm::ECDH_ES_A192KW => Ok(192),
    JweAlgorithm::A256KW | JweAlgorithm::ECDH_ES_A256KW => Ok(256),
    _ => Err(Error::UnsupportedAlgorithm(alg.to_string())),
  }
}

fn ephemeral_ec(curve: EcCurve) -> Result<(Jwk, Vec<u8>)> {
  match curve {
    EcCurve::P256 => {
      let secret = p256::SecretKey::random(&mut OsRng);
      let point = secret.public_key().to_encoded_point(false);
      let epk = Jwk::from_ec_point(curve, point.as_bytes(), None)?;
      Ok((epk, secret.to_bytes().to_vec()))
    }
    EcCurve::P384 => {
      let secret = p384::SecretKey::random(&mut OsRng);
      let point = secret.public_key().to_encoded_point(false);
      let epk = Jwk::from_ec_point(curve, point.as_bytes(), None)?;
      Ok((epk, secret.to_bytes().to_vec()))
    }
    EcCurve::P521 => {
      let secret = p521::SecretKey::random(&mut OsRng);
      let point = secret.public_key().to_encoded_point(false);
      let epk = Jwk::from_ec_point(curve, point.as_bytes(), None)?;
      Ok((epk, secret.to_bytes().to_vec()))
    }
    #[cfg(feature = "es256k")]
    EcCurve::Secp256k1 => Err(Error::UnsupportedAlgorithm("secp256k1 ECDH".into())),
  }
}

/// Produce `(cek, encrypted_key)` for `recipient`, mutating `header` with
/// whatever algorithm-specific parameters that key-management step
/// contributes (`epk`, `apu`/`apv`, `p2s`/`p2c`, `iv`/`tag`).
///
/// `shared_cek`, when `Some`, is the content encryption key already chosen
/// for a prior recipient in a multi-recipient JWE; every key-management
/// algorithm honors it except the direct-agreement algorithms, which
/// determine the CEK themselves and are only valid for a single recipient
/// (enforced by the caller).
pub(crate) fn wrap_cek<T>(
  alg: JweAlgorithm,
  encryption: JweEncryption,
  key: &Jwk,
  shared_cek: Option<&[u8]>,
  header: &mut JweHeader<T>,
) -> Result<(Vec<u8>, Vec<u8>)> {
  match alg {
    JweAlgorithm::DIR => {
      let cek = oct_bytes(key)?;
      if cek.len() != encryption.cek_len() {
        return Err(Error::InvalidParameter("direct key has the wrong length for `enc`"));
      }
      Ok((cek, Vec::new()))
    }
    JweAlgorithm::ECDH_ES => {
      let curve = key.try_ec_curve()?;
      let (epk, eph_secret) = ephemeral_ec(curve)?;
      header.set_epk(epk);
      let apu = header.apu()?.unwrap_or_default();
      let apv = header.apv()?.unwrap_or_default();
      let z = ec::diffie_hellman(curve, &key.to_ec_public_sec1()?, &eph_secret)?;
      let cek = concat_kdf::derive(&z, encryption.name().as_bytes(), &apu, &apv, (encryption.cek_len() * 8) as u32)?;
      Ok((cek, Vec::new()))
    }
    JweAlgorithm::ECDH_ES_A128KW | JweAlgorithm::ECDH_ES_A192KW | JweAlgorithm::ECDH_ES_A256KW => {
      let curve = key.try_ec_curve()?;
      let (epk, eph_secret) = ephemeral_ec(curve)?;
      header.set_epk(epk);
      let apu = header.apu()?.unwrap_or_default();
      let apv = header.apv()?.unwrap_or_default();
      let z = ec::diffie_hellman(curve, &key.to_ec_public_sec1()?, &eph_secret)?;
      let bits = kw_bits(alg)?;
      let kek = concat_kdf::derive(&z, alg.name().as_bytes(), &apu, &apv, bits as u32)?;
      let cek = shared_cek.map(Vec::from).unwrap_or_else(|| generate_cek(encryption));
      let encrypted_key = aes_kw::wrap(bits, &kek, &cek)?;
      Ok((cek, encrypted_key))
    }
    JweAlgorithm::A128KW | JweAlgorithm::A192KW | JweAlgorithm::A256KW => {
      let bits = kw_bits(alg)?;
      let kek = oct_bytes(key)?;
      let cek = shared_cek.map(Vec::from).unwrap_or_else(|| generate_cek(encryption));
      let encrypted_key = aes_kw::wrap(bits, &kek, &cek)?;
      Ok((cek, encrypted_key))
    }
    JweAlgorithm::A128GCMKW | JweAlgorithm::A192GCMKW | JweAlgorithm::A256GCMKW => {
      let bits = gcm_kw_bits(alg)?;
      let kek = oct_bytes(key)?;
      let cek = shared_cek.map(Vec::from).unwrap_or_else(|| generate_cek(encryption));
      let iv = random_bytes(aes_gcm::iv_len());
      let (ciphertext, tag) = aes_gcm::encrypt(bits, &kek, &iv, &[], &cek)?;
      header.set_iv(&iv);
      header.set_tag(&tag);
      Ok((cek, ciphertext))
    }
    JweAlgorithm::RSA1_5 | JweAlgorithm::RSA_OAEP | JweAlgorithm::RSA_OAEP_256 => {
      let public_key = key.to_rsa_public()?;
      let cek = shared_cek.map(Vec::from).unwrap_or_else(|| generate_cek(encryption));
      let encrypted_key = match alg {
        JweAlgorithm::RSA1_5 => rsa::pkcs1v15_encrypt(&public_key, &cek, &mut OsRng)?,
        JweAlgorithm::RSA_OAEP => rsa::oaep_encrypt(false, &public_key, &cek, &mut OsRng)?,
        JweAlgorithm::RSA_OAEP_256 => rsa::oaep_encrypt(true, &public_key, &cek, &mut OsRng)?,
        _ => unreachable!(),
      };
      Ok((cek, encrypted_key))
    }
    JweAlgorithm::RSA_OAEP_384 | JweAlgorithm::RSA_OAEP_512 => {
      Err(Error::UnsupportedAlgorithm(alg.to_string()))
    }
    JweAlgorithm::PBES2_HS256_A128KW | JweAlgorithm::PBES2_HS384_A192KW | JweAlgorithm::PBES2_HS512_A256KW => {
      let (hash_bits, bits) = pbes2_params(alg)?;
      let password = oct_bytes(key)?;
      let salt = random_bytes(16);
      let iterations: u32 = 210_000;
      header.set_p2s(&salt);
      header.set_p2c(iterations);
      let full_salt = pbes2::salt(alg.name(), &salt);
      let kek = pbes2::derive(hash_bits, &password, &full_salt, iterations, bits / 8)?;
      let cek = shared_cek.map(Vec::from).unwrap_or_else(|| generate_cek(encryption));
      let encrypted_key = aes_kw::wrap(bits, &kek, &cek)?;
      Ok((cek, encrypted_key))
    }
    JweAlgorithm::ECDH_ES_C20PKW | JweAlgorithm::ECDH_ES_XC20PKW => {
      Err(Error::UnsupportedAlgorithm(alg.to_string()))
    }
  }
}
