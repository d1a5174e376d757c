// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::crypto::aes_gcm;
use crate::crypto::aes_kw;
use crate::crypto::concat_kdf;
use crate::crypto::ec;
use crate::crypto::pbes2;
use crate::crypto::rsa;
use crate::error::Error;
use crate::error::Result;
use crate::jwe::encoder::wrap_cek;
use crate::jwe::JweAlgorithm;
use crate::jwe::JweCompression;
use crate::jwe::JweFormat;
use crate::jwe::JweHeader;
use crate::jwe::Token;
use crate::jwk::Jwk;
use crate::jwk::JwkSet;
use crate::utils::decode_b64;
use crate::utils::from_json_slice;
use crate::utils::Empty;

enum KeySource<'a> {
  Single(&'a Jwk),
  Set(&'a JwkSet),
}

/// Decrypts a JWE, per spec.md §4.5 "Decrypt". Configured with a key (or a
/// [`JwkSet`] to pick from by `kid`) and, optionally, the AAD supplied
/// alongside a detached-AAD JWE.
pub struct Decoder<'a, T = Empty> {
  keys: KeySource<'a>,
  format: JweFormat,
  aad: Option<&'a [u8]>,
  _marker: core::marker::PhantomData<T>,
}

impl<'a, T: Clone + DeserializeOwned> Decoder<'a, T> {
  pub fn new(key: &'a Jwk) -> Self {
    Self {
      keys: KeySource::Single(key),
      format: JweFormat::Compact,
      aad: None,
      _marker: core::marker::PhantomData,
    }
  }

  pub fn new_with_set(keys: &'a JwkSet) -> Self {
    Self {
      keys: KeySource::Set(keys),
      format: JweFormat::Compact,
      aad: None,
      _marker: core::marker::PhantomData,
    }
  }

  pub fn format(mut self, format: JweFormat) -> Self {
    self.format = format;
    self
  }

  pub fn aad(mut self, aad: &'a [u8]) -> Self {
    self.aad = Some(aad);
    self
  }

  pub fn decode(&self, data: &[u8]) -> Result<Token<T>> {
    match self.format {
      JweFormat::Compact => self.decode_compact(data),
      JweFormat::General | JweFormat::Flatten => self.decode_json(data),
    }
  }

  /// The candidate keys to attempt, per spec.md §4.4 "Key-set verification"
  /// (JWE decryption follows the same two strategies as JWS verification):
  /// with an explicit single key there is exactly one candidate; with a
  /// [`JwkSet`] and a `kid` on the header, only keys whose `kid` matches
  /// *and* whose own `alg` (if set) agrees with the header's `alg`; with no
  /// `kid`, every key in the set, tried in set order ("explicit algorithm"
  /// strategy).
  fn candidate_keys(&self, header: &JweHeader<T>) -> Result<Vec<&'a Jwk>> {
    match self.keys {
      KeySource::Single(key) => Ok(vec![key]),
      KeySource::Set(set) => {
        let candidates: Vec<&'a Jwk> = match header.kid() {
          Some(kid) => set
            .iter()
            .filter(|key| {
              key.kid().as_deref() == Some(kid.as_str())
                && key.alg().map_or(true, |alg| Some(alg) == header.alg().map(|alg| alg.to_string()))
            })
            .collect(),
          None => set.iter().collect(),
        };
        if candidates.is_empty() {
          Err(Error::KeyNotFound)
        } else {
          Ok(candidates)
        }
      }
    }
  }

  /// Try every candidate key against `attempt` in set order (spec.md §5
  /// "first success wins"), aggregating per-key failures and surfacing only
  /// the final "no key decrypted" error.
  fn decrypt_with_candidates(
    &self,
    header: &JweHeader<T>,
    mut attempt: impl FnMut(&'a Jwk) -> Result<Vec<u8>>,
  ) -> Result<Vec<u8>> {
    let mut last_error = Error::KeyNotFound;
    for key in self.candidate_keys(header)? {
      match attempt(key) {
        Ok(cek) => return Ok(cek),
        Err(err) => last_error = err,
      }
    }
    Err(last_error)
  }

  fn decode_compact(&self, data: &[u8]) -> Result<Token<T>> {
    let text = core::str::from_utf8(data).map_err(|_| Error::InvalidContent("JWE must be UTF-8"))?;
    let mut parts = text.split('.');
    let protected_b64 = parts.next().ok_or(Error::InvalidContent("missing protected header"))?;
    let encrypted_key_b64 = parts.next().ok_or(Error::InvalidContent("missing encrypted key"))?;
    let iv_b64 = parts.next().ok_or(Error::InvalidContent("missing iv"))?;
    let ciphertext_b64 = parts.next().ok_or(Error::InvalidContent("missing ciphertext"))?;
    let tag_b64 = parts.next().ok_or(Error::InvalidContent("missing tag"))?;
    if parts.next().is_some() {
      return Err(Error::InvalidContent("too many segments"));
    }

    let protected_bytes = decode_b64(protected_b64)?;
    let protected: JweHeader<T> = from_json_slice(&protected_bytes)?;

    let alg = protected.alg().ok_or(Error::MissingParameter("alg"))?;
    let encryption = protected.enc().ok_or(Error::MissingParameter("enc"))?;

    let encrypted_key = decode_b64(encrypted_key_b64)?;
    let cek = zeroize::Zeroizing::new(self.decrypt_with_candidates(&protected, |key| {
      unwrap_cek(alg, encryption, key, &encrypted_key, &protected)
    })?);

    let iv = decode_b64(iv_b64)?;
    let ciphertext = decode_b64(ciphertext_b64)?;
    let tag = decode_b64(tag_b64)?;

    let aad_input = build_aad(protected_b64, self.aad);
    let body = encryption.decrypt(&cek, &iv, &aad_input, &ciphertext, &tag)?;
    let plaintext = decompress(protected.zip(), body)?;

    Ok(Token {
      protected: Some(protected),
      unprotected: None,
      recipient_header: None,
      plaintext,
    })
  }

  fn decode_json(&self, data: &[u8]) -> Result<Token<T>> {
    let value: Value = serde_json::from_slice(data)?;
    let obj = value.as_object().ok_or(Error::InvalidContent("JWE JSON must be an object"))?;

    let protected_b64 = obj.get("protected").and_then(Value::as_str);
    let protected: Option<JweHeader<T>> = protected_b64
      .map(|b64| from_json_slice(&decode_b64(b64)?))
      .transpose()?;
    let unprotected: Option<JweHeader<T>> = match obj.get("unprotected") {
      Some(value) => Some(serde_json::from_value(value.clone())?),
      None => None,
    };

    let iv = obj.get("iv").and_then(Value::as_str).map(decode_b64).transpose()?;
    let ciphertext = obj
      .get("ciphertext")
      .and_then(Value::as_str)
      .ok_or(Error::InvalidContent("missing ciphertext"))
      .and_then(decode_b64)?;
    let tag = obj
      .get("tag")
      .and_then(Value::as_str)
      .ok_or(Error::InvalidContent("missing tag"))
      .and_then(decode_b64)?;

    let recipient_entries: Vec<&Value> = if let Some(Value::Array(recipients)) = obj.get("recipients") {
      recipients.iter().collect()
    } else {
      vec![&value]
    };

    let mut last_error = Error::InvalidContent("no recipients present");

    for entry in recipient_entries {
      let entry_obj = entry
        .as_object()
        .ok_or(Error::InvalidContent("recipient entry must be an object"))?;

      let recipient_header: Option<JweHeader<T>> = match entry_obj.get("header") {
        Some(header_value) => Some(serde_json::from_value(header_value.clone())?),
        None => None,
      };

      let encrypted_key = match entry_obj.get("encrypted_key").and_then(Value::as_str) {
        Some(b64) => match decode_b64(b64) {
          Ok(bytes) => bytes,
          Err(err) => {
            last_error = err;
            continue;
          }
        },
        None => Vec::new(),
      };

      let merged = merge_headers(protected.as_ref(), unprotected.as_ref(), recipient_header.as_ref());
      let alg = match merged.alg() {
        Some(alg) => alg,
        None => {
          last_error = Error::MissingParameter("alg");
          continue;
        }
      };
      let encryption = match merged.enc() {
        Some(encryption) => encryption,
        None => {
          last_error = Error::MissingParameter("enc");
          continue;
        }
      };

      let cek = match self.decrypt_with_candidates(&merged, |key| {
        unwrap_cek(alg, encryption, key, &encrypted_key, &merged)
      }) {
        Ok(cek) => zeroize::Zeroizing::new(cek),
        Err(err) => {
          last_error = err;
          continue;
        }
      };

      let iv = match &iv {
        Some(iv) => iv.clone(),
        None => {
          last_error = Error::InvalidContent("missing iv");
          continue;
        }
      };

      let aad_input = build_aad(protected_b64.unwrap_or(""), self.aad);

      match encryption
        .decrypt(&cek, &iv, &aad_input, &ciphertext, &tag)
        .and_then(|body| decompress(merged.zip(), body))
      {
        Ok(plaintext) => {
          return Ok(Token {
            protected: protected.clone(),
            unprotected: unprotected.clone(),
            recipient_header,
            plaintext,
          });
        }
        Err(err) => last_error = err,
      }
    }

    Err(last_error)
  }
}

fn merge_headers<T: Clone>(
  protected: Option<&JweHeader<T>>,
  unprotected: Option<&JweHeader<T>>,
  recipient: Option<&JweHeader<T>>,
) -> JweHeader<T> {
  recipient
    .or(unprotected)
    .or(protected)
    .cloned()
    .expect("at least one header must be present")
}

fn build_aad(protected_b64: &str, extra_aad: Option<&[u8]>) -> Vec<u8> {
  match extra_aad {
    Some(aad) if !aad.is_empty() => format!("{}.{}", protected_b64, crate::utils::encode_b64(aad)).into_bytes(),
    _ => protected_b64.as_bytes().to_vec(),
  }
}

fn decompress(zip: Option<&JweCompression>, body: Vec<u8>) -> Result<Vec<u8>> {
  match zip {
    Some(zip) => zip.decompress(&body),
    None => Ok(body),
  }
}

/// The inverse of [`wrap_cek`], recovering the content encryption key from
/// `encrypted_key` and whatever algorithm-specific parameters `header`
/// carries.
fn unwrap_cek<T>(
  alg: JweAlgorithm,
  encryption: crate::jwe::JweEncryption,
  key: &Jwk,
  encrypted_key: &[u8],
  header: &JweHeader<T>,
) -> Result<Vec<u8>> {
  match alg {
    JweAlgorithm::DIR => oct_bytes(key),
    JweAlgorithm::ECDH_ES => {
      let curve = key.try_ec_curve()?;
      let epk = header.epk().ok_or(Error::MissingParameter("epk"))?;
      let apu = header.apu()?.unwrap_or_default();
      let apv = header.apv()?.unwrap_or_default();
      let z = ec::diffie_hellman(curve, &epk.to_ec_public_sec1()?, &key.to_ec_private_scalar()?)?;
      concat_kdf::derive(&z, encryption.name().as_bytes(), &apu, &apv, (encryption.cek_len() * 8) as u32)
    }
    JweAlgorithm::ECDH_ES_A128KW | JweAlgorithm::ECDH_ES_A192KW | JweAlgorithm::ECDH_ES_A256KW => {
      let curve = key.try_ec_curve()?;
      let epk = header.epk().ok_or(Error::MissingParameter("epk"))?;
      let apu = header.apu()?.unwrap_or_default();
      let apv = header.apv()?.unwrap_or_default();
      let z = ec::diffie_hellman(curve, &epk.to_ec_public_sec1()?, &key.to_ec_private_scalar()?)?;
      let bits = kw_bits(alg)?;
      let kek = concat_kdf::derive(&z, alg.name().as_bytes(), &apu, &apv, bits as u32)?;
      aes_kw::unwrap(bits, &kek, encrypted_key)
    }
    JweAlgorithm::A128KW | JweAlgorithm::A192KW | JweAlgorithm::A256KW => {
      let bits = kw_bits(alg)?;
      aes_kw::unwrap(bits, &oct_bytes(key)?, encrypted_key)
    }
    JweAlgorithm::A128GCMKW | JweAlgorithm::A192GCMKW | JweAlgorithm::A256GCMKW => {
      let bits = gcm_kw_bits(alg)?;
      let iv = header.iv()?.ok_or(Error::MissingParameter("iv"))?;
      let tag = header.tag()?.ok_or(Error::MissingParameter("tag"))?;
      aes_gcm::decrypt(bits, &oct_bytes(key)?, &iv, &[], encrypted_key, &tag)
    }
    JweAlgorithm::RSA1_5 => rsa::pkcs1v15_decrypt(&key.to_rsa_private()?, encrypted_key),
    JweAlgorithm::RSA_OAEP => rsa::oaep_decrypt(false, &key.to_rsa_private()?, encrypted_key),
    JweAlgorithm::RSA_OAEP_256 => rsa::oaep_decrypt(true, &key.to_rsa_private()?, encrypted_key),
    JweAlgorithm::RSA_OAEP_384 | JweAlgorithm::RSA_OAEP_512 => Err(Error::UnsupportedAlgorithm(alg.to_string())),
    JweAlgorithm::PBES2_HS256_A128KW | JweAlgorithm::PBES2_HS384_A192KW | JweAlgorithm::PBES2_HS512_A256KW => {
      let (hash_bits, bits) = pbes2_params(alg)?;
      let p2s = header.p2s()?.ok_or(Error::MissingParameter("p2s"))?;
      let p2c = header.p2c().ok_or(Error::MissingParameter("p2c"))?;
      let full_salt = pbes2::salt(alg.name(), &p2s);
      let kek = pbes2::derive(hash_bits, &oct_bytes(key)?, &full_salt, p2c, bits / 8)?;
      aes_kw::unwrap(bits, &kek, encrypted_key)
    }
    JweAlgorithm::ECDH_ES_C20PKW | JweAlgorithm::ECDH_ES_XC20PKW => Err(Error::UnsupportedAlgorithm(alg.to_string())),
  }
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
