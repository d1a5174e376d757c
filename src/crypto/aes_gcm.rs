// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! AES-GCM content encryption, RFC 7518 §5.3 (`A128GCM`/`A192GCM`/`A256GCM`)
//! and AES-GCM key-wrapping, RFC 7518 §4.7 (`A*GCMKW`).

use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::Aead;
use aes_gcm::aead::NewAead;
use aes_gcm::aead::Payload;
use aes_gcm::Aes128Gcm;
use aes_gcm::Aes256Gcm;

use crate::error::Error;
use crate::error::Result;

pub const fn cek_len(bits: usize) -> usize {
  match bits {
    128 => 16,
    192 => 24,
    256 => 32,
    _ => 0,
  }
}

pub const fn iv_len() -> usize {
  12
}

pub const fn tag_len() -> usize {
  16
}

/// Returns `(ciphertext, tag)` with the tag as the trailing 16 bytes split
/// off from the AEAD output.
pub fn encrypt(bits: usize, key: &[u8], iv: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
  if key.len() != cek_len(bits) {
    return Err(Error::InvalidParameter("content encryption key has the wrong length"));
  }

  let payload = Payload { msg: plaintext, aad };
  let nonce = GenericArray::from_slice(iv);

  let mut sealed = match bits {
    128 => {
      let cipher = Aes128Gcm::new(GenericArray::from_slice(key));
      cipher.encrypt(nonce, payload).map_err(|_| "AES-GCM encrypt")?
    }
    192 => return Err(Error::UnsupportedAlgorithm("A192GCM".into())),
    256 => {
      let cipher = Aes256Gcm::new(GenericArray::from_slice(key));
      cipher.encrypt(nonce, payload).map_err(|_| "AES-GCM encrypt")?
    }
    _ => return Err(Error::UnsupportedAlgorithm(format!("A{}GCM", bits))),
  };

  let tag = sealed.split_off(sealed.len() - tag_len());
  Ok((sealed, tag))
}

pub fn decrypt(bits: usize, key: &[u8], iv: &[u8], aad: &[u8], ciphertext: &[u8], tag: &[u8]) -> Result<Vec<u8>> {
  if key.len() != cek_len(bits) {
    return Err(Error::InvalidParameter("content encryption key has the wrong length"));
  }

  let mut sealed = Vec::with_capacity(ciphertext.len() + tag.len());
  sealed.extend_from_slice(ciphertext);
  sealed.extend_from_slice(tag);

  let payload = Payload { msg: &sealed, aad };
  let nonce = GenericArray::from_slice(iv);

  match bits {
    128 => {
      let cipher = Aes128Gcm::new(GenericArray::from_slice(key));
      cipher.decrypt(nonce, payload).map_err(|_| Error::DecryptionFailure)
    }
    192 => Err(Error::UnsupportedAlgorithm("A192GCM".into())),
    256 => {
      let cipher = Aes256Gcm::new(GenericArray::from_slice(key));
      cipher.decrypt(nonce, payload).map_err(|_| Error::DecryptionFailure)
    }
    _ => Err(Error::UnsupportedAlgorithm(format!("A{}GCM", bits))),
  }
}
