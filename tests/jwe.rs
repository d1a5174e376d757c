// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use libjose::jwe::Decoder;
use libjose::jwe::Encoder;
use libjose::jwe::JweAlgorithm;
use libjose::jwe::JweAlgorithm::*;
use libjose::jwe::JweCompression;
use libjose::jwe::JweEncryption;
use libjose::jwe::JweEncryption::*;
use libjose::jwe::JweFormat;
use libjose::jwk::Jwk;

const __RSA: bool = cfg!(not(feature = "test-rsa-enc"));

const PLAINTEXT: &[u8] = b"The true sign of intelligence is not knowledge but imagination.";

fn roundtrip(algorithm: JweAlgorithm, encryption: JweEncryption) {
  let key: Jwk = Jwk::random((algorithm, encryption)).unwrap();
  let recipient_key = if algorithm.key_type() == libjose::jwk::JwkType::Rsa || algorithm.is_ecdh() {
    key.to_public()
  } else {
    key.clone()
  };

  let encoded: String = Encoder::new(encryption)
    .recipient(&recipient_key, algorithm)
    .encrypt(PLAINTEXT)
    .unwrap();

  let decoded = Decoder::new(&key).decode(encoded.as_bytes()).unwrap();
  assert_eq!(decoded.plaintext, PLAINTEXT);
}

#[test]
fn test_jwe_roundtrip() {
  for alg in JweAlgorithm::ALL {
    if matches!(alg, RSA_OAEP_384 | RSA_OAEP_512 | ECDH_ES_C20PKW | ECDH_ES_XC20PKW) {
      continue;
    }
    if __RSA && matches!(alg, RSA1_5 | RSA_OAEP | RSA_OAEP_256) {
      continue;
    }

    roundtrip(*alg, A256GCM);
  }
}

#[test]
fn test_jwe_all_content_encryptions() {
  for enc in JweEncryption::ALL {
    if matches!(enc, C20P | XC20P) {
      continue;
    }

    let key: Jwk = Jwk::random((DIR, *enc)).unwrap();
    let encoded: String = Encoder::new(*enc).recipient(&key, DIR).encrypt(PLAINTEXT).unwrap();
    let decoded = Decoder::new(&key).decode(encoded.as_bytes()).unwrap();
    assert_eq!(decoded.plaintext, PLAINTEXT);
  }
}

#[test]
fn test_jwe_compression() {
  let key: Jwk = Jwk::random((A128KW, A128GCM)).unwrap();
  let repeated = vec![b'a'; 256];

  let encoded: String = Encoder::new(A128GCM)
    .compression(JweCompression::Deflate)
    .recipient(&key, A128KW)
    .encrypt(&repeated)
    .unwrap();

  let decoded = Decoder::new(&key).decode(encoded.as_bytes()).unwrap();
  assert_eq!(decoded.plaintext, repeated);
}

#[test]
fn test_jwe_aad_mismatch_fails() {
  let key: Jwk = Jwk::random((DIR, A256GCM)).unwrap();

  let encoded: String = Encoder::new(A256GCM)
    .aad(b"context-a".to_vec())
    .recipient(&key, DIR)
    .encrypt(PLAINTEXT)
    .unwrap();

  assert!(Decoder::new(&key).aad(b"context-a").decode(encoded.as_bytes()).is_ok());
  assert!(Decoder::new(&key).aad(b"context-b").decode(encoded.as_bytes()).is_err());
  assert!(Decoder::new(&key).decode(encoded.as_bytes()).is_err());
}

#[test]
fn test_jwe_general_multi_recipient_shared_cek() {
  let key_a: Jwk = Jwk::random((A128KW, A128GCM)).unwrap();
  let key_b: Jwk = Jwk::random((A256KW, A128GCM)).unwrap();

  let encoded = Encoder::new(A128GCM)
    .format(JweFormat::General)
    .recipient(&key_a, A128KW)
    .recipient(&key_b, A256KW)
    .encrypt_json(PLAINTEXT)
    .unwrap();

  let decoded = Decoder::new(&key_a)
    .format(JweFormat::General)
    .decode(encoded.to_string().as_bytes())
    .unwrap();
  assert_eq!(decoded.plaintext, PLAINTEXT);

  let decoded = Decoder::new(&key_b)
    .format(JweFormat::General)
    .decode(encoded.to_string().as_bytes())
    .unwrap();
  assert_eq!(decoded.plaintext, PLAINTEXT);
}

#[test]
fn test_jwe_ecdh_es_direct_agreement() {
  let bob: Jwk = Jwk::random((ECDH_ES, A256GCM)).unwrap();
  let bob_public: Jwk = bob.to_public();

  let encoded: String = Encoder::new(A256GCM)
    .recipient(&bob_public, ECDH_ES)
    .encrypt(PLAINTEXT)
    .unwrap();

  let decoded = Decoder::new(&bob).decode(encoded.as_bytes()).unwrap();
  assert_eq!(decoded.plaintext, PLAINTEXT);
}

#[test]
fn test_jwe_pbes2_passphrase() {
  let password: Jwk = Jwk::from_oct_secret(b"correct horse battery staple");

  let encoded: String = Encoder::new(A128GCM)
    .recipient(&password, PBES2_HS256_A128KW)
    .encrypt(PLAINTEXT)
    .unwrap();

  let decoded = Decoder::new(&password).decode(encoded.as_bytes()).unwrap();
  assert_eq!(decoded.plaintext, PLAINTEXT);

  let wrong: Jwk = Jwk::from_oct_secret(b"wrong password");
  assert!(Decoder::new(&wrong).decode(encoded.as_bytes()).is_err());
}

#[test]
fn test_jwe_wrong_key_fails_decryption() {
  let key: Jwk = Jwk::random((A128KW, A128GCM)).unwrap();
  let other: Jwk = Jwk::random((A128KW, A128GCM)).unwrap();

  let encoded: String = Encoder::new(A128GCM).recipient(&key, A128KW).encrypt(PLAINTEXT).unwrap();

  assert!(Decoder::new(&other).decode(encoded.as_bytes()).is_err());
}
