// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use libjose::error::Error;
use libjose::jwk::Jwk;
use libjose::jws::Decoder;
use libjose::jws::Encoder;
use libjose::jws::JwsAlgorithm;
use libjose::jws::JwsAlgorithm::*;
use libjose::jws::JwsFormat;
use libjose::jws::JwsHeader;

const __RSA: bool = cfg!(not(feature = "test-rsa-sig"));

const CLAIMS: &[u8] = b"libjose";

fn roundtrip(algorithm: JwsAlgorithm) -> Result<(), Box<dyn std::error::Error>> {
  let header: JwsHeader = JwsHeader::new(algorithm);
  let secret: Jwk = Jwk::random(algorithm)?;
  let public: Jwk = secret.to_public();

  let encoded: String = Encoder::new(CLAIMS).recipient(&secret, header.clone()).encode()?;
  let decoded = Decoder::new(&public).decode(encoded.as_bytes())?;

  assert_eq!(decoded.protected.unwrap(), header);
  assert_eq!(decoded.claims, CLAIMS);

  let encoded = Encoder::new(CLAIMS)
    .format(JwsFormat::General)
    .recipient(&secret, header.clone())
    .encode_json()?;
  let decoded = Decoder::new(&public)
    .format(JwsFormat::General)
    .decode(encoded.to_string().as_bytes())?;

  assert_eq!(decoded.protected.unwrap(), header);
  assert_eq!(decoded.claims, CLAIMS);

  let encoded = Encoder::new(CLAIMS)
    .format(JwsFormat::Flatten)
    .recipient(&secret, header.clone())
    .encode_json()?;
  let decoded = Decoder::new(&public)
    .format(JwsFormat::Flatten)
    .decode(encoded.to_string().as_bytes())?;

  assert_eq!(decoded.protected.unwrap(), header);
  assert_eq!(decoded.claims, CLAIMS);

  Ok(())
}

#[test]
fn test_jws_roundtrip() {
  for alg in JwsAlgorithm::ALL {
    // not a verifiable signature scheme
    if matches!(alg, NONE) {
      continue;
    }

    // skip unless opted-in - rsa generation is SLOWWWW
    if __RSA && matches!(alg, RS256 | RS384 | RS512 | PS256 | PS384 | PS512) {
      continue;
    }

    roundtrip(*alg).unwrap();
  }
}

#[test]
fn test_jws_detached_payload() {
  let header: JwsHeader = JwsHeader::new(HS256);
  let key: Jwk = Jwk::random(HS256).unwrap();

  let encoded: String = Encoder::new(CLAIMS).detached(true).recipient(&key, header).encode().unwrap();

  let mut parts = encoded.split('.');
  let protected = parts.next().unwrap();
  let payload = parts.next().unwrap();
  let signature = parts.next().unwrap();
  assert!(payload.is_empty());

  let decoded = Decoder::new(&key)
    .detached_payload(CLAIMS)
    .decode(format!("{}.{}.{}", protected, payload, signature).as_bytes())
    .unwrap();

  assert_eq!(decoded.claims, CLAIMS);
}

#[test]
fn test_jws_general_multi_signature() {
  let hs_header: JwsHeader = JwsHeader::new(HS256);
  let hs_key: Jwk = Jwk::random(HS256).unwrap();

  let ed_header: JwsHeader = JwsHeader::new(EdDSA);
  let ed_key: Jwk = Jwk::random(EdDSA).unwrap();
  let ed_public: Jwk = ed_key.to_public();

  let encoded = Encoder::new(CLAIMS)
    .format(JwsFormat::General)
    .recipient(&hs_key, hs_header)
    .recipient(&ed_key, ed_header)
    .encode_json()
    .unwrap();

  let decoded = Decoder::new(&hs_key)
    .format(JwsFormat::General)
    .decode(encoded.to_string().as_bytes())
    .unwrap();
  assert_eq!(decoded.claims, CLAIMS);
  assert_eq!(decoded.protected.unwrap().alg(), HS256);

  let decoded = Decoder::new(&ed_public)
    .format(JwsFormat::General)
    .decode(encoded.to_string().as_bytes())
    .unwrap();
  assert_eq!(decoded.claims, CLAIMS);
  assert_eq!(decoded.protected.unwrap().alg(), EdDSA);
}

#[test]
fn test_jws_rejects_none_by_default() {
  let header: JwsHeader = JwsHeader::new(NONE);
  let key: Jwk = Jwk::random(HS256).unwrap();

  let encoded: String = Encoder::new(CLAIMS).recipient(&key, header).encode().unwrap();

  let err = Decoder::new(&key).decode(encoded.as_bytes()).unwrap_err();
  assert!(matches!(err, Error::UnsupportedAlgorithm(_)));

  let decoded = Decoder::new(&key).allow_none(true).decode(encoded.as_bytes()).unwrap();
  assert_eq!(decoded.claims, CLAIMS);
}

#[test]
fn test_jws_algorithm_confusion_rejected() {
  let header: JwsHeader = JwsHeader::new(HS256);
  let key: Jwk = Jwk::random(HS256).unwrap();

  let encoded: String = Encoder::new(CLAIMS).recipient(&key, header).encode().unwrap();

  let err = Decoder::new(&key)
    .allow_algs(vec![JwsAlgorithm::ES256])
    .decode(encoded.as_bytes())
    .unwrap_err();

  assert!(matches!(err, Error::UnsupportedAlgorithm(_)));
}

#[test]
fn test_jws_wrong_key_fails_verification() {
  let header: JwsHeader = JwsHeader::new(HS256);
  let key: Jwk = Jwk::random(HS256).unwrap();
  let other: Jwk = Jwk::random(HS256).unwrap();

  let encoded: String = Encoder::new(CLAIMS).recipient(&key, header).encode().unwrap();

  assert!(Decoder::new(&other).decode(encoded.as_bytes()).is_err());
}

#[test]
fn test_jws_keyset_lookup_by_kid() {
  use libjose::jwk::JwkSet;

  let mut set = JwkSet::new();

  let mut key_a: Jwk = Jwk::random(HS256).unwrap();
  key_a.set_kid("a");
  let mut key_b: Jwk = Jwk::random(HS256).unwrap();
  key_b.set_kid("b");

  let mut header = JwsHeader::new(HS256);
  header.set_kid("b");
  let encoded: String = Encoder::new(CLAIMS).recipient(&key_b, header).encode().unwrap();

  set.push(key_a);
  set.push(key_b);

  let decoded = Decoder::new_with_set(&set).decode(encoded.as_bytes()).unwrap();
  assert_eq!(decoded.claims, CLAIMS);
}
