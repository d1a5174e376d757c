// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use libjose::jwk::digest::SHA2_256;
use libjose::jwk::EcCurve;
use libjose::jwk::EdCurve;
use libjose::jwk::Jwk;
use libjose::jwk::JwkSet;
use libjose::jwk::JwkType;
use libjose::jws::JwsAlgorithm;

#[test]
fn test_jwk_random_rsa_public_private() {
  if cfg!(not(feature = "test-rsa-sig")) {
    return;
  }

  let key: Jwk = Jwk::random(JwsAlgorithm::RS256).unwrap();
  assert_eq!(key.kty(), JwkType::Rsa);
  assert!(key.is_private());

  let public = key.to_public();
  assert!(public.is_public());
  assert!(public.try_rsa_params().unwrap().d.is_none());
  assert_eq!(key.try_rsa_params().unwrap().n, public.try_rsa_params().unwrap().n);
}

#[test]
fn test_jwk_random_ec_public_private() {
  let key: Jwk = Jwk::random(JwsAlgorithm::ES256).unwrap();
  assert_eq!(key.kty(), JwkType::Ec);
  assert_eq!(key.try_ec_curve().unwrap(), EcCurve::P256);
  assert!(key.is_private());

  let public = key.to_public();
  assert!(public.is_public());
  assert_eq!(key.try_ec_params().unwrap().x, public.try_ec_params().unwrap().x);
  assert_eq!(key.try_ec_params().unwrap().y, public.try_ec_params().unwrap().y);
}

#[test]
fn test_jwk_random_ed25519_public_private() {
  let key: Jwk = Jwk::random(JwsAlgorithm::EdDSA).unwrap();
  assert_eq!(key.kty(), JwkType::Okp);
  assert_eq!(key.try_ed_curve().unwrap(), EdCurve::Ed25519);

  let public = key.to_public();
  assert!(public.is_public());
  assert_eq!(key.try_okp_params().unwrap().x, public.try_okp_params().unwrap().x);
}

#[test]
fn test_jwk_from_ec_point_rejects_bad_width() {
  let bad_point = vec![0x04; 10];
  assert!(Jwk::from_ec_point(EcCurve::P256, &bad_point, None).is_err());
}

#[test]
fn test_jwk_oct_roundtrip() {
  let secret = b"a 32 byte octet sequence, here!";
  let key = Jwk::from_oct_secret(secret);
  assert_eq!(key.to_oct_secret().unwrap(), secret);
}

#[test]
fn test_jwk_extra_member_roundtrip() {
  let mut key = Jwk::from_oct_secret(b"secret");
  key.set_extra("x-custom", serde_json::json!("value"));

  let serialized = serde_json::to_string(&key).unwrap();
  let parsed: Jwk = serde_json::from_str(&serialized).unwrap();

  assert_eq!(parsed.get_extra("x-custom"), Some(serde_json::json!("value")));
}

#[test]
fn test_jwk_thumbprint_rfc7638() {
  // RFC 7638 Appendix A.
  let json = r#"{
    "kty":"RSA",
    "n":"0vx7agoebGcQSuuPiLJXZptN9nndrQmbXEps2aiAFbWhM78LhWx4cbbfAAtVT86zwu1RK7aPFFxuhDR1L6tSoc_BJECPebWKRXjBZCiFV4n3oknjhMstn64tZ_2W-5JsGY4Hc5n9yBXArwl93lqt7_RN5w6Cf0h4QyQ5v-65YGjQR0_FDW2QvzqY368QQMicAtaSqzs8KJZgnYb9c7d0zgdAZHzu6qMQvRL5hajrn1n91CbOpbISD08qNLyrdkt-bFTWhAI4vMQFh6WeZu0fM4lFd2NcRwr3XPksINHaQ-G_xBniIqbw0Ls1jF44-csFCur-kEgU8awapJzKnqDKgw",
    "e":"AQAB",
    "alg":"RS256",
    "kid":"2011-04-29"
  }"#;

  let key: Jwk = serde_json::from_str(json).unwrap();
  let thumbprint = key.thumbprint_b64::<SHA2_256>().unwrap();

  assert_eq!(thumbprint, "NzbLsXh8uDCcd-6MNwXF4W_7noWXFZAfHkxZsRGC9Xs");
}

#[test]
fn test_jwkset_parses_bare_key_as_singleton() {
  let key = Jwk::from_oct_secret(b"secret");
  let serialized = serde_json::to_string(&key).unwrap();

  let set: JwkSet = serde_json::from_str(&serialized).unwrap();
  assert_eq!(set.len(), 1);
}

#[test]
fn test_jwkset_lookup_and_removal() {
  let mut set = JwkSet::new();

  let mut a = Jwk::from_oct_secret(b"key-a");
  a.set_kid("a");
  let mut b = Jwk::from_oct_secret(b"key-b");
  b.set_kid("b");

  set.push(a);
  set.push(b);

  assert_eq!(set.len(), 2);
  assert!(set.get_kid("a").is_some());
  assert!(set.get_kid("missing").is_none());

  set.remove(0);
  assert_eq!(set.len(), 1);
  assert!(set.get_kid("a").is_none());
  assert!(set.get_kid("b").is_some());
}
