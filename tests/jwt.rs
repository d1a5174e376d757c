// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use libjose::jwe::JweAlgorithm;
use libjose::jwe::JweEncryption;
use libjose::jwk::Jwk;
use libjose::jws::JwsAlgorithm;
use libjose::jws::JwsHeader;
use libjose::jwt::JwtClaims;
use libjose::jwt::JwtClaimsBuilder;
use libjose::jwt::ParseOptions;
use libjose::jwt::Validator;

#[test]
fn test_jwt_claims_getset() {
  let mut claims: JwtClaims = JwtClaims::new();

  assert!(claims.iss().is_none());
  claims.set_iss("issuer");
  assert_eq!(claims.iss().map(String::as_str), Some("issuer"));

  assert!(claims.sub().is_none());
  claims.set_sub("subject");
  assert_eq!(claims.sub().map(String::as_str), Some("subject"));

  assert!(claims.aud().is_none());
  claims.set_aud(vec!["aud-a", "aud-b"]);
  assert_eq!(claims.aud(), Some(["aud-a".to_string(), "aud-b".to_string()].as_slice()));

  assert!(claims.exp().is_none());
  claims.set_exp(1_000);
  assert_eq!(claims.exp(), Some(1_000));

  assert!(claims.iat().is_none());
  claims.set_iat(500);
  assert_eq!(claims.iat(), Some(500));

  assert!(claims.nbf().is_none());
  claims.set_nbf(500);
  assert_eq!(claims.nbf(), Some(500));

  assert!(claims.jti().is_none());
  claims.set_jti("token-id");
  assert_eq!(claims.jti().map(String::as_str), Some("token-id"));
}

#[test]
fn test_jwt_builder() {
  let claims: JwtClaims = JwtClaimsBuilder::new()
    .iss("issuer")
    .sub("subject")
    .aud(vec!["aud"])
    .exp(2_000)
    .iat(1_000)
    .jti("token-id")
    .build();

  assert_eq!(claims.iss().map(String::as_str), Some("issuer"));
  assert_eq!(claims.exp(), Some(2_000));
}

#[test]
fn test_jwt_aud_flattens_single_element() {
  let claims: JwtClaims = JwtClaimsBuilder::new().aud(vec!["only"]).flatten_audience(true).build();

  let value = serde_json::to_value(&claims).unwrap();
  assert_eq!(value["aud"], serde_json::json!("only"));

  let claims: JwtClaims = JwtClaimsBuilder::new().aud(vec!["only"]).flatten_audience(false).build();
  let value = serde_json::to_value(&claims).unwrap();
  assert_eq!(value["aud"], serde_json::json!(["only"]));
}

#[test]
fn test_jwt_sign_and_parse_roundtrip() {
  let key: Jwk = Jwk::random(JwsAlgorithm::HS256).unwrap();

  let claims: JwtClaims = JwtClaimsBuilder::new()
    .iss("https://issuer.example")
    .sub("user-42")
    .exp(2_000_000_000)
    .iat(1_000_000_000)
    .build();

  let signed = claims.sign(&key, JwsHeader::new(JwsAlgorithm::HS256)).unwrap();

  let options: ParseOptions = ParseOptions::new()
    .verify_with(&key)
    .validator(Validator::new().iss("https://issuer.example").clock(1_500_000_000).exp(true));

  let parsed: JwtClaims = libjose::jwt::parse(signed.as_bytes(), &options).unwrap();
  assert_eq!(parsed.sub().map(String::as_str), Some("user-42"));
}

#[test]
fn test_jwt_validator_rejects_expired() {
  let claims: JwtClaims = JwtClaimsBuilder::new().exp(1_000).build();
  let validator: Validator = Validator::new().exp(true).clock(2_000);
  assert!(validator.validate(&claims).is_err());

  let validator: Validator = Validator::new().exp(true).clock(500);
  assert!(validator.validate(&claims).is_ok());
}

#[test]
fn test_jwt_validator_rejects_issuer_mismatch() {
  let claims: JwtClaims = JwtClaimsBuilder::new().iss("https://a.example").build();

  let validator: Validator = Validator::new().iss("https://b.example");
  assert!(validator.validate(&claims).is_err());

  let validator: Validator = Validator::new().iss("https://a.example");
  assert!(validator.validate(&claims).is_ok());
}

#[test]
fn test_jwt_validator_not_yet_valid() {
  let claims: JwtClaims = JwtClaimsBuilder::new().nbf(1_000).build();

  let validator: Validator = Validator::new().nbf(true).clock(500);
  assert!(validator.validate(&claims).is_err());

  let validator: Validator = Validator::new().nbf(true).clock(1_500);
  assert!(validator.validate(&claims).is_ok());
}

#[test]
fn test_jwt_parse_rejects_none_unless_allowed() {
  let key: Jwk = Jwk::random(JwsAlgorithm::HS256).unwrap();
  let claims: JwtClaims = JwtClaimsBuilder::new().iss("nobody").build();

  let signed = claims.sign(&key, JwsHeader::new(JwsAlgorithm::NONE)).unwrap();

  let options: ParseOptions = ParseOptions::new().verify_with(&key);
  assert!(libjose::jwt::parse::<libjose::utils::Empty>(signed.as_bytes(), &options).is_err());

  let options: ParseOptions = ParseOptions::new().verify_with(&key).allow_none(true);
  let parsed: JwtClaims = libjose::jwt::parse(signed.as_bytes(), &options).unwrap();
  assert_eq!(parsed.iss().map(String::as_str), Some("nobody"));
}

#[test]
fn test_jwt_encrypted_roundtrip() {
  let sig_key: Jwk = Jwk::random(JwsAlgorithm::HS256).unwrap();
  let enc_key: Jwk = Jwk::random((JweAlgorithm::DIR, JweEncryption::A256GCM)).unwrap();

  let claims: JwtClaims = JwtClaimsBuilder::new().sub("nested").build();

  let signed = claims.sign(&sig_key, JwsHeader::new(JwsAlgorithm::HS256)).unwrap();
  let encrypted = libjose::jwe::Encoder::<libjose::utils::Empty>::new(JweEncryption::A256GCM)
    .recipient(&enc_key, JweAlgorithm::DIR)
    .encrypt(signed.as_bytes())
    .unwrap();

  let options: ParseOptions = ParseOptions::new().decrypt_with(&enc_key).verify_with(&sig_key);
  let parsed: JwtClaims = libjose::jwt::parse(encrypted.as_bytes(), &options).unwrap();
  assert_eq!(parsed.sub().map(String::as_str), Some("nested"));
}
