// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use url::Url;

use libjose::jwe::JweAlgorithm;
use libjose::jwe::JweEncryption;
use libjose::jwe::JweHeader;
use libjose::jwk::Jwk;
use libjose::jwk::JwkOperation;
use libjose::jwk::JwkUse;
use libjose::jws::JwsAlgorithm;
use libjose::jws::JwsHeader;

#[test]
fn test_getset_jwk() {
  let mut key = Jwk::from_oct_secret(b"secret");

  assert!(key.use_().is_none());
  key.set_use(JwkUse::Signature);
  assert_eq!(key.use_(), Some(JwkUse::Signature));

  assert!(key.key_ops().is_none());
  key.set_key_ops(vec![JwkOperation::Sign, JwkOperation::Verify]);
  assert_eq!(key.key_ops(), Some(vec![JwkOperation::Sign, JwkOperation::Verify]));

  assert!(key.alg().is_none());
  key.set_alg("HS256");
  assert_eq!(key.alg().as_deref(), Some("HS256"));

  assert!(key.kid().is_none());
  key.set_kid("key-1");
  assert_eq!(key.kid().as_deref(), Some("key-1"));

  assert!(key.x5u().is_none());
  let url = Url::parse("https://example.com/keys").unwrap();
  key.set_x5u(url.clone());
  assert_eq!(key.x5u(), Some(url));

  assert!(key.x5c().is_none());
  key.set_x5c(vec![vec![1, 2, 3]]);
  assert_eq!(key.x5c(), Some(vec![vec![1, 2, 3]]));

  assert!(key.x5t().is_none());
  key.set_x5t(vec![4, 5, 6]);
  assert_eq!(key.x5t(), Some(vec![4, 5, 6]));

  assert!(key.x5t_s256().is_none());
  key.set_x5t_s256(vec![7, 8, 9]);
  assert_eq!(key.x5t_s256(), Some(vec![7, 8, 9]));
}

#[test]
fn test_getset_jws_header() {
  let mut header: JwsHeader = JwsHeader::new(JwsAlgorithm::HS256);

  assert_eq!(header.alg(), JwsAlgorithm::HS256);
  header.set_alg(JwsAlgorithm::ES256);
  assert_eq!(header.alg(), JwsAlgorithm::ES256);

  assert!(header.kid().is_none());
  header.set_kid("key-1".to_string());
  assert_eq!(header.kid().map(String::as_str), Some("key-1"));

  assert!(header.typ().is_none());
  header.set_typ("JWT".to_string());
  assert_eq!(header.typ().map(String::as_str), Some("JWT"));

  assert!(header.cty().is_none());
  header.set_cty("example".to_string());
  assert_eq!(header.cty().map(String::as_str), Some("example"));

  assert!(header.crit().is_none());
  header.set_crit(vec!["b64"]);
  assert_eq!(header.crit(), Some(["b64".to_string()].as_slice()));

  assert!(header.is_b64_encoded());
  header.set_b64(false);
  assert!(!header.is_b64_encoded());

  let url = Url::parse("https://example.com/jwks.json").unwrap();
  header.set_jku(url.clone());
  assert_eq!(header.jku(), Some(&url));
}

#[test]
fn test_getset_jwe_header() {
  let mut header: JweHeader = JweHeader::new(JweEncryption::A256GCM);

  assert_eq!(header.enc(), Some(JweEncryption::A256GCM));
  assert!(header.alg().is_none());
  header.set_alg(JweAlgorithm::DIR);
  assert_eq!(header.alg(), Some(JweAlgorithm::DIR));

  assert!(header.p2s().unwrap().is_none());
  header.set_p2s(b"some-salt");
  assert_eq!(header.p2s().unwrap(), Some(b"some-salt".to_vec()));

  assert!(header.p2c().is_none());
  header.set_p2c(210_000);
  assert_eq!(header.p2c(), Some(210_000));

  assert!(header.iv().unwrap().is_none());
  header.set_iv(b"initialization-vector-12");
  assert_eq!(header.iv().unwrap(), Some(b"initialization-vector-12".to_vec()));

  assert!(header.apu().unwrap().is_none());
  header.set_apu(b"Alice");
  assert_eq!(header.apu().unwrap(), Some(b"Alice".to_vec()));

  assert!(header.apv().unwrap().is_none());
  header.set_apv(b"Bob");
  assert_eq!(header.apv().unwrap(), Some(b"Bob".to_vec()));
}
