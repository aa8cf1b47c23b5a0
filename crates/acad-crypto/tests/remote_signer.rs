//! # Remote Signing Service Tests
//!
//! Exercises [`RemoteSigner`] against a wiremock signing service. The mock
//! signs with a real Ed25519 key so that signatures returned over HTTP are
//! checked by the local verifier.

use acad_core::CanonicalBytes;
use acad_crypto::{
    CryptoError, Ed25519KeyPair, Ed25519Verifier, RemoteSigner, RemoteSignerConfig,
    SignatureVerifier, Signer,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn data() -> CanonicalBytes {
    CanonicalBytes::new(&serde_json::json!({"credentialSubject": {"grade": "A"}})).unwrap()
}

fn signer(server: &MockServer) -> RemoteSigner {
    let config = RemoteSignerConfig::new(format!("{}/v1", server.uri()), "registrar-2026")
        .with_token("test-token");
    RemoteSigner::new(config).expect("client build")
}

#[tokio::test]
async fn remote_sign_returns_verifiable_signature() {
    let server = MockServer::start().await;
    let kp = Ed25519KeyPair::from_seed(&[11u8; 32]);
    let expected = kp.sign(&data());

    Mock::given(method("POST"))
        .and(path("/v1/sign"))
        .and(header("Authorization", "Bearer test-token"))
        .and(body_partial_json(serde_json::json!({
            "keyId": "registrar-2026",
            "data": acad_crypto::encoding::base64url_encode(data().as_bytes()),
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "signature": expected.to_base64url(),
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sig = signer(&server).sign(&data()).await.expect("remote sign");
    assert_eq!(sig, expected);
    assert!(Ed25519Verifier
        .verify(&data(), &sig, &kp.public_key())
        .await
        .unwrap());
}

#[tokio::test]
async fn remote_public_key_lookup() {
    let server = MockServer::start().await;
    let pk = Ed25519KeyPair::from_seed(&[12u8; 32]).public_key();

    Mock::given(method("GET"))
        .and(path("/v1/keys/registrar-2026"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "publicKey": pk.to_multibase(),
        })))
        .mount(&server)
        .await;

    assert_eq!(signer(&server).public_key().await.unwrap(), pk);
}

#[tokio::test]
async fn remote_verify_false_is_not_an_error() {
    let server = MockServer::start().await;
    let kp = Ed25519KeyPair::from_seed(&[13u8; 32]);

    Mock::given(method("POST"))
        .and(path("/v1/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"valid": false})))
        .mount(&server)
        .await;

    let valid = signer(&server)
        .verify(&data(), &kp.sign(&data()), &kp.public_key())
        .await
        .expect("service answered");
    assert!(!valid);
}

#[tokio::test]
async fn server_error_is_remote_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/sign"))
        .respond_with(ResponseTemplate::new(503).set_body_string("HSM offline"))
        .mount(&server)
        .await;

    let err = signer(&server).sign(&data()).await.unwrap_err();
    match err {
        CryptoError::RemoteRejected { status, ref body, .. } => {
            assert_eq!(status, 503);
            assert_eq!(body, "HSM offline");
        }
        other => panic!("expected RemoteRejected, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_signature_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/sign"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"signature": "AAAA"})))
        .mount(&server)
        .await;

    let err = signer(&server).sign(&data()).await.unwrap_err();
    assert!(matches!(err, CryptoError::InvalidResponse { .. }));
    assert!(err.is_transport());
}

#[tokio::test]
async fn unreachable_service_is_transport_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let remote = RemoteSigner::new(RemoteSignerConfig::new(uri, "k1")).unwrap();
    let err = remote.sign(&data()).await.unwrap_err();
    assert!(matches!(err, CryptoError::Transport { .. }));
}
