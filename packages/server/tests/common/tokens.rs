//! RS256 keypairs and signed Security Event Tokens for tests.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use relay_core::domains::identity_events::VerifyingKey;
use rsa::pkcs1::{EncodeRsaPrivateKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;
use serde_json::{json, Value};
use uuid::Uuid;

/// The client id baked into test SET audiences
pub const TEST_CLIENT_ID: &str = "relay-client-id";

pub struct TestKeypair {
    encoding_key: EncodingKey,
    pub jwk: VerifyingKey,
}

impl TestKeypair {
    pub fn generate(kid: &str) -> Self {
        let private =
            RsaPrivateKey::new(&mut rand::thread_rng(), 2048).expect("test keypair generation");
        let pem = private
            .to_pkcs1_pem(LineEnding::LF)
            .expect("test keypair PEM encoding");
        let encoding_key = EncodingKey::from_rsa_pem(pem.as_bytes()).expect("test keypair import");
        let jwk = VerifyingKey {
            kid: Some(kid.to_string()),
            alg: "RS256".to_string(),
            n: Some(URL_SAFE_NO_PAD.encode(private.n().to_bytes_be())),
            e: Some(URL_SAFE_NO_PAD.encode(private.e().to_bytes_be())),
        };
        Self { encoding_key, jwk }
    }

    /// Sign a SET for `sub` whose `events` map holds the given entries.
    pub fn sign_event(&self, sub: &str, events: Value) -> String {
        let claims = json!({
            "iss": "https://accounts.firefox.com/",
            "sub": sub,
            "aud": TEST_CLIENT_ID,
            "iat": Utc::now().timestamp(),
            "jti": Uuid::new_v4().to_string(),
            "events": events,
        });
        encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)
            .expect("test SET signing")
    }
}
