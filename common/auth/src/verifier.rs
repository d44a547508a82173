use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::Value;
use tracing::debug;

use crate::claims::Claims;
use crate::config::TokenConfig;
use crate::error::AuthResult;

/// Verifies HS256 tokens signed with the shared secret.
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    leeway_seconds: u32,
}

impl JwtVerifier {
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            leeway_seconds: config.leeway_seconds,
        }
    }

    pub fn verify(&self, token: &str) -> AuthResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway_seconds.into();

        let token_data = decode::<Value>(token, &self.decoding_key, &validation)?;
        let claims = Claims::try_from(token_data.claims)?;
        debug!(subject = %claims.subject, "verified bearer token");
        Ok(claims)
    }
}
