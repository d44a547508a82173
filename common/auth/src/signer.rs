use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use uuid::Uuid;

use crate::config::TokenConfig;
use crate::error::{AuthError, AuthResult};

/// Identity embedded in an issued token.
pub struct TokenSubject {
    pub user_id: Uuid,
    pub username: String,
}

pub struct IssuedToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub expires_in: i64,
}

/// Stateless HS256 signer over the process-wide shared secret.
pub struct TokenSigner {
    ttl_seconds: i64,
    encoding_key: EncodingKey,
}

#[derive(Serialize)]
struct AccessClaims<'a> {
    sub: String,
    username: &'a str,
    iat: i64,
    exp: i64,
}

impl TokenSigner {
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            ttl_seconds: config.ttl_seconds,
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
        }
    }

    /// Produce a signed token for the subject, expiring one configured
    /// TTL from now.
    pub fn issue(&self, subject: &TokenSubject) -> AuthResult<IssuedToken> {
        let now = Utc::now();
        let expires_at = now + Duration::seconds(self.ttl_seconds);

        let claims = AccessClaims {
            sub: subject.user_id.to_string(),
            username: &subject.username,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|err| AuthError::Signing(err.to_string()))?;

        Ok(IssuedToken {
            token,
            issued_at: now,
            expires_at,
            expires_in: self.ttl_seconds,
        })
    }
}
