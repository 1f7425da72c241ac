//! Signed, time-limited identity tokens

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::{AuthError, IdentityClaim};
use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
};

/// Lifetime of every session token
const SESSION_TTL_SECS: i64 = 60 * 60;

/// JWT payload: the identity plus issue/expiry timestamps
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    #[serde(flatten)]
    identity: IdentityClaim,
    iat: i64,
    exp: i64,
}

#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::seconds(SESSION_TTL_SECS),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret)
    }

    pub fn issue(&self, claim: &IdentityClaim) -> AppResult<String> {
        self.issue_at(claim, Utc::now())
    }

    /// Issue a token as if it had been signed at `issued_at`
    pub fn issue_at(&self, claim: &IdentityClaim, issued_at: DateTime<Utc>) -> AppResult<String> {
        let mut identity = claim.clone();
        identity.extra.remove("iat");
        identity.extra.remove("exp");

        let claims = SessionClaims {
            identity,
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Any failure (malformed, bad signature, expired) is `InvalidOrExpired`
    pub fn verify(&self, token: &str) -> Result<IdentityClaim, AuthError> {
        decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims.identity)
            .map_err(|e| {
                tracing::debug!(error = %e, "rejected session token");
                AuthError::InvalidOrExpired
            })
    }
}
