//! Session token service

use axum_extra::extract::cookie::CookieJar;

use crate::{
    auth::{AuthError, CookiePolicy, IdentityClaim, TokenCodec},
    config::{AuthConfig, DeploymentEnv},
    error::AppResult,
};

#[derive(Clone)]
pub struct AuthService {
    codec: TokenCodec,
    cookies: CookiePolicy,
}

impl AuthService {
    pub fn new(config: &AuthConfig, env: DeploymentEnv) -> Self {
        Self {
            codec: TokenCodec::from_config(config),
            cookies: CookiePolicy::new(env),
        }
    }

    /// Sign a token for `claim` and set it as the session cookie
    pub fn login(&self, jar: CookieJar, claim: &IdentityClaim) -> AppResult<CookieJar> {
        let token = self.codec.issue(claim)?;
        tracing::info!(email = %claim.email, "issued session token");
        Ok(self.cookies.attach(jar, token))
    }

    /// Drop the session cookie. The token itself stays valid until it expires.
    pub fn logout(&self, jar: CookieJar) -> CookieJar {
        self.cookies.clear(jar)
    }

    pub fn verify(&self, token: &str) -> Result<IdentityClaim, AuthError> {
        self.codec.verify(token)
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }
}
