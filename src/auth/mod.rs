//! Cookie-carried JWT authentication
//!
//! Issuance and verification live in [`token`], cookie handling in [`cookie`]
//! and the per-request admission middleware in [`gate`].

pub mod cookie;
pub mod gate;
pub mod token;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub use cookie::{CookiePolicy, SESSION_COOKIE};
pub use gate::{require_owner, require_session, AuthenticatedUser, OwnerQuery};
pub use token::TokenCodec;

/// Why a request was not admitted
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("no session token")]
    MissingToken,

    #[error("token is invalid or expired")]
    InvalidOrExpired,

    #[error("identity does not match the requested owner")]
    Forbidden,
}

/// Identity embedded in a session token.
///
/// Whatever else the client sent at login travels along in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityClaim {
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IdentityClaim {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            extra: Map::new(),
        }
    }

    /// Ownership check: the caller-supplied email must equal the token's
    pub fn require_owner(&self, email: Option<&str>) -> Result<(), AuthError> {
        if email == Some(self.email.as_str()) {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }
}
