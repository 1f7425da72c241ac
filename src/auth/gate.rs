//! Authorization gate and ownership check middleware

use axum::{
    async_trait,
    extract::{FromRequestParts, Query, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use utoipa::IntoParams;

use super::{AuthError, CookiePolicy, IdentityClaim};
use crate::{error::AppError, AppState};

/// Gate: admit only requests carrying a valid session token.
///
/// The verified claim is stored in the request extensions for later layers
/// and handlers.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = CookiePolicy::read(&jar).ok_or(AuthError::MissingToken)?;
    let claim = state.services.auth.verify(token)?;

    tracing::debug!(email = %claim.email, path = %request.uri().path(), "session verified");
    request.extensions_mut().insert(claim);

    Ok(next.run(request).await)
}

/// Caller-supplied owner identity
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OwnerQuery {
    pub email: Option<String>,
}

/// Ownership check, layered inside [`require_session`] on routes that need it.
///
/// A query string that does not parse (e.g. a repeated `email`) is an
/// identity mismatch, not a bad request.
pub async fn require_owner(request: Request, next: Next) -> Result<Response, AppError> {
    let claim = request
        .extensions()
        .get::<IdentityClaim>()
        .ok_or(AuthError::MissingToken)?;

    let owner = Query::<OwnerQuery>::try_from_uri(request.uri())
        .map(|Query(owner)| owner)
        .map_err(|rejection| {
            tracing::warn!(
                email = %claim.email,
                path = %request.uri().path(),
                error = %rejection,
                "unreadable owner query"
            );
            AuthError::Forbidden
        })?;

    if let Err(err) = claim.require_owner(owner.email.as_deref()) {
        tracing::warn!(
            email = %claim.email,
            requested = ?owner.email,
            path = %request.uri().path(),
            "ownership check failed"
        );
        return Err(err.into());
    }

    Ok(next.run(request).await)
}

/// Extractor for the identity admitted by the gate
pub struct AuthenticatedUser(pub IdentityClaim);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<IdentityClaim>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(AppError::Unauthorized)
    }
}
