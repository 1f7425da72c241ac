//! Session endpoints

use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{auth::IdentityClaim, error::AppResult, AppState};

/// Login body; any extra fields are carried in the token
#[derive(Deserialize, ToSchema)]
pub struct TokenRequest {
    /// Email identifying the caller
    pub email: String,
}

#[derive(Serialize, ToSchema)]
pub struct TokenIssued {
    pub success: bool,
}

/// Issue a session token and set it as the `token` cookie
#[utoipa::path(
    post,
    path = "/api/v1/jwt",
    tag = "auth",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Session cookie set", body = TokenIssued)
    )
)]
pub async fn issue_token(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(claim): Json<IdentityClaim>,
) -> AppResult<(CookieJar, Json<TokenIssued>)> {
    let jar = state.services.auth.login(jar, &claim)?;
    Ok((jar, Json(TokenIssued { success: true })))
}

/// Clear the session cookie
#[utoipa::path(
    post,
    path = "/jwt/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Session cookie cleared", body = String)
    )
)]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, &'static str) {
    (state.services.auth.logout(jar), "cookie cleared")
}
