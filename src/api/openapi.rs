//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    api::{auth, books, borrows, health},
    auth::SESSION_COOKIE,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Libris API",
        version = "1.0.0",
        description = "Library Management REST API"
    ),
    paths(
        // Health
        health::liveness,
        health::health_check,
        health::readiness_check,
        // Auth
        auth::issue_token,
        auth::logout,
        // Books
        books::list_books,
        books::categorized_books,
        books::get_book,
        books::add_book,
        books::update_book,
        books::update_quantity,
        // Borrows
        borrows::borrow_book,
        borrows::list_borrowed,
        borrows::delete_borrowed_book,
    ),
    components(
        schemas(
            auth::TokenRequest,
            auth::TokenIssued,
            crate::models::book::Book,
            crate::models::book::UpdateBook,
            crate::models::book::UpdateQuantity,
            crate::models::borrow::BorrowRecord,
            crate::models::document::DocumentId,
            crate::models::document::InsertOneResult,
            crate::models::document::UpdateResult,
            crate::models::document::DeleteResult,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SessionCookieScheme),
    tags(
        (name = "health", description = "Liveness and health endpoints"),
        (name = "auth", description = "Session cookie endpoints"),
        (name = "books", description = "Book catalog"),
        (name = "borrows", description = "Borrowed books")
    )
)]
pub struct ApiDoc;

struct SessionCookieScheme;

impl Modify for SessionCookieScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
        );
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
