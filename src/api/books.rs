//! Book endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    auth::{AuthenticatedUser, OwnerQuery},
    error::{AppResult, ErrorResponse},
    models::{
        book::{Book, BookQuery, CategoryQuery, UpdateBook, UpdateQuantity},
        document::{Document, DocumentId, InsertOneResult, UpdateResult},
    },
    AppState,
};

/// List every book
#[utoipa::path(
    get,
    path = "/api/v1/allBooks",
    tag = "books",
    security(("session_cookie" = [])),
    params(OwnerQuery),
    responses(
        (status = 200, description = "All books", body = Vec<Book>),
        (status = 401, description = "Missing or invalid session", body = ErrorResponse),
        (status = 403, description = "Email does not match the session", body = ErrorResponse)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<Document>>> {
    let books = state.services.books.list_all().await?;
    Ok(Json(books))
}

/// List books of one category
#[utoipa::path(
    get,
    path = "/api/v1/categorizedBooks",
    tag = "books",
    params(CategoryQuery),
    responses(
        (status = 200, description = "Books in the category", body = Vec<Book>)
    )
)]
pub async fn categorized_books(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> AppResult<Json<Vec<Document>>> {
    let books = state
        .services
        .books
        .list_by_category(query.category.as_deref())
        .await?;
    Ok(Json(books))
}

/// Get one book
#[utoipa::path(
    get,
    path = "/api/v1/allBooks/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID"),
        BookQuery
    ),
    responses(
        (status = 200, description = "The book, or null", body = Book)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<DocumentId>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Option<Document>>> {
    let book = state
        .services
        .books
        .get(id, query.wants_reader_view())
        .await?;
    Ok(Json(book))
}

/// Add a book
#[utoipa::path(
    post,
    path = "/api/v1/addBook",
    tag = "books",
    security(("session_cookie" = [])),
    params(OwnerQuery),
    request_body = Book,
    responses(
        (status = 200, description = "Book inserted", body = InsertOneResult),
        (status = 401, description = "Missing or invalid session", body = ErrorResponse),
        (status = 403, description = "Email does not match the session", body = ErrorResponse)
    )
)]
pub async fn add_book(
    State(state): State<AppState>,
    AuthenticatedUser(claim): AuthenticatedUser,
    Json(book): Json<Document>,
) -> AppResult<Json<InsertOneResult>> {
    let result = state.services.books.add(book).await?;
    tracing::info!(email = %claim.email, id = %result.inserted_id, "book added");
    Ok(Json(result))
}

/// Set a book's fields, creating it if absent
#[utoipa::path(
    put,
    path = "/api/v1/updateBook/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Update acknowledgement", body = UpdateResult)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<DocumentId>,
    Json(update): Json<UpdateBook>,
) -> AppResult<Json<UpdateResult>> {
    let result = state.services.books.replace(id, update).await?;
    Ok(Json(result))
}

/// Set a book's quantity
#[utoipa::path(
    patch,
    path = "/api/v1/updateQuantity/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    request_body = UpdateQuantity,
    responses(
        (status = 200, description = "Update acknowledgement", body = UpdateResult)
    )
)]
pub async fn update_quantity(
    State(state): State<AppState>,
    Path(id): Path<DocumentId>,
    Json(patch): Json<UpdateQuantity>,
) -> AppResult<Json<UpdateResult>> {
    let result = state.services.books.set_quantity(id, patch).await?;
    Ok(Json(result))
}
