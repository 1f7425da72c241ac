//! Borrowed book endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::{
        borrow::{BorrowRecord, BorrowerQuery},
        document::{DeleteResult, Document, DocumentId, InsertOneResult},
    },
    AppState,
};

/// Record a borrow
#[utoipa::path(
    post,
    path = "/api/v1/borrowBook",
    tag = "borrows",
    request_body = BorrowRecord,
    responses(
        (status = 200, description = "Borrow recorded", body = InsertOneResult)
    )
)]
pub async fn borrow_book(
    State(state): State<AppState>,
    Json(record): Json<Document>,
) -> AppResult<Json<InsertOneResult>> {
    let result = state.services.borrows.borrow(record).await?;
    Ok(Json(result))
}

/// List a borrower's records
#[utoipa::path(
    get,
    path = "/api/v1/borrowBook",
    tag = "borrows",
    params(BorrowerQuery),
    responses(
        (status = 200, description = "Borrow records of the email", body = Vec<BorrowRecord>)
    )
)]
pub async fn list_borrowed(
    State(state): State<AppState>,
    Query(query): Query<BorrowerQuery>,
) -> AppResult<Json<Vec<Document>>> {
    let records = state.services.borrows.list_for(query.email.as_deref()).await?;
    Ok(Json(records))
}

/// Delete one borrow record
#[utoipa::path(
    delete,
    path = "/api/v1/deleteBorrowedBook/{id}",
    tag = "borrows",
    params(("id" = String, Path, description = "Borrow record ID")),
    responses(
        (status = 200, description = "Delete acknowledgement", body = DeleteResult)
    )
)]
pub async fn delete_borrowed_book(
    State(state): State<AppState>,
    Path(id): Path<DocumentId>,
) -> AppResult<Json<DeleteResult>> {
    let result = state.services.borrows.give_back(id).await?;
    Ok(Json(result))
}
