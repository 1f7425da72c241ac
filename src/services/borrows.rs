//! Borrowed books service

use crate::{
    error::AppResult,
    models::document::{DeleteResult, Document, DocumentId, InsertOneResult},
    repository::Repository,
};

#[derive(Clone)]
pub struct BorrowsService {
    repository: Repository,
}

impl BorrowsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Record a borrow. Stock is not touched; callers patch the book quantity separately.
    pub async fn borrow(&self, record: Document) -> AppResult<InsertOneResult> {
        self.repository.borrows_insert(record).await
    }

    pub async fn list_for(&self, email: Option<&str>) -> AppResult<Vec<Document>> {
        self.repository.borrows_find_by_email(email).await
    }

    /// Delete the borrow record with exactly this identifier
    pub async fn give_back(&self, id: DocumentId) -> AppResult<DeleteResult> {
        tracing::info!(%id, "deleting borrow record");
        self.repository.borrows_delete(id).await
    }
}
