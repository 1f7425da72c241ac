//! Borrow record domain methods on Repository

use super::Repository;
use crate::{
    error::AppResult,
    models::document::{Collection, DeleteResult, Document, DocumentId, Filter, InsertOneResult},
};

impl Repository {
    pub async fn borrows_insert(&self, record: Document) -> AppResult<InsertOneResult> {
        self.store.insert_one(Collection::BorrowedBooks, record).await
    }

    /// Borrow records for an email; `None` matches records without one
    pub async fn borrows_find_by_email(&self, email: Option<&str>) -> AppResult<Vec<Document>> {
        self.store
            .find(Collection::BorrowedBooks, &Filter::eq("email", email))
            .await
    }

    pub async fn borrows_delete(&self, id: DocumentId) -> AppResult<DeleteResult> {
        self.store.delete_one(Collection::BorrowedBooks, id).await
    }
}
