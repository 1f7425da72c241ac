//! Book domain methods on Repository

use super::Repository;
use crate::{
    error::AppResult,
    models::document::{
        Collection, Document, DocumentId, Filter, InsertOneResult, Projection, UpdateResult,
    },
};

impl Repository {
    pub async fn books_find(&self, filter: &Filter) -> AppResult<Vec<Document>> {
        self.store.find(Collection::Books, filter).await
    }

    pub async fn books_get_by_id(
        &self,
        id: DocumentId,
        projection: Option<Projection>,
    ) -> AppResult<Option<Document>> {
        self.store.find_one(Collection::Books, id, projection).await
    }

    pub async fn books_insert(&self, book: Document) -> AppResult<InsertOneResult> {
        self.store.insert_one(Collection::Books, book).await
    }

    /// Set fields on a book, optionally creating it
    pub async fn books_set_fields(
        &self,
        id: DocumentId,
        set: Document,
        upsert: bool,
    ) -> AppResult<UpdateResult> {
        self.store.update_one(Collection::Books, id, set, upsert).await
    }
}
