//! Resource access layer: the document store contract

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::document::{
        Collection, DeleteResult, Document, DocumentId, Filter, InsertOneResult, Projection,
        UpdateResult,
    },
};

/// Minimal document store used by every route.
///
/// Returned documents always carry their identifier under `_id`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents matching `filter`, in insertion order
    async fn find(&self, collection: Collection, filter: &Filter) -> AppResult<Vec<Document>>;

    async fn find_one(
        &self,
        collection: Collection,
        id: DocumentId,
        projection: Option<Projection>,
    ) -> AppResult<Option<Document>>;

    /// Stores `doc` under a fresh identifier; any `_id` in the body is ignored
    async fn insert_one(&self, collection: Collection, doc: Document) -> AppResult<InsertOneResult>;

    /// Applies `set` to the document with `id`, creating it when `upsert` is on
    async fn update_one(
        &self,
        collection: Collection,
        id: DocumentId,
        set: Document,
        upsert: bool,
    ) -> AppResult<UpdateResult>;

    async fn delete_one(&self, collection: Collection, id: DocumentId) -> AppResult<DeleteResult>;

    async fn ping(&self) -> AppResult<()>;

    async fn close(&self) {}
}
