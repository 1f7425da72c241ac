//! Book catalog service

use crate::{
    error::AppResult,
    models::{
        book::{UpdateBook, UpdateQuantity, READER_PROJECTION},
        document::{Document, DocumentId, Filter, InsertOneResult, UpdateResult},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_all(&self) -> AppResult<Vec<Document>> {
        self.repository.books_find(&Filter::all()).await
    }

    /// Books whose `category` equals the given value exactly
    pub async fn list_by_category(&self, category: Option<&str>) -> AppResult<Vec<Document>> {
        self.repository
            .books_find(&Filter::eq("category", category))
            .await
    }

    /// Fetch one book, optionally reduced to the reader projection
    pub async fn get(&self, id: DocumentId, reader_view: bool) -> AppResult<Option<Document>> {
        let projection = reader_view.then_some(READER_PROJECTION);
        self.repository.books_get_by_id(id, projection).await
    }

    pub async fn add(&self, book: Document) -> AppResult<InsertOneResult> {
        self.repository.books_insert(book).await
    }

    /// Overwrite all enumerated book fields, creating the book if it does not exist
    pub async fn replace(&self, id: DocumentId, update: UpdateBook) -> AppResult<UpdateResult> {
        self.repository
            .books_set_fields(id, update.into_set(), true)
            .await
    }

    /// Set the quantity of an existing book
    pub async fn set_quantity(&self, id: DocumentId, patch: UpdateQuantity) -> AppResult<UpdateResult> {
        self.repository
            .books_set_fields(id, patch.into_set(), false)
            .await
    }
}
