//! In-process document store for development and tests

use std::collections::HashMap;

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;

use super::store::DocumentStore;
use crate::{
    error::AppResult,
    models::document::{
        apply_set, with_id, Collection, DeleteResult, Document, DocumentId, Filter,
        InsertOneResult, Projection, UpdateResult, ID_FIELD,
    },
};

type Table = IndexMap<DocumentId, Document>;

#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<Collection, Table>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn find(&self, collection: Collection, filter: &Filter) -> AppResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let docs: Vec<Document> = collections
            .get(&collection)
            .map(|table| {
                table
                    .iter()
                    .filter(|(_, body)| filter.matches(body))
                    .map(|(id, body)| with_id(*id, body.clone()))
                    .collect()
            })
            .unwrap_or_default();
        Ok(docs)
    }

    async fn find_one(
        &self,
        collection: Collection,
        id: DocumentId,
        projection: Option<Projection>,
    ) -> AppResult<Option<Document>> {
        let collections = self.collections.read().await;
        let doc = collections
            .get(&collection)
            .and_then(|table| table.get(&id))
            .map(|body| with_id(id, body.clone()))
            .map(|doc| match projection {
                Some(projection) => projection.apply(doc),
                None => doc,
            });
        Ok(doc)
    }

    async fn insert_one(&self, collection: Collection, mut doc: Document) -> AppResult<InsertOneResult> {
        doc.remove(ID_FIELD);
        let id = DocumentId::new();
        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .insert(id, doc);

        Ok(InsertOneResult {
            acknowledged: true,
            inserted_id: id,
        })
    }

    async fn update_one(
        &self,
        collection: Collection,
        id: DocumentId,
        set: Document,
        upsert: bool,
    ) -> AppResult<UpdateResult> {
        let mut collections = self.collections.write().await;
        let table = collections.entry(collection).or_default();

        match table.get_mut(&id) {
            Some(existing) => Ok(UpdateResult::matched(apply_set(existing, &set))),
            None if upsert => {
                table.insert(id, set);
                Ok(UpdateResult::upserted(id))
            }
            None => Ok(UpdateResult::unmatched()),
        }
    }

    async fn delete_one(&self, collection: Collection, id: DocumentId) -> AppResult<DeleteResult> {
        let removed = self
            .collections
            .write()
            .await
            .get_mut(&collection)
            .and_then(|table| table.shift_remove(&id))
            .is_some();

        Ok(DeleteResult {
            acknowledged: true,
            deleted_count: removed as u64,
        })
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
