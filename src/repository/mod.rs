//! Repository layer over the document store

pub mod books;
pub mod borrows;
pub mod memory;
pub mod postgres;
pub mod store;

use std::sync::Arc;

use crate::{
    config::{DatabaseConfig, StoreBackend},
    error::AppResult,
};

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;
pub use store::DocumentStore;

/// Main repository struct holding the injected store client
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn DocumentStore>,
}

impl Repository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Build the store selected by configuration
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let store: Arc<dyn DocumentStore> = match config.backend {
            StoreBackend::Postgres => Arc::new(PgDocumentStore::connect(config).await?),
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory document store; data is lost on shutdown");
                Arc::new(MemoryDocumentStore::new())
            }
        };
        Ok(Self::new(store))
    }

    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }

    /// Release the store's resources
    pub async fn close(&self) {
        self.store.close().await
    }
}
