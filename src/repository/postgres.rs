//! PostgreSQL-backed document store, one JSONB table per collection

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, types::Json, Pool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::store::DocumentStore;
use crate::{
    config::DatabaseConfig,
    error::AppResult,
    models::document::{
        with_id, Collection, DeleteResult, Document, DocumentId, Filter,
        InsertOneResult, Projection, UpdateResult, ID_FIELD,
    },
};

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: Pool<Postgres>,
}

impl PgDocumentStore {
    /// Connect the pool and bring the schema up to date
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect(&config.url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations completed");

        Ok(Self { pool })
    }

    /// Merge `set` into an existing row in one statement.
    ///
    /// `None` when no row has this id; otherwise whether the stored document changed.
    async fn merge_existing(
        &self,
        collection: Collection,
        id: DocumentId,
        set: &Document,
    ) -> AppResult<Option<bool>> {
        let name = table(collection);
        let modified: Option<bool> = sqlx::query_scalar(&format!(
            "WITH previous AS (SELECT id, doc FROM {name} WHERE id = $1 FOR UPDATE) \
             UPDATE {name} SET doc = {name}.doc || $2 FROM previous \
             WHERE {name}.id = previous.id \
             RETURNING previous.doc IS DISTINCT FROM {name}.doc"
        ))
        .bind(id.as_uuid())
        .bind(Json(set))
        .fetch_optional(&self.pool)
        .await?;

        Ok(modified)
    }
}

fn table(collection: Collection) -> &'static str {
    collection.name()
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn find(&self, collection: Collection, filter: &Filter) -> AppResult<Vec<Document>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT id, doc FROM {} WHERE TRUE", table(collection)));

        for (field, value) in filter.clauses() {
            if value.is_null() {
                builder
                    .push(" AND COALESCE(doc -> ")
                    .push_bind(field.clone())
                    .push(", 'null'::jsonb) = 'null'::jsonb");
            } else {
                builder
                    .push(" AND doc -> ")
                    .push_bind(field.clone())
                    .push(" = ")
                    .push_bind(Json(value.clone()));
            }
        }
        builder.push(" ORDER BY inserted_at, id");

        let rows: Vec<(Uuid, Json<Document>)> =
            builder.build_query_as().fetch_all(&self.pool).await?;

        Ok(rows
            .into_iter()
            .map(|(id, Json(body))| with_id(DocumentId(id), body))
            .collect())
    }

    async fn find_one(
        &self,
        collection: Collection,
        id: DocumentId,
        projection: Option<Projection>,
    ) -> AppResult<Option<Document>> {
        let row: Option<Json<Document>> = sqlx::query_scalar(&format!(
            "SELECT doc FROM {} WHERE id = $1",
            table(collection)
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|Json(body)| {
            let doc = with_id(id, body);
            match projection {
                Some(projection) => projection.apply(doc),
                None => doc,
            }
        }))
    }

    async fn insert_one(&self, collection: Collection, mut doc: Document) -> AppResult<InsertOneResult> {
        doc.remove(ID_FIELD);
        let id = DocumentId::new();

        sqlx::query(&format!(
            "INSERT INTO {} (id, doc) VALUES ($1, $2)",
            table(collection)
        ))
        .bind(id.as_uuid())
        .bind(Json(&doc))
        .execute(&self.pool)
        .await?;

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
        loop {
            if let Some(modified) = self.merge_existing(collection, id, &set).await? {
                return Ok(UpdateResult::matched(modified));
            }
            if !upsert {
                return Ok(UpdateResult::unmatched());
            }

            let inserted = sqlx::query(&format!(
                "INSERT INTO {} (id, doc) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING",
                table(collection)
            ))
            .bind(id.as_uuid())
            .bind(Json(&set))
            .execute(&self.pool)
            .await?;

            if inserted.rows_affected() == 1 {
                return Ok(UpdateResult::upserted(id));
            }
            // Another writer created the row first; merge into it instead.
            tracing::debug!(%collection, %id, "upsert lost insert race, retrying as update");
        }
    }

    async fn delete_one(&self, collection: Collection, id: DocumentId) -> AppResult<DeleteResult> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", table(collection)))
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(DeleteResult {
            acknowledged: true,
            deleted_count: result.rows_affected(),
        })
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
