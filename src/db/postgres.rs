use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Postgres, Row, Transaction};
use uuid::Uuid;

use super::store::{Document, DocumentStore, Filter, Patch};
use super::DatabaseError;
use crate::config::DatabaseConfig;

/// Document store backed by a single Postgres `documents` table with a
/// `jsonb` body per record.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let url = config
            .url
            .as_deref()
            .context("DATABASE_URL must be set for the postgres store")?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections.unwrap_or(10))
            .min_connections(config.min_connections.unwrap_or(1))
            .connect(url)
            .await
            .context("Failed to connect to Postgres")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self::from_pool(pool))
    }

    /// Wrap a pool whose schema is already migrated.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn apply_patch(
        tx: &mut Transaction<'_, Postgres>,
        collection: &str,
        id: Uuid,
        patch: &Patch,
    ) -> Result<u64, DatabaseError> {
        let result = match patch {
            Patch::Set { field, value } => {
                sqlx::query(
                    r#"
                    UPDATE documents
                    SET body = jsonb_set(body, ARRAY[$3::text], $4::jsonb, true),
                        updated_at = NOW()
                    WHERE collection = $1 AND id = $2
                    "#,
                )
                .bind(collection)
                .bind(id)
                .bind(field)
                .bind(value)
                .execute(&mut **tx)
                .await?
            }
            Patch::ArrayUnion { field, value } => {
                sqlx::query(
                    r#"
                    UPDATE documents
                    SET body = jsonb_set(
                            body,
                            ARRAY[$3::text],
                            CASE
                                WHEN COALESCE(NULLIF(body -> $3, 'null'::jsonb), '[]'::jsonb)
                                        @> jsonb_build_array($4::jsonb)
                                    THEN COALESCE(NULLIF(body -> $3, 'null'::jsonb), '[]'::jsonb)
                                ELSE COALESCE(NULLIF(body -> $3, 'null'::jsonb), '[]'::jsonb)
                                    || jsonb_build_array($4::jsonb)
                            END,
                            true),
                        updated_at = NOW()
                    WHERE collection = $1 AND id = $2
                    "#,
                )
                .bind(collection)
                .bind(id)
                .bind(field)
                .bind(value)
                .execute(&mut **tx)
                .await?
            }
            Patch::Increment { field, by } => {
                sqlx::query(
                    r#"
                    UPDATE documents
                    SET body = jsonb_set(
                            body,
                            ARRAY[$3::text],
                            to_jsonb(COALESCE((body ->> $3)::bigint, 0) + $4),
                            true),
                        updated_at = NOW()
                    WHERE collection = $1 AND id = $2
                    "#,
                )
                .bind(collection)
                .bind(id)
                .bind(field)
                .bind(*by)
                .execute(&mut **tx)
                .await?
            }
        };
        Ok(result.rows_affected())
    }
}

fn row_to_document(row: PgRow) -> Result<Document, DatabaseError> {
    let id: Uuid = row.try_get("id")?;
    let body: Value = row.try_get("body")?;
    Ok(Document::new(id, body))
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, collection: &str, id: Uuid) -> Result<Option<Document>, DatabaseError> {
        let row = sqlx::query(
            r#"
            SELECT id, body
            FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_document).transpose()
    }

    async fn query(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Vec<Document>, DatabaseError> {
        let rows = sqlx::query(
            r#"
            SELECT id, body
            FROM documents
            WHERE collection = $1 AND body @> $2::jsonb
            ORDER BY seq
            "#,
        )
        .bind(collection)
        .bind(filter.to_containment())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_document).collect()
    }

    async fn add(&self, collection: &str, record: Value) -> Result<Uuid, DatabaseError> {
        if !record.is_object() {
            return Err(DatabaseError::InvalidInput(
                "records must be JSON objects".to_string(),
            ));
        }
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, body)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(record)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    async fn update(
        &self,
        collection: &str,
        id: Uuid,
        patches: &[Patch],
    ) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query(
            "SELECT 1 FROM documents WHERE collection = $1 AND id = $2 FOR UPDATE",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        if exists.is_none() {
            return Err(DatabaseError::NotFound);
        }

        for patch in patches {
            if Self::apply_patch(&mut tx, collection, id, patch).await? == 0 {
                return Err(DatabaseError::NotFound);
            }
        }

        tx.commit().await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
