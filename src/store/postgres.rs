use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::query::Query;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Row};
use tracing::{debug, info};

use super::error::StoreError;
use super::schema::Collection;
use super::traits::DocumentStore;
use crate::config::DatabaseConfig;
use crate::filter::Filter;
use crate::types::{Document, ID_FIELD};

/// PostgreSQL-backed store. Every collection lives in one `documents` table as JSONB,
/// with per-collection partial unique indexes standing in for schema unique keys.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let url = config
            .url
            .as_deref()
            .ok_or_else(|| StoreError::Unavailable("DATABASE_URL is not set".to_string()))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        info!("Connected to PostgreSQL (max_connections={})", config.max_connections);
        Ok(Self { pool })
    }

    /// Create the documents table and one unique index per collection key.
    pub async fn migrate(&self, collections: &[&Collection]) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS documents (
                seq BIGSERIAL PRIMARY KEY,
                collection TEXT NOT NULL,
                doc_id TEXT NOT NULL,
                body JSONB NOT NULL,
                UNIQUE (collection, doc_id)
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS documents_collection_seq_idx ON documents (collection, seq)")
            .execute(&self.pool)
            .await?;

        for collection in collections {
            for key in collection.unique {
                let sql = unique_index_sql(collection, key)?;
                debug!("{}", sql);
                sqlx::query(&sql).execute(&self.pool).await?;
            }
        }

        info!("Document schema ready for {} collections", collections.len());
        Ok(())
    }

    fn map_write_error(collection: &Collection, doc: &Document, err: sqlx::Error) -> StoreError {
        if let sqlx::Error::Database(db) = &err {
            if db.code().as_deref() == Some("23505") {
                let key = db
                    .constraint()
                    .and_then(|name| collection.unique.iter().find(|key| collection.index_name(key) == name));
                return match key {
                    Some(key) => StoreError::Duplicate(collection.duplicate_message(key, doc)),
                    None => StoreError::Duplicate(format!("duplicate key error collection: {}", collection.name)),
                };
            }
        }
        map_error(err)
    }
}

fn map_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
            StoreError::Unavailable(err.to_string())
        }
        other => StoreError::Sqlx(other),
    }
}

fn unique_index_sql(collection: &Collection, key: &[&str]) -> Result<String, StoreError> {
    let mut exprs = Vec::with_capacity(key.len());
    for field in key {
        Filter::validate_column(field)?;
        exprs.push(format!("(body ->> '{}')", field));
    }
    Ok(format!(
        "CREATE UNIQUE INDEX IF NOT EXISTS \"{}\" ON documents ({}) WHERE collection = '{}'",
        collection.index_name(key),
        exprs.join(", "),
        collection.name
    ))
}

fn bind_params<'q>(mut q: Query<'q, Postgres, PgArguments>, params: &[Value]) -> Query<'q, Postgres, PgArguments> {
    for p in params {
        q = q.bind(Json(p.clone()));
    }
    q
}

fn body(row: &PgRow) -> Result<Document, StoreError> {
    let Json(doc): Json<Document> = row.try_get("body")?;
    Ok(doc)
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn find(&self, collection: &Collection, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let sql = filter.to_sql(1)?;
        let query = format!("SELECT body FROM documents WHERE collection = $1 AND {}", sql.query);
        debug!("{}", query);

        let rows = bind_params(sqlx::query(&query).bind(collection.name), &sql.params)
            .fetch_all(&self.pool)
            .await
            .map_err(map_error)?;
        rows.iter().map(body).collect()
    }

    async fn count(&self, collection: &Collection, filter: &Filter) -> Result<u64, StoreError> {
        let sql = filter.to_where_sql(1)?;
        let query = format!("SELECT COUNT(*) FROM documents WHERE collection = $1 AND {}", sql.query);

        let row = bind_params(sqlx::query(&query).bind(collection.name), &sql.params)
            .fetch_one(&self.pool)
            .await
            .map_err(map_error)?;
        let count: i64 = row.try_get(0)?;
        Ok(count.max(0) as u64)
    }

    async fn sum(&self, collection: &Collection, field: &str, filter: &Filter) -> Result<f64, StoreError> {
        Filter::validate_column(field)?;
        let sql = filter.to_where_sql(1)?;
        let query = format!(
            "SELECT COALESCE(SUM((body ->> '{0}')::float8), 0)::float8 FROM documents \
             WHERE collection = $1 AND jsonb_typeof(body -> '{0}') = 'number' AND {1}",
            field, sql.query
        );

        let row = bind_params(sqlx::query(&query).bind(collection.name), &sql.params)
            .fetch_one(&self.pool)
            .await
            .map_err(map_error)?;
        Ok(row.try_get(0)?)
    }

    async fn latest(&self, collection: &Collection) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query("SELECT body FROM documents WHERE collection = $1 ORDER BY seq DESC LIMIT 1")
            .bind(collection.name)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_error)?;
        row.as_ref().map(body).transpose()
    }

    async fn insert(&self, collection: &Collection, doc: Document) -> Result<Document, StoreError> {
        let prepared = collection.prepare_insert(doc, Utc::now())?;
        let doc_id = prepared.get(ID_FIELD).and_then(Value::as_str).unwrap_or_default().to_string();

        sqlx::query("INSERT INTO documents (collection, doc_id, body) VALUES ($1, $2, $3)")
            .bind(collection.name)
            .bind(doc_id)
            .bind(Json(&prepared))
            .execute(&self.pool)
            .await
            .map_err(|e| Self::map_write_error(collection, &prepared, e))?;
        Ok(prepared)
    }

    async fn update_one(
        &self,
        collection: &Collection,
        filter: &Filter,
        changes: Document,
    ) -> Result<Option<Document>, StoreError> {
        let sql = filter.clone().limit(1).to_sql(1)?;
        let query = format!(
            "SELECT seq, body FROM documents WHERE collection = $1 AND {} FOR UPDATE",
            sql.query
        );

        let mut tx = self.pool.begin().await.map_err(map_error)?;
        let row = bind_params(sqlx::query(&query).bind(collection.name), &sql.params)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_error)?;
        let Some(row) = row else {
            return Ok(None);
        };

        let seq: i64 = row.try_get("seq")?;
        let updated = collection.apply_update(&body(&row)?, changes, Utc::now())?;

        sqlx::query("UPDATE documents SET body = $2 WHERE seq = $1")
            .bind(seq)
            .bind(Json(&updated))
            .execute(&mut *tx)
            .await
            .map_err(|e| Self::map_write_error(collection, &updated, e))?;
        tx.commit().await.map_err(map_error)?;
        Ok(Some(updated))
    }

    async fn update_many(&self, collection: &Collection, filter: &Filter, changes: Document) -> Result<u64, StoreError> {
        // System fields stripped and updatedAt stamped, then merged server-side with ||
        let patch = collection.merge_changes(&Document::new(), changes, Utc::now());
        let sql = filter.to_where_sql(2)?;
        let query = format!(
            "UPDATE documents SET body = body || $2 WHERE collection = $1 AND {}",
            sql.query
        );

        let result = bind_params(sqlx::query(&query).bind(collection.name).bind(Json(&patch)), &sql.params)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::map_write_error(collection, &patch, e))?;
        Ok(result.rows_affected())
    }

    async fn delete_one(&self, collection: &Collection, filter: &Filter) -> Result<Option<Document>, StoreError> {
        let sql = filter.clone().limit(1).to_sql(1)?;
        let query = format!(
            "DELETE FROM documents WHERE seq = (SELECT seq FROM documents WHERE collection = $1 AND {}) RETURNING body",
            sql.query
        );

        let row = bind_params(sqlx::query(&query).bind(collection.name), &sql.params)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_error)?;
        row.as_ref().map(body).transpose()
    }

    async fn clear(&self, collection: &Collection) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1")
            .bind(collection.name)
            .execute(&self.pool)
            .await
            .map_err(map_error)?;
        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await.map_err(map_error)?;
        Ok(())
    }
}
