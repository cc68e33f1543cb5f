//! # PostgreSQL Quote History Repository
//!
//! Append-only storage in `quotes` with JSONB request and response
//! documents.

use crate::domain::entities::StoredQuote;
use crate::domain::value_objects::{QuoteId, Timestamp, UserId};
use crate::infrastructure::persistence::traits::{
    QuoteHistoryRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of [`QuoteHistoryRepository`].
#[derive(Debug, Clone)]
pub struct PostgresQuoteHistoryRepository {
    pool: PgPool,
}

impl PostgresQuoteHistoryRepository {
    /// Creates a new repository.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuoteHistoryRepository for PostgresQuoteHistoryRepository {
    async fn save(&self, quote: &StoredQuote) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO quotes (
                id, user_id, origin_zip, dest_zip,
                request_payload, response_payload, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(quote.id.get())
        .bind(quote.user_id.get())
        .bind(&quote.origin)
        .bind(&quote.destination)
        .bind(&quote.request_payload)
        .bind(&quote.result_payload)
        .bind(*quote.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::duplicate("Quote", quote.id.to_string())
            }
            other => RepositoryError::from(other),
        })?;

        Ok(())
    }

    async fn find_by_user(&self, user_id: UserId) -> RepositoryResult<Vec<StoredQuote>> {
        let rows: Vec<QuoteRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, origin_zip, dest_zip,
                   request_payload, response_payload, created_at
            FROM quotes
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.get())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(QuoteRow::into_stored_quote).collect())
    }
}

/// Row type for quote queries.
#[derive(Debug, sqlx::FromRow)]
struct QuoteRow {
    id: Uuid,
    user_id: Uuid,
    origin_zip: String,
    dest_zip: String,
    request_payload: serde_json::Value,
    response_payload: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl QuoteRow {
    fn into_stored_quote(self) -> StoredQuote {
        StoredQuote {
            id: QuoteId::new(self.id),
            user_id: UserId::new(self.user_id),
            origin: self.origin_zip,
            destination: self.dest_zip,
            request_payload: self.request_payload,
            result_payload: self.response_payload,
            created_at: Timestamp::from(self.created_at),
        }
    }
}
