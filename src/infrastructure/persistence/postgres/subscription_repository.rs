//! # PostgreSQL Subscription Repository
//!
//! Quota state is the subscription row joined with its plan's limit.

use crate::domain::entities::QuotaState;
use crate::domain::value_objects::{SubscriptionStatus, Timestamp, UserId};
use crate::infrastructure::persistence::traits::{
    RepositoryError, RepositoryResult, SubscriptionRepository,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// PostgreSQL implementation of [`SubscriptionRepository`].
#[derive(Debug, Clone)]
pub struct PostgresSubscriptionRepository {
    pool: PgPool,
}

impl PostgresSubscriptionRepository {
    /// Creates a new repository.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    async fn find_quota_state(&self, user_id: UserId) -> RepositoryResult<Option<QuotaState>> {
        let row: Option<QuotaRow> = sqlx::query_as(
            r#"
            SELECT s.status, s.current_period_end, s.quote_count, p.quote_limit
            FROM subscriptions s
            JOIN plans p ON p.id = s.plan_id
            WHERE s.user_id = $1
            "#,
        )
        .bind(user_id.get())
        .fetch_optional(&self.pool)
        .await?;

        row.map(QuotaRow::try_into_quota_state).transpose()
    }

    async fn increment_quote_count(&self, user_id: UserId) -> RepositoryResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE subscriptions
            SET quote_count = quote_count + 1, updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.get())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Row type for quota queries.
#[derive(Debug, sqlx::FromRow)]
struct QuotaRow {
    status: String,
    current_period_end: Option<DateTime<Utc>>,
    quote_count: i32,
    quote_limit: Option<i32>,
}

impl QuotaRow {
    fn try_into_quota_state(self) -> RepositoryResult<QuotaState> {
        let status = self
            .status
            .parse::<SubscriptionStatus>()
            .map_err(|e| RepositoryError::serialization(e.to_string()))?;
        let quote_count = u32::try_from(self.quote_count)
            .map_err(|_| RepositoryError::serialization("negative quote_count"))?;
        let quote_limit = self
            .quote_limit
            .map(u32::try_from)
            .transpose()
            .map_err(|_| RepositoryError::serialization("negative quote_limit"))?;

        Ok(QuotaState {
            status,
            current_period_end: self.current_period_end.map(Timestamp::from),
            quote_count,
            quote_limit,
        })
    }
}
