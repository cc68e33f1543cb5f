//! # Plan Seeding
//!
//! Creates the default plans on first start.

use crate::domain::entities::Plan;
use crate::infrastructure::persistence::traits::RepositoryResult;
use sqlx::PgPool;
use tracing::info;

/// Inserts the given plans if the `plans` table is empty.
///
/// Returns the number of plans inserted.
///
/// # Errors
///
/// Returns `RepositoryError` if a query fails.
pub async fn seed_plans(pool: &PgPool, plans: &[Plan]) -> RepositoryResult<u64> {
    let (existing,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM plans")
        .fetch_one(pool)
        .await?;

    if existing > 0 {
        info!(existing, "plans already present");
        return Ok(0);
    }

    let mut inserted = 0;
    for plan in plans {
        let result = sqlx::query(
            r#"
            INSERT INTO plans (name, price_minor, quote_limit)
            VALUES ($1, $2, $3)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(&plan.name)
        .bind(plan.price.minor_units())
        .bind(plan.quote_limit.map(|l| i32::try_from(l).unwrap_or(i32::MAX)))
        .execute(pool)
        .await?;
        inserted += result.rows_affected();
    }

    info!(inserted, "default plans created");
    Ok(inserted)
}
