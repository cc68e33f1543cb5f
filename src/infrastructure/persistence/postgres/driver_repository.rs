//! # PostgreSQL Trusted Driver Repository
//!
//! Reads a user's roster from `trusted_drivers` and the tiers from
//! `pricing_rules`. Drivers come back in creation order, tiers in
//! identity (attachment) order.

use crate::domain::entities::{PricingTier, TrustedDriver};
use crate::domain::value_objects::{DriverId, Money, Timestamp, UserId};
use crate::infrastructure::persistence::traits::{
    RepositoryError, RepositoryResult, TrustedDriverRepository,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

/// PostgreSQL implementation of [`TrustedDriverRepository`].
#[derive(Debug, Clone)]
pub struct PostgresTrustedDriverRepository {
    pool: PgPool,
}

impl PostgresTrustedDriverRepository {
    /// Creates a new repository.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrustedDriverRepository for PostgresTrustedDriverRepository {
    async fn find_by_user(&self, user_id: UserId) -> RepositoryResult<Vec<TrustedDriver>> {
        let drivers: Vec<DriverRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, name, phone, vehicle_type, created_at
            FROM trusted_drivers
            WHERE user_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id.get())
        .fetch_all(&self.pool)
        .await?;

        if drivers.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = drivers.iter().map(|d| d.id).collect();
        let rules: Vec<PricingRuleRow> = sqlx::query_as(
            r#"
            SELECT driver_id, min_distance_km, max_distance_km, price_minor
            FROM pricing_rules
            WHERE driver_id = ANY($1)
            ORDER BY id ASC
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        assemble_roster(drivers, rules)
    }
}

/// Row type for driver queries.
#[derive(Debug, sqlx::FromRow)]
struct DriverRow {
    id: Uuid,
    user_id: Uuid,
    name: String,
    phone: Option<String>,
    vehicle_type: String,
    created_at: DateTime<Utc>,
}

/// Row type for pricing rule queries.
#[derive(Debug, sqlx::FromRow)]
struct PricingRuleRow {
    driver_id: Uuid,
    min_distance_km: Decimal,
    max_distance_km: Decimal,
    price_minor: i64,
}

impl PricingRuleRow {
    fn try_into_tier(self) -> RepositoryResult<PricingTier> {
        PricingTier::new(
            self.min_distance_km,
            self.max_distance_km,
            Money::from_minor(self.price_minor),
        )
        .map_err(|e| RepositoryError::serialization(e.to_string()))
    }
}

fn assemble_roster(
    drivers: Vec<DriverRow>,
    rules: Vec<PricingRuleRow>,
) -> RepositoryResult<Vec<TrustedDriver>> {
    let mut tiers: HashMap<Uuid, Vec<PricingTier>> = HashMap::new();
    for rule in rules {
        let driver_id = rule.driver_id;
        tiers.entry(driver_id).or_default().push(rule.try_into_tier()?);
    }

    Ok(drivers
        .into_iter()
        .map(|row| {
            TrustedDriver::from_parts(
                DriverId::new(row.id),
                UserId::new(row.user_id),
                row.name,
                row.phone,
                row.vehicle_type,
                tiers.remove(&row.id).unwrap_or_default(),
                Timestamp::from(row.created_at),
            )
        })
        .collect())
}
