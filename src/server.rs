//! # Server Wiring
//!
//! Builds the handler state from configuration. PostgreSQL is used when
//! `database.url` is set; otherwise every store is in memory and starts
//! empty.

use crate::api::rest::{AppState, JwtAuthenticator};
use crate::application::services::{
    LocalDriverQuoteEngine, QuoteAggregator, QuoteHistoryService, QuotePorts,
};
use crate::config::{AppConfig, DatabaseConfig};
use crate::domain::entities::Plan;
use crate::infrastructure::persistence::in_memory::{
    InMemoryQuoteHistoryRepository, InMemorySubscriptionRepository,
    InMemoryTrustedDriverRepository,
};
use crate::infrastructure::persistence::postgres::{
    PostgresQuoteHistoryRepository, PostgresSubscriptionRepository,
    PostgresTrustedDriverRepository, seed_plans,
};
use crate::infrastructure::persistence::{
    QuoteHistoryRepository, SubscriptionRepository, TrustedDriverRepository,
};
use crate::infrastructure::providers::{
    GoogleDistanceResolver, MelhorEnvioClient, MelhorEnvioConfig,
};
use anyhow::Context;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

struct Stores {
    drivers: Arc<dyn TrustedDriverRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    history: Arc<dyn QuoteHistoryRepository>,
}

/// Builds the handler state.
///
/// # Errors
///
/// Fails if the database is unreachable, migrations or seeding fail, or an
/// HTTP client cannot be built.
pub async fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let stores = match config.database.url.as_deref() {
        Some(url) => postgres_stores(url, &config.database).await?,
        None => {
            warn!("database.url not set, using in-memory stores");
            in_memory_stores()
        }
    };

    let carrier = MelhorEnvioClient::new(
        &MelhorEnvioConfig::new(
            config.carrier.api_url.clone(),
            config.carrier.api_token.clone(),
            config.carrier.user_agent.clone(),
        )
        .with_timeout_ms(config.carrier.timeout_ms),
    )
    .context("building carrier client")?;
    let distance = GoogleDistanceResolver::new(
        &config.distance.api_url,
        config.distance.api_key.clone(),
        config.distance.timeout_ms,
    )
    .context("building distance client")?;

    let ports = QuotePorts {
        carrier: Arc::new(carrier),
        drivers: stores.drivers,
        subscriptions: stores.subscriptions,
        history: Arc::clone(&stores.history),
    };
    let local = LocalDriverQuoteEngine::new(Arc::new(distance), config.quotes.local());
    let aggregator = QuoteAggregator::new(ports, local, config.quotes.aggregation());

    Ok(AppState {
        aggregator: Arc::new(aggregator),
        history: Arc::new(QuoteHistoryService::new(stores.history)),
        authenticator: Arc::new(JwtAuthenticator::new(
            config.auth.jwt_secret.as_bytes(),
            config.auth.issuer.as_deref(),
        )),
    })
}

async fn postgres_stores(url: &str, db: &DatabaseConfig) -> anyhow::Result<Stores> {
    let pool = PgPoolOptions::new()
        .max_connections(db.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(url)
        .await
        .context("connecting to database")?;
    prepare(&pool).await?;

    Ok(Stores {
        drivers: Arc::new(PostgresTrustedDriverRepository::new(pool.clone())),
        subscriptions: Arc::new(PostgresSubscriptionRepository::new(pool.clone())),
        history: Arc::new(PostgresQuoteHistoryRepository::new(pool)),
    })
}

async fn prepare(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("running migrations")?;
    let seeded = seed_plans(pool, &Plan::defaults())
        .await
        .context("seeding plans")?;
    if seeded > 0 {
        info!(plans = seeded, "seeded subscription plans");
    }
    Ok(())
}

fn in_memory_stores() -> Stores {
    Stores {
        drivers: Arc::new(InMemoryTrustedDriverRepository::new()),
        subscriptions: Arc::new(InMemorySubscriptionRepository::new()),
        history: Arc::new(InMemoryQuoteHistoryRepository::new()),
    }
}
