//! # Quote Aggregation
//!
//! Orchestrates a hybrid shipping quote.
//!
//! 1. The [`QuotaGuard`] admits or rejects the caller before any external call.
//! 2. Carrier rates and local driver quotes are collected concurrently. The
//!    carrier gets a bounded wait; its failure or timeout fails the whole
//!    quote and discards the local options.
//! 3. Carrier options (provider order) are followed by local options
//!    (roster order).
//! 4. A [`QuoteRecord`] is appended and the usage counter incremented. Both
//!    writes are best-effort: failures are logged and the quote is still
//!    returned.
//!
//! The guard's read and the final increment are not synchronized, so
//! concurrent requests from one user may each pass the guard and push the
//! counter past the plan limit. The increment itself is atomic.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::local_quotes::LocalDriverQuoteEngine;
use crate::application::services::quota_guard::QuotaGuard;
use crate::domain::entities::{QuoteRecord, ShippingOption, ShippingRequest};
use crate::domain::value_objects::{QuoteId, UserId};
use crate::infrastructure::persistence::{
    QuoteHistoryRepository, SubscriptionRepository, TrustedDriverRepository,
};
use crate::infrastructure::providers::CarrierRateClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info, instrument, warn};

/// Configuration for quote aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationConfig {
    /// Overall timeout for the concurrent collection phase in milliseconds.
    pub timeout_ms: u64,
    /// Carrier fetch timeout in milliseconds.
    pub carrier_timeout_ms: u64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10000,
            carrier_timeout_ms: 10000,
        }
    }
}

impl AggregationConfig {
    /// Creates a new configuration with the specified overall timeout.
    #[must_use]
    pub fn with_timeout(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            ..Default::default()
        }
    }

    /// Sets the carrier timeout.
    #[must_use]
    pub fn with_carrier_timeout(mut self, timeout_ms: u64) -> Self {
        self.carrier_timeout_ms = timeout_ms;
        self
    }
}

/// Outcome of a successful aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteResult {
    /// Merged options, carrier first.
    pub options: Vec<ShippingOption>,
    /// How many of `options` came from the carrier.
    pub carrier_count: usize,
    /// How many of `options` came from local drivers.
    pub local_count: usize,
    /// Id of the stored history record, if the write succeeded.
    pub record_id: Option<QuoteId>,
}

impl QuoteResult {
    /// Returns true if the quote was written to history.
    #[must_use]
    pub fn history_recorded(&self) -> bool {
        self.record_id.is_some()
    }
}

/// Collaborators used by the aggregator.
#[derive(Debug, Clone)]
pub struct QuotePorts {
    /// Carrier-rate provider.
    pub carrier: Arc<dyn CarrierRateClient>,
    /// Driver rosters.
    pub drivers: Arc<dyn TrustedDriverRepository>,
    /// Quota state and counter.
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    /// Quote history.
    pub history: Arc<dyn QuoteHistoryRepository>,
}

/// Hybrid quote orchestrator.
#[derive(Debug, Clone)]
pub struct QuoteAggregator {
    guard: QuotaGuard,
    ports: QuotePorts,
    local: LocalDriverQuoteEngine,
    config: AggregationConfig,
}

impl QuoteAggregator {
    /// Creates a new aggregator.
    #[must_use]
    pub fn new(ports: QuotePorts, local: LocalDriverQuoteEngine, config: AggregationConfig) -> Self {
        Self {
            guard: QuotaGuard::new(Arc::clone(&ports.subscriptions)),
            ports,
            local,
            config,
        }
    }

    /// Creates a new aggregator with default configuration.
    #[must_use]
    pub fn with_defaults(ports: QuotePorts, local: LocalDriverQuoteEngine) -> Self {
        Self::new(ports, local, AggregationConfig::default())
    }

    /// Returns the current configuration.
    #[must_use]
    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// Produces a merged quote for `principal`.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::Unauthenticated` - no principal
    /// - `ApplicationError::QuotaDenied` - subscription does not allow quoting
    /// - `ApplicationError::CarrierUnavailable` - carrier failed, or carrier or
    ///   overall timeout elapsed
    /// - `ApplicationError::Repository` - subscription could not be read
    #[instrument(skip_all, fields(origin = request.origin(), destination = request.destination()))]
    pub async fn aggregate(
        &self,
        request: &ShippingRequest,
        principal: Option<UserId>,
    ) -> ApplicationResult<QuoteResult> {
        let user_id = self.guard.check(principal).await?;

        let overall = Duration::from_millis(self.config.timeout_ms);
        let (carrier_options, local_options) =
            match timeout(overall, self.collect(request, user_id)).await {
                Ok(collected) => collected?,
                Err(_) => {
                    warn!(timeout_ms = self.config.timeout_ms, "quote collection timed out");
                    return Err(ApplicationError::carrier_unavailable(format!(
                        "quote collection timed out after {}ms",
                        self.config.timeout_ms
                    )));
                }
            };

        let carrier_count = carrier_options.len();
        let local_count = local_options.len();
        let mut options = carrier_options;
        options.extend(local_options);

        let record_id = self.record(user_id, request, &options).await;

        info!(
            %user_id,
            carrier_count,
            local_count,
            recorded = record_id.is_some(),
            "quote aggregated"
        );

        Ok(QuoteResult {
            options,
            carrier_count,
            local_count,
            record_id,
        })
    }

    /// Runs the carrier fetch and the local quote concurrently.
    ///
    /// A carrier failure short-circuits and drops the local branch.
    async fn collect(
        &self,
        request: &ShippingRequest,
        user_id: UserId,
    ) -> ApplicationResult<(Vec<ShippingOption>, Vec<ShippingOption>)> {
        let carrier = self.fetch_carrier(request);
        let local = async { Ok::<_, ApplicationError>(self.quote_local(request, user_id).await) };
        tokio::try_join!(carrier, local)
    }

    async fn fetch_carrier(&self, request: &ShippingRequest) -> ApplicationResult<Vec<ShippingOption>> {
        let carrier_timeout = Duration::from_millis(self.config.carrier_timeout_ms);
        match timeout(carrier_timeout, self.ports.carrier.fetch(request)).await {
            Ok(Ok(options)) => Ok(options),
            Ok(Err(e)) => {
                error!(
                    error = %e,
                    status = ?e.status(),
                    transient = e.is_transient(),
                    "carrier request failed"
                );
                Err(ApplicationError::from(e))
            }
            Err(_) => {
                error!(timeout_ms = self.config.carrier_timeout_ms, "carrier request timed out");
                Err(ApplicationError::carrier_unavailable(format!(
                    "carrier timed out after {}ms",
                    self.config.carrier_timeout_ms
                )))
            }
        }
    }

    async fn quote_local(&self, request: &ShippingRequest, user_id: UserId) -> Vec<ShippingOption> {
        let roster = match self.ports.drivers.find_by_user(user_id).await {
            Ok(roster) => roster,
            Err(e) => {
                warn!(%user_id, error = %e, "driver roster unavailable, skipping local options");
                return Vec::new();
            }
        };
        if roster.is_empty() {
            debug!(%user_id, "no trusted drivers");
            return Vec::new();
        }
        self.local.quote(request, &roster).await
    }

    /// Appends the history record, then increments the counter regardless
    /// of the history outcome.
    async fn record(
        &self,
        user_id: UserId,
        request: &ShippingRequest,
        options: &[ShippingOption],
    ) -> Option<QuoteId> {
        let record = QuoteRecord::new(user_id, request.clone(), options.to_vec());
        let record_id = match record.to_stored() {
            Ok(stored) => match self.ports.history.save(&stored).await {
                Ok(()) => Some(record.id()),
                Err(e) => {
                    error!(%user_id, error = %e, "failed to save quote history");
                    None
                }
            },
            Err(e) => {
                error!(%user_id, error = %e, "failed to encode quote history");
                None
            }
        };

        match self.ports.subscriptions.increment_quote_count(user_id).await {
            Ok(true) => {}
            Ok(false) => warn!(%user_id, "no subscription to increment"),
            Err(e) => error!(%user_id, error = %e, "failed to increment quote count"),
        }

        record_id
    }
}
