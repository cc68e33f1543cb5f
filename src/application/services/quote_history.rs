//! # Quote History
//!
//! Lists a user's past quotes, most recent first.
//!
//! Stored documents are decoded per record. A request document that cannot
//! be decoded leaves the package empty; an unreadable result document yields
//! no options. Either way the entry is still listed.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::entities::quote_record::{decode_options, decode_request};
use crate::domain::entities::{PackageDimensions, ShippingOption, StoredQuote};
use crate::domain::value_objects::{QuoteId, Timestamp, UserId};
use crate::infrastructure::persistence::QuoteHistoryRepository;
use std::sync::Arc;
use tracing::warn;

/// One history entry as shown to its owner.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteHistoryEntry {
    /// Record identifier.
    pub id: QuoteId,
    /// Origin postal code.
    pub origin: String,
    /// Destination postal code.
    pub destination: String,
    /// Package, if the request document could be decoded.
    pub package: Option<PackageDimensions>,
    /// Merged options as returned at quote time.
    pub options: Vec<ShippingOption>,
    /// Creation time.
    pub created_at: Timestamp,
}

impl QuoteHistoryEntry {
    fn from_stored(stored: StoredQuote) -> Self {
        let package = match decode_request(&stored.request_payload) {
            Ok(request) => Some(*request.package()),
            Err(e) => {
                warn!(quote_id = %stored.id, error = %e, "unreadable request payload");
                None
            }
        };
        let options = decode_options(&stored.result_payload).unwrap_or_else(|e| {
            warn!(quote_id = %stored.id, error = %e, "unreadable result payload");
            Vec::new()
        });

        Self {
            id: stored.id,
            origin: stored.origin,
            destination: stored.destination,
            package,
            options,
            created_at: stored.created_at,
        }
    }
}

/// Read side of the quote history.
#[derive(Debug, Clone)]
pub struct QuoteHistoryService {
    history: Arc<dyn QuoteHistoryRepository>,
}

impl QuoteHistoryService {
    /// Creates the service.
    #[must_use]
    pub fn new(history: Arc<dyn QuoteHistoryRepository>) -> Self {
        Self { history }
    }

    /// Lists the principal's quotes, most recent first.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::Unauthenticated` - no principal
    /// - `ApplicationError::Repository` - storage failure
    pub async fn list(&self, principal: Option<UserId>) -> ApplicationResult<Vec<QuoteHistoryEntry>> {
        let user_id = principal.ok_or(ApplicationError::Unauthenticated)?;
        let stored = self.history.find_by_user(user_id).await?;
        Ok(stored.into_iter().map(QuoteHistoryEntry::from_stored).collect())
    }
}
