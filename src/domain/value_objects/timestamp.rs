//! # Timestamp Value Object
//!
//! UTC point in time used for subscription billing periods and quote
//! history records.
//!
//! # Examples
//!
//! ```
//! use rotacerta_quotes::domain::value_objects::timestamp::Timestamp;
//!
//! let now = Timestamp::now();
//! let period_end = now.add_days(30);
//!
//! assert!(period_end.is_after(&now));
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A UTC timestamp.
///
/// Wraps `chrono::DateTime<Utc>`. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Returns a timestamp `secs` seconds earlier.
    #[must_use]
    pub fn sub_secs(&self, secs: i64) -> Self {
        Self(self.0 - Duration::seconds(secs))
    }

    /// Returns a timestamp `days` days later.
    #[must_use]
    pub fn add_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// Returns true if this timestamp is strictly after `other`.
    #[inline]
    #[must_use]
    pub fn is_after(&self, other: &Self) -> bool {
        self.0 > other.0
    }

    /// Returns the wrapped `DateTime<Utc>`.
    #[inline]
    #[must_use]
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> Timestamp {
        Timestamp::from(Utc.timestamp_opt(secs, 0).single().unwrap())
    }

    #[test]
    fn ordering_is_strict() {
        let ts = at(1_000);
        assert!(!ts.is_after(&ts));
        assert!(ts.is_after(&ts.sub_secs(1)));
        assert!(!ts.sub_secs(1).is_after(&ts));
    }

    #[test]
    fn add_days_moves_forward() {
        let ts = at(0);
        assert_eq!(ts.add_days(1).as_datetime().timestamp(), 86_400);
    }

    #[test]
    fn converts_to_and_from_datetime() {
        let dt = Utc.timestamp_opt(1_704_067_200, 0).single().unwrap();
        assert_eq!(DateTime::<Utc>::from(Timestamp::from(dt)), dt);
    }

    #[test]
    fn serializes_as_rfc3339() {
        let json = serde_json::to_string(&at(0)).unwrap();
        assert!(json.contains("1970-01-01T00:00:00"));
    }
}
