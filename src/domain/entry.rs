//! Entry Entity
//!
//! A single recorded data point for a tracker. The `date_str` day key is
//! derived from the timestamp once, at write time, so day-bucketed
//! aggregation stays stable across timezone changes on later reads.

use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// Canonical `YYYY-MM-DD` local-date key for an epoch-millis timestamp.
/// Empty for out-of-range timestamps.
pub fn date_str_from_timestamp(timestamp_ms: i64) -> String {
    match Local.timestamp_millis_opt(timestamp_ms) {
        chrono::LocalResult::Single(dt) => dt.format("%Y-%m-%d").to_string(),
        _ => String::new(),
    }
}

/// A recorded data point. Immutable once aggregated over; deletion cascades
/// nothing beyond recomputed aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique identifier
    pub id: u32,
    /// Owning tracker
    pub tracker_id: u32,
    /// Recorded value; `None` for plain check-ins
    pub value: Option<f64>,
    pub note: Option<String>,
    /// Free-form JSON blob for composite trackers
    pub metadata: Option<String>,
    /// Epoch millis
    pub timestamp: i64,
    /// Derived `YYYY-MM-DD` day key, indexed for day-bucketing
    pub date_str: String,
}

impl Entry {
    /// Create a new entry, fixing `date_str` from the timestamp
    pub fn new(id: u32, tracker_id: u32, value: Option<f64>, timestamp: i64) -> Self {
        Self {
            id,
            tracker_id,
            value,
            note: None,
            metadata: None,
            timestamp,
            date_str: date_str_from_timestamp(timestamp),
        }
    }

    /// Contribution to day aggregates: a check-in without a number counts
    /// as one occurrence
    pub fn day_value(&self) -> f64 {
        self.value.unwrap_or(1.0)
    }
}

impl Entity for Entry {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_str_matches_timestamp() {
        let entry = Entry::new(1, 2, Some(3.0), 1704103200000);
        assert_eq!(entry.date_str, date_str_from_timestamp(entry.timestamp));
        assert_eq!(entry.date_str.len(), 10);
    }

    #[test]
    fn test_day_value_defaults_to_one() {
        assert_eq!(Entry::new(1, 1, None, 0).day_value(), 1.0);
        assert_eq!(Entry::new(1, 1, Some(2.5), 0).day_value(), 2.5);
    }
}
