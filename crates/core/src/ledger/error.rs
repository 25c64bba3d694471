//! Aggregation query errors.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while building dashboard queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Start date after end date.
    #[error("Start date {start} is after end date {end}")]
    InvertedRange {
        /// Requested start.
        start: NaiveDate,
        /// Requested end.
        end: NaiveDate,
    },
}
