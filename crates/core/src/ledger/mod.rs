//! Dashboard aggregation.
//!
//! This module implements the read-side math:
//! - Financial summary (totals, pure profit, cash balance per account)
//! - Cash-flow series bucketed by day, week, month, or year
//! - Error types for aggregation queries

pub mod cash_flow;
pub mod error;
pub mod summary;

#[cfg(test)]
mod props;

pub use cash_flow::{CashFlowWindow, Interval, bucket_label, cash_flow};
pub use error::LedgerError;
pub use summary::{CashMovement, SummaryInputs, cash_balances, signed_amount, summarize};
