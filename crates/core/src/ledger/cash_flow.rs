//! Cash-flow time series.

use std::collections::BTreeMap;

use chrono::{Months, NaiveDate};
use fintools_shared::resources::CashFlowPoint;
use fintools_shared::types::TransactionType;
use rust_decimal::Decimal;

use super::LedgerError;

/// Bucket width for the cash-flow series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interval {
    /// `%Y-%m-%d`
    Day,
    /// `%Y-%U`, weeks starting on Sunday.
    Week,
    /// `%Y-%m`
    #[default]
    Month,
    /// `%Y`
    Year,
}

impl Interval {
    /// `strftime` pattern producing the bucket label.
    #[must_use]
    pub const fn format(self) -> &'static str {
        match self {
            Self::Day => "%Y-%m-%d",
            Self::Week => "%Y-%U",
            Self::Month => "%Y-%m",
            Self::Year => "%Y",
        }
    }

    /// Reads a query-string label. Anything other than `day`, `week` or
    /// `month` buckets by year.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "day" => Self::Day,
            "week" => Self::Week,
            "month" => Self::Month,
            _ => Self::Year,
        }
    }
}

/// Bucket label for `date`.
#[must_use]
pub fn bucket_label(date: NaiveDate, interval: Interval) -> String {
    date.format(interval.format()).to_string()
}

/// Inclusive date range plus bucket width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CashFlowWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub interval: Interval,
}

impl CashFlowWindow {
    /// Fills in defaults: the year up to `today`, monthly buckets.
    ///
    /// # Errors
    ///
    /// Returns `InvertedRange` when the start is after the end.
    pub fn resolve(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        interval: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self, LedgerError> {
        let interval = interval.map(Interval::from_label).unwrap_or_default();
        let end = end.unwrap_or(today);
        let start = start.unwrap_or_else(|| {
            today
                .checked_sub_months(Months::new(12))
                .unwrap_or(NaiveDate::MIN)
        });

        if start > end {
            return Err(LedgerError::InvertedRange { start, end });
        }

        Ok(Self {
            start,
            end,
            interval,
        })
    }

    /// Whether `date` falls inside the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.start..=self.end).contains(&date)
    }
}

/// Groups transactions into buckets, oldest first.
///
/// Transactions outside the window are ignored.
#[must_use]
pub fn cash_flow(
    transactions: impl IntoIterator<Item = (NaiveDate, TransactionType, Decimal)>,
    window: &CashFlowWindow,
) -> Vec<CashFlowPoint> {
    let mut buckets: BTreeMap<String, CashFlowPoint> = BTreeMap::new();

    for (date, kind, amount) in transactions {
        if !window.contains(date) {
            continue;
        }
        let label = bucket_label(date, window.interval);
        let point = buckets
            .entry(label.clone())
            .or_insert_with(|| CashFlowPoint {
                period: label,
                ..CashFlowPoint::default()
            });

        match kind {
            TransactionType::Income => point.income += amount,
            TransactionType::Expense => point.expense += amount,
            TransactionType::Investment => point.investment += amount,
            TransactionType::Transfer => point.transfer += amount,
        }
    }

    buckets
        .into_values()
        .map(|mut point| {
            point.net_cash_flow = point.income - point.expense;
            point
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[rstest]
    #[case(Interval::Day, "2024-03-05")]
    #[case(Interval::Week, "2024-09")]
    #[case(Interval::Month, "2024-03")]
    #[case(Interval::Year, "2024")]
    fn test_bucket_labels(#[case] interval: Interval, #[case] expected: &str) {
        // 2024-03-05 is a Tuesday; the first Sunday of 2024 is Jan 7.
        assert_eq!(bucket_label(d(2024, 3, 5), interval), expected);
    }

    #[test]
    fn test_days_before_first_sunday_are_week_zero() {
        assert_eq!(bucket_label(d(2024, 1, 6), Interval::Week), "2024-00");
        assert_eq!(bucket_label(d(2024, 1, 7), Interval::Week), "2024-01");
    }

    #[test]
    fn test_window_defaults() {
        let today = d(2024, 6, 30);
        let window = CashFlowWindow::resolve(None, None, None, today).unwrap();
        assert_eq!(window.start, d(2023, 6, 30));
        assert_eq!(window.end, today);
        assert_eq!(window.interval, Interval::Month);
    }

    #[rstest]
    #[case("day", Interval::Day)]
    #[case("week", Interval::Week)]
    #[case("month", Interval::Month)]
    #[case("year", Interval::Year)]
    #[case("fortnight", Interval::Year)]
    #[case("", Interval::Year)]
    fn test_interval_labels(#[case] label: &str, #[case] expected: Interval) {
        let window = CashFlowWindow::resolve(None, None, Some(label), d(2024, 6, 30)).unwrap();
        assert_eq!(window.interval, expected);
    }

    #[test]
    fn test_inverted_window_rejected() {
        let today = d(2024, 6, 30);
        assert!(matches!(
            CashFlowWindow::resolve(Some(d(2024, 7, 1)), Some(d(2024, 6, 1)), None, today),
            Err(LedgerError::InvertedRange { .. })
        ));
    }

    #[test]
    fn test_cash_flow_groups_and_orders() {
        let window = CashFlowWindow::resolve(
            Some(d(2024, 1, 1)),
            Some(d(2024, 3, 31)),
            Some("month"),
            d(2024, 6, 1),
        )
        .unwrap();

        let points = cash_flow(
            vec![
                (d(2024, 3, 2), TransactionType::Income, dec!(100)),
                (d(2024, 1, 9), TransactionType::Income, dec!(500)),
                (d(2024, 1, 20), TransactionType::Expense, dec!(200)),
                (d(2024, 1, 21), TransactionType::Transfer, dec!(50)),
                (d(2024, 3, 30), TransactionType::Investment, dec!(1000)),
                // Outside the window.
                (d(2024, 4, 1), TransactionType::Income, dec!(999)),
            ],
            &window,
        );

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].period, "2024-01");
        assert_eq!(points[0].income, dec!(500));
        assert_eq!(points[0].expense, dec!(200));
        assert_eq!(points[0].transfer, dec!(50));
        assert_eq!(points[0].net_cash_flow, dec!(300));
        assert_eq!(points[1].period, "2024-03");
        assert_eq!(points[1].investment, dec!(1000));
        assert_eq!(points[1].net_cash_flow, dec!(100));
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let window = CashFlowWindow {
            start: d(2024, 1, 1),
            end: d(2024, 1, 31),
            interval: Interval::Day,
        };
        assert!(window.contains(d(2024, 1, 1)));
        assert!(window.contains(d(2024, 1, 31)));
        assert!(!window.contains(d(2024, 2, 1)));
    }
}
