//! Property-based tests for dashboard aggregation.

use chrono::NaiveDate;
use fintools_shared::types::{Account, TransactionType};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::{CashFlowWindow, CashMovement, Interval, SummaryInputs, cash_flow, summarize};

fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn transaction_type() -> impl Strategy<Value = TransactionType> {
    prop::sample::select(TransactionType::ALL.to_vec())
}

fn account() -> impl Strategy<Value = Account> {
    prop::sample::select(Account::ALL.to_vec())
}

fn date() -> impl Strategy<Value = NaiveDate> {
    (0i64..730).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap() + chrono::Duration::days(offset)
    })
}

fn interval() -> impl Strategy<Value = Interval> {
    prop_oneof![
        Just(Interval::Day),
        Just(Interval::Week),
        Just(Interval::Month),
        Just(Interval::Year),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Pure profit is revenue minus expenses for any inputs, including none.
    #[test]
    fn prop_pure_profit(
        expenses in prop::collection::vec(amount(), 0..20),
        revenues in prop::collection::vec(amount(), 0..20),
    ) {
        let inputs = SummaryInputs {
            expense_amounts: expenses.clone(),
            revenue_amounts: revenues.clone(),
            ..SummaryInputs::default()
        };
        let summary = summarize(&inputs);

        let total_expenses: Decimal = expenses.iter().sum();
        let total_revenue: Decimal = revenues.iter().sum();
        prop_assert_eq!(summary.total_expenses, total_expenses);
        prop_assert_eq!(summary.total_revenue, total_revenue);
        prop_assert_eq!(summary.pure_profit, total_revenue - total_expenses);
    }

    /// Balances across accounts add up to the signed sum of all movements.
    #[test]
    fn prop_balances_sum_to_signed_total(
        movements in prop::collection::vec((transaction_type(), account(), amount()), 0..30),
    ) {
        let movements: Vec<CashMovement> = movements
            .into_iter()
            .map(|(transaction_type, account, amount)| CashMovement { transaction_type, account, amount })
            .collect();
        let summary = summarize(&SummaryInputs { movements: movements.clone(), ..SummaryInputs::default() });

        let signed: Decimal = movements
            .iter()
            .map(|m| super::signed_amount(m.transaction_type, m.amount))
            .sum();
        let total: Decimal = summary.cash_balance.values().sum();
        prop_assert_eq!(total, signed);
    }

    /// Buckets are ascending and net cash flow is income minus expense.
    #[test]
    fn prop_cash_flow_ordered(
        rows in prop::collection::vec((date(), transaction_type(), amount()), 0..40),
        interval in interval(),
    ) {
        let window = CashFlowWindow {
            start: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            interval,
        };
        let points = cash_flow(rows.clone(), &window);

        for pair in points.windows(2) {
            prop_assert!(pair[0].period < pair[1].period);
        }
        for p in &points {
            prop_assert_eq!(p.net_cash_flow, p.income - p.expense);
        }

        let bucketed: Decimal = points
            .iter()
            .map(|p| p.income + p.expense + p.investment + p.transfer)
            .sum();
        let raw: Decimal = rows.iter().map(|(_, _, a)| *a).sum();
        prop_assert_eq!(bucketed, raw);
    }
}
