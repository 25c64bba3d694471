//! Financial summary arithmetic.

use std::collections::BTreeMap;

use fintools_shared::resources::FinancialSummary;
use fintools_shared::types::{Account, TransactionType};
use rust_decimal::Decimal;

/// One transaction as seen by the cash balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CashMovement {
    pub transaction_type: TransactionType,
    pub account: Account,
    pub amount: Decimal,
}

/// Raw column values the summary is computed from.
#[derive(Debug, Clone, Default)]
pub struct SummaryInputs {
    pub expense_amounts: Vec<Decimal>,
    pub revenue_amounts: Vec<Decimal>,
    pub asset_values: Vec<Decimal>,
    pub founder_contributions: Vec<Decimal>,
    pub movements: Vec<CashMovement>,
}

/// Contribution of a transaction to its account balance.
///
/// Income and investment add; expense and transfer subtract. A transfer is
/// booked only as a debit on its own account, with no matching credit
/// elsewhere, so transfers reduce the total cash position.
#[must_use]
pub fn signed_amount(transaction_type: TransactionType, amount: Decimal) -> Decimal {
    match transaction_type {
        TransactionType::Income | TransactionType::Investment => amount,
        TransactionType::Expense | TransactionType::Transfer => -amount,
    }
}

/// Running balance per account. Accounts without transactions are absent.
#[must_use]
pub fn cash_balances<'a>(
    movements: impl IntoIterator<Item = &'a CashMovement>,
) -> BTreeMap<Account, Decimal> {
    let mut balances = BTreeMap::new();
    for m in movements {
        let balance = balances.entry(m.account).or_insert(Decimal::ZERO);
        *balance = balance.saturating_add(signed_amount(m.transaction_type, m.amount));
    }
    balances
}

/// Saturating sum; stored amounts can exceed what a `Decimal` total holds.
fn total(amounts: &[Decimal]) -> Decimal {
    amounts
        .iter()
        .fold(Decimal::ZERO, |acc, amount| acc.saturating_add(*amount))
}

/// Builds the dashboard summary. Totals saturate at the `Decimal` bounds.
#[must_use]
pub fn summarize(inputs: &SummaryInputs) -> FinancialSummary {
    let total_expenses = total(&inputs.expense_amounts);
    let total_revenue = total(&inputs.revenue_amounts);

    FinancialSummary {
        total_expenses,
        total_revenue,
        pure_profit: total_revenue.saturating_sub(total_expenses),
        total_assets: total(&inputs.asset_values),
        founder_contributions: total(&inputs.founder_contributions),
        cash_balance: cash_balances(&inputs.movements),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn movement(
        transaction_type: TransactionType,
        account: Account,
        amount: Decimal,
    ) -> CashMovement {
        CashMovement {
            transaction_type,
            account,
            amount,
        }
    }

    #[test]
    fn test_empty_summary_is_zero() {
        let summary = summarize(&SummaryInputs::default());
        assert_eq!(summary, FinancialSummary::default());
        assert!(summary.cash_balance.is_empty());
    }

    #[test]
    fn test_summary_totals() {
        let inputs = SummaryInputs {
            expense_amounts: vec![dec!(2500), dec!(100.50)],
            revenue_amounts: vec![dec!(2800)],
            asset_values: vec![dec!(10000)],
            founder_contributions: vec![dec!(5000), dec!(2500)],
            movements: vec![],
        };

        let summary = summarize(&inputs);

        assert_eq!(summary.total_expenses, dec!(2600.50));
        assert_eq!(summary.total_revenue, dec!(2800));
        assert_eq!(summary.pure_profit, dec!(199.50));
        assert_eq!(summary.total_assets, dec!(10000));
        assert_eq!(summary.founder_contributions, dec!(7500));
    }

    #[test]
    fn test_cash_balance_signs() {
        let movements = vec![
            movement(TransactionType::Income, Account::Main, dec!(1000)),
            movement(TransactionType::Expense, Account::Main, dec!(300)),
            movement(TransactionType::Investment, Account::Savings, dec!(500)),
            movement(TransactionType::Transfer, Account::Savings, dec!(200)),
        ];

        let balances = cash_balances(&movements);

        assert_eq!(balances[&Account::Main], dec!(700));
        assert_eq!(balances[&Account::Savings], dec!(300));
        assert!(!balances.contains_key(&Account::PettyCash));
    }

    #[test]
    fn test_oversized_totals_saturate() {
        let inputs = SummaryInputs {
            revenue_amounts: vec![Decimal::MAX, Decimal::MAX],
            expense_amounts: vec![Decimal::MAX],
            ..SummaryInputs::default()
        };

        let summary = summarize(&inputs);

        assert_eq!(summary.total_revenue, Decimal::MAX);
        assert_eq!(summary.pure_profit, Decimal::ZERO);
    }

    #[test]
    fn test_transfer_is_net_negative() {
        let balances = cash_balances(&[movement(
            TransactionType::Transfer,
            Account::Main,
            dec!(50),
        )]);
        assert_eq!(balances[&Account::Main], dec!(-50));
    }
}
