//! Dashboard repository: reads the columns the aggregation math needs.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QuerySelect,
};

use fintools_core::auth::UserRole;
use fintools_core::ledger::{
    CashFlowWindow, CashMovement, LedgerError, SummaryInputs, cash_flow, summarize,
};
use fintools_shared::resources::{CashFlowPoint, FinancialSummary, FounderContribution};
use fintools_shared::types::{Account, TransactionType};

use super::UserRepository;
use super::views::label;
use crate::entities::{assets, expenses, revenues, transactions, users};

/// Error types for dashboard operations.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Cash-flow window rejected.
    #[error(transparent)]
    Window(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Dashboard repository.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    db: DatabaseConnection,
}

impl DashboardRepository {
    /// Creates a new dashboard repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Totals across every collection plus the cash balance per account.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails or a stored label is unknown.
    pub async fn summary(&self) -> Result<FinancialSummary, DashboardError> {
        let expense_amounts: Vec<Decimal> = expenses::Entity::find()
            .select_only()
            .column(expenses::Column::Amount)
            .into_tuple()
            .all(&self.db)
            .await?;

        let revenue_amounts: Vec<Decimal> = revenues::Entity::find()
            .select_only()
            .column(revenues::Column::Amount)
            .into_tuple()
            .all(&self.db)
            .await?;

        let asset_values: Vec<Decimal> = assets::Entity::find()
            .select_only()
            .column(assets::Column::CurrentValue)
            .into_tuple()
            .all(&self.db)
            .await?;

        let founder_contributions: Vec<Decimal> = users::Entity::find()
            .filter(users::Column::Role.eq(UserRole::Founder.as_str()))
            .select_only()
            .column(users::Column::FundContribution)
            .into_tuple()
            .all(&self.db)
            .await?;

        let rows: Vec<(String, String, Decimal)> = transactions::Entity::find()
            .select_only()
            .column(transactions::Column::TransactionType)
            .column(transactions::Column::Account)
            .column(transactions::Column::Amount)
            .into_tuple()
            .all(&self.db)
            .await?;

        let movements = rows
            .into_iter()
            .map(|(kind, account, amount)| {
                Ok(CashMovement {
                    transaction_type: label("transactions.transaction_type", &kind)?,
                    account: label::<Account>("transactions.account", &account)?,
                    amount,
                })
            })
            .collect::<Result<Vec<_>, DbErr>>()?;

        Ok(summarize(&SummaryInputs {
            expense_amounts,
            revenue_amounts,
            asset_values,
            founder_contributions,
            movements,
        }))
    }

    /// Transaction totals bucketed by date.
    ///
    /// Missing bounds default to the twelve months up to today and the
    /// interval defaults to monthly.
    ///
    /// # Errors
    ///
    /// Returns `Window` when the start is after the end. An unrecognised
    /// interval buckets by year.
    pub async fn cash_flow(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        interval: Option<&str>,
    ) -> Result<Vec<CashFlowPoint>, DashboardError> {
        let window = CashFlowWindow::resolve(start, end, interval, Utc::now().date_naive())?;

        let rows: Vec<(NaiveDate, String, Decimal)> = transactions::Entity::find()
            .filter(transactions::Column::Date.between(window.start, window.end))
            .select_only()
            .column(transactions::Column::Date)
            .column(transactions::Column::TransactionType)
            .column(transactions::Column::Amount)
            .into_tuple()
            .all(&self.db)
            .await?;

        let entries = rows
            .into_iter()
            .map(|(date, kind, amount)| {
                let kind: TransactionType = label("transactions.transaction_type", &kind)?;
                Ok((date, kind, amount))
            })
            .collect::<Result<Vec<_>, DbErr>>()?;

        Ok(cash_flow(entries, &window))
    }

    /// Every founder and their contribution.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn founder_contributions(&self) -> Result<Vec<FounderContribution>, DbErr> {
        UserRepository::new(self.db.clone()).founders().await
    }
}
