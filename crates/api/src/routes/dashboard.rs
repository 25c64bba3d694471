//! Dashboard routes.

use axum::{
    Router,
    extract::{Query, State, rejection::QueryRejection},
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    AppState,
    middleware::AuthUser,
    response::{failure, list, map_dashboard_error, map_db_error, ok},
};
use fintools_db::DashboardRepository;
use fintools_shared::AppError;

/// Creates the dashboard routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/summary", get(summary))
        .route("/dashboard/cash-flow", get(cash_flow))
        .route("/dashboard/founder-contributions", get(founder_contributions))
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters for the cash-flow series.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowQuery {
    /// Inclusive start; defaults to a year before the end.
    pub start_date: Option<NaiveDate>,
    /// Inclusive end; defaults to today.
    pub end_date: Option<NaiveDate>,
    /// `day`, `week`, `month` (default) or `year`.
    pub interval: Option<String>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/dashboard/summary` - Totals, profit and per-account balances.
async fn summary(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let repo = DashboardRepository::new((*state.db).clone());
    match repo.summary().await {
        Ok(summary) => ok(summary),
        Err(e) => failure("Failed to build financial summary", &map_dashboard_error(e)),
    }
}

/// GET `/dashboard/cash-flow` - Transaction totals per period.
async fn cash_flow(
    State(state): State<AppState>,
    _auth: AuthUser,
    query: Result<Query<CashFlowQuery>, QueryRejection>,
) -> impl IntoResponse {
    let Query(query) = match query {
        Ok(q) => q,
        Err(rejection) => {
            return failure(
                "Rejected cash-flow query",
                &AppError::validation(rejection.body_text()),
            );
        }
    };

    let repo = DashboardRepository::new((*state.db).clone());
    match repo
        .cash_flow(query.start_date, query.end_date, query.interval.as_deref())
        .await
    {
        Ok(points) => ok(points),
        Err(e) => failure("Failed to build cash flow", &map_dashboard_error(e)),
    }
}

/// GET `/dashboard/founder-contributions`
async fn founder_contributions(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> impl IntoResponse {
    let repo = DashboardRepository::new((*state.db).clone());
    match repo.founder_contributions().await {
        Ok(founders) => list(founders),
        Err(e) => failure("Failed to list founder contributions", &map_db_error(e)),
    }
}
