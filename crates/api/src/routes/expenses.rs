//! Expense routes.
//!
//! Writing an expense may derive a product; the product travels next to the
//! expense in the envelope, and a failed derivation comes back as a warning.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    AppState,
    extractors::ValidatedJson,
    middleware::AuthUser,
    response::{failure, list, map_db_error, map_expense_error, ok, respond},
};
use fintools_db::{ExpenseRepository, repositories::ExpenseWrite};
use fintools_shared::requests::{CreateExpenseRequest, UpdateExpenseRequest};
use fintools_shared::{ApiEnvelope, AppError};

/// Creates the expense routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route(
            "/expenses/{id}",
            get(get_expense).put(update_expense).delete(delete_expense),
        )
        .route("/expenses/{id}/approve", put(approve_expense))
        .route("/expenses/{id}/product", get(expense_product))
}

/// Payload returned after deleting an expense.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExpenseDeleted {
    removed_products: usize,
}

fn written(status: StatusCode, write: ExpenseWrite) -> Response {
    let envelope = ApiEnvelope {
        product: write.product,
        ..ApiEnvelope::ok(write.expense)
    };
    respond(status, envelope.with_warnings(write.warnings))
}

/// GET /expenses
async fn list_expenses(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let repo = ExpenseRepository::new((*state.db).clone());
    match repo.list().await {
        Ok(expenses) => list(expenses),
        Err(e) => failure("Failed to list expenses", &map_db_error(e)),
    }
}

/// GET /expenses/{id}
async fn get_expense(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ExpenseRepository::new((*state.db).clone());
    match repo.get(id).await {
        Ok(expense) => ok(expense),
        Err(e) => failure("Failed to get expense", &map_expense_error(e)),
    }
}

/// POST /expenses
async fn create_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateExpenseRequest>,
) -> impl IntoResponse {
    let repo = ExpenseRepository::new((*state.db).clone());
    match repo.create(auth.user_id(), payload).await {
        Ok(write) => written(StatusCode::CREATED, write),
        Err(e) => failure("Failed to create expense", &map_expense_error(e)),
    }
}

/// PUT /expenses/{id}
async fn update_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateExpenseRequest>,
) -> impl IntoResponse {
    let repo = ExpenseRepository::new((*state.db).clone());
    match repo.update(id, auth.user_id(), payload).await {
        Ok(write) => written(StatusCode::OK, write),
        Err(e) => failure("Failed to update expense", &map_expense_error(e)),
    }
}

/// DELETE /expenses/{id}
///
/// Refused while any product derived from the expense has been sold.
async fn delete_expense(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ExpenseRepository::new((*state.db).clone());
    match repo.delete(id).await {
        Ok(removed_products) => ok(ExpenseDeleted { removed_products }),
        Err(e) => failure("Failed to delete expense", &map_expense_error(e)),
    }
}

/// PUT /expenses/{id}/approve - Admins and managers only.
async fn approve_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if !auth.role().can_approve() {
        return failure(
            "Expense approval refused",
            &AppError::Forbidden("Not authorized to approve expenses".into()),
        );
    }

    let repo = ExpenseRepository::new((*state.db).clone());
    match repo.approve(id, auth.user_id()).await {
        Ok(expense) => ok(expense),
        Err(e) => failure("Failed to approve expense", &map_expense_error(e)),
    }
}

/// GET /expenses/{id}/product - The product derived from an expense.
async fn expense_product(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ExpenseRepository::new((*state.db).clone());
    match repo.product(id).await {
        Ok(product) => ok(product),
        Err(e) => failure("Failed to find expense product", &map_expense_error(e)),
    }
}
