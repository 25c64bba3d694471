//! Transaction routes.
//!
//! An expense transaction flagged as an asset carries its asset along; the
//! single-transaction endpoints return both.

use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::{
    AppState,
    extractors::ValidatedJson,
    middleware::AuthUser,
    response::{created, deleted, failure, list, map_db_error, map_transaction_error, ok},
};
use fintools_db::TransactionRepository;
use fintools_shared::requests::{CreateTransactionRequest, UpdateTransactionRequest};

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route(
            "/transactions/{id}",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/transactions` - Every transaction, newest date first.
async fn list_transactions(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone());
    match repo.list().await {
        Ok(transactions) => list(transactions),
        Err(e) => failure("Failed to list transactions", &map_db_error(e)),
    }
}

/// GET `/transactions/{id}` - A transaction with its linked asset.
async fn get_transaction(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone());
    match repo.get(id).await {
        Ok(found) => ok(found),
        Err(e) => failure("Failed to get transaction", &map_transaction_error(e)),
    }
}

/// POST `/transactions`
async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateTransactionRequest>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone());
    match repo.create(auth.user_id(), payload).await {
        Ok(written) => created(written),
        Err(e) => failure("Failed to create transaction", &map_transaction_error(e)),
    }
}

/// PUT `/transactions/{id}` - Creator only.
async fn update_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateTransactionRequest>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone());
    match repo.update(id, auth.user_id(), payload).await {
        Ok(written) => ok(written),
        Err(e) => failure("Failed to update transaction", &map_transaction_error(e)),
    }
}

/// DELETE `/transactions/{id}` - Creator only. A linked asset is kept.
async fn delete_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone());
    match repo.delete(id, auth.user_id()).await {
        Ok(()) => deleted(),
        Err(e) => failure("Failed to delete transaction", &map_transaction_error(e)),
    }
}
