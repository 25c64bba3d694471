//! Revenue routes.

use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    AppState,
    extractors::ValidatedJson,
    middleware::AuthUser,
    response::{created, deleted, failure, list, map_db_error, map_revenue_error, ok},
};
use fintools_db::RevenueRepository;
use fintools_shared::AppError;
use fintools_shared::requests::{CreateRevenueRequest, UpdateRevenueRequest};

/// Creates the revenue routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/revenues", get(list_revenues).post(create_revenue))
        .route(
            "/revenues/{id}",
            get(get_revenue).put(update_revenue).delete(delete_revenue),
        )
        .route("/revenues/{id}/verify", put(verify_revenue))
}

async fn list_revenues(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let repo = RevenueRepository::new((*state.db).clone());
    match repo.list().await {
        Ok(revenues) => list(revenues),
        Err(e) => failure("Failed to list revenues", &map_db_error(e)),
    }
}

async fn get_revenue(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = RevenueRepository::new((*state.db).clone());
    match repo.get(id).await {
        Ok(revenue) => ok(revenue),
        Err(e) => failure("Failed to get revenue", &map_revenue_error(e)),
    }
}

async fn create_revenue(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateRevenueRequest>,
) -> impl IntoResponse {
    let repo = RevenueRepository::new((*state.db).clone());
    match repo.create(auth.user_id(), payload).await {
        Ok(revenue) => created(revenue),
        Err(e) => failure("Failed to create revenue", &map_revenue_error(e)),
    }
}

async fn update_revenue(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateRevenueRequest>,
) -> impl IntoResponse {
    let repo = RevenueRepository::new((*state.db).clone());
    match repo.update(id, payload).await {
        Ok(revenue) => ok(revenue),
        Err(e) => failure("Failed to update revenue", &map_revenue_error(e)),
    }
}

async fn delete_revenue(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = RevenueRepository::new((*state.db).clone());
    match repo.delete(id).await {
        Ok(()) => deleted(),
        Err(e) => failure("Failed to delete revenue", &map_revenue_error(e)),
    }
}

/// PUT /revenues/{id}/verify - Admins and managers only.
async fn verify_revenue(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if !auth.role().can_approve() {
        return failure(
            "Revenue verification refused",
            &AppError::Forbidden("Not authorized to verify revenues".into()),
        );
    }

    let repo = RevenueRepository::new((*state.db).clone());
    match repo.verify(id, auth.user_id()).await {
        Ok(revenue) => ok(revenue),
        Err(e) => failure("Failed to verify revenue", &map_revenue_error(e)),
    }
}
