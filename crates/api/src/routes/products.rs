//! Product routes, including sales and conversion from expenses.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    AppState,
    extractors::ValidatedJson,
    middleware::AuthUser,
    response::{created, failure, list, map_db_error, map_product_error, ok, respond},
};
use fintools_db::ProductRepository;
use fintools_shared::ApiEnvelope;
use fintools_shared::requests::{
    CreateProductRequest, MarkSoldRequest, ProductFromExpenseRequest, UpdateProductRequest,
};

/// Creates the product routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/products/{id}/mark-sold", put(mark_sold))
        .route("/products/from-expense/{expense_id}", post(from_expense))
}

async fn list_products(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let repo = ProductRepository::new((*state.db).clone());
    match repo.list().await {
        Ok(products) => list(products),
        Err(e) => failure("Failed to list products", &map_db_error(e)),
    }
}

async fn get_product(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ProductRepository::new((*state.db).clone());
    match repo.get(id).await {
        Ok(product) => ok(product),
        Err(e) => failure("Failed to get product", &map_product_error(e)),
    }
}

async fn create_product(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateProductRequest>,
) -> impl IntoResponse {
    let repo = ProductRepository::new((*state.db).clone());
    match repo.create(auth.user_id(), payload).await {
        Ok(product) => created(product),
        Err(e) => failure("Failed to create product", &map_product_error(e)),
    }
}

/// PUT /products/{id}
///
/// Price and quantity of a sold product cannot change.
async fn update_product(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateProductRequest>,
) -> impl IntoResponse {
    let repo = ProductRepository::new((*state.db).clone());
    match repo.update(id, payload).await {
        Ok(product) => ok(product),
        Err(e) => failure("Failed to update product", &map_product_error(e)),
    }
}

async fn delete_product(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ProductRepository::new((*state.db).clone());
    match repo.delete(id).await {
        Ok(removal) => respond(
            StatusCode::OK,
            ApiEnvelope::ok(serde_json::json!({})).with_warnings(removal.warnings),
        ),
        Err(e) => failure("Failed to delete product", &map_product_error(e)),
    }
}

/// PUT /products/{id}/mark-sold
///
/// Sells all or part of the stock and books the revenue in one step.
async fn mark_sold(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<MarkSoldRequest>,
) -> impl IntoResponse {
    let repo = ProductRepository::new((*state.db).clone());
    match repo.mark_sold(id, auth.user_id(), payload).await {
        Ok(outcome) => ok(outcome),
        Err(e) => failure("Failed to mark product as sold", &map_product_error(e)),
    }
}

/// POST /products/from-expense/{expense_id}
async fn from_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(expense_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ProductFromExpenseRequest>,
) -> impl IntoResponse {
    let repo = ProductRepository::new((*state.db).clone());
    match repo.create_from_expense(expense_id, auth.user_id(), payload).await {
        Ok(product) => created(product),
        Err(e) => failure("Failed to create product from expense", &map_product_error(e)),
    }
}
