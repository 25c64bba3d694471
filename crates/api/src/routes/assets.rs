//! Asset routes.

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
    response::{created, deleted, failure, list, map_asset_error, map_db_error, ok},
};
use fintools_db::AssetRepository;
use fintools_shared::requests::{CreateAssetRequest, UpdateAssetRequest, UpdateAssetValueRequest};

/// Creates the asset routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/assets", get(list_assets).post(create_asset))
        .route(
            "/assets/{id}",
            get(get_asset).put(update_asset).delete(delete_asset),
        )
        .route("/assets/{id}/update-value", put(update_asset_value))
        .route("/assets/category/{category}", get(assets_by_category))
}

async fn list_assets(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let repo = AssetRepository::new((*state.db).clone());
    match repo.list().await {
        Ok(assets) => list(assets),
        Err(e) => failure("Failed to list assets", &map_db_error(e)),
    }
}

/// GET /assets/category/{category} - Assets of one category, by name.
async fn assets_by_category(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(category): Path<String>,
) -> impl IntoResponse {
    let repo = AssetRepository::new((*state.db).clone());
    match repo.list_by_category(&category).await {
        Ok(assets) => list(assets),
        Err(e) => failure("Failed to list assets by category", &map_asset_error(e)),
    }
}

async fn get_asset(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = AssetRepository::new((*state.db).clone());
    match repo.get(id).await {
        Ok(asset) => ok(asset),
        Err(e) => failure("Failed to get asset", &map_asset_error(e)),
    }
}

async fn create_asset(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateAssetRequest>,
) -> impl IntoResponse {
    let repo = AssetRepository::new((*state.db).clone());
    match repo.create(payload).await {
        Ok(asset) => created(asset),
        Err(e) => failure("Failed to create asset", &map_asset_error(e)),
    }
}

async fn update_asset(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateAssetRequest>,
) -> impl IntoResponse {
    let repo = AssetRepository::new((*state.db).clone());
    match repo.update(id, payload).await {
        Ok(asset) => ok(asset),
        Err(e) => failure("Failed to update asset", &map_asset_error(e)),
    }
}

/// PUT /assets/{id}/update-value - Record a revaluation.
async fn update_asset_value(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateAssetValueRequest>,
) -> impl IntoResponse {
    let repo = AssetRepository::new((*state.db).clone());
    match repo.update_value(id, payload).await {
        Ok(asset) => ok(asset),
        Err(e) => failure("Failed to update asset value", &map_asset_error(e)),
    }
}

async fn delete_asset(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = AssetRepository::new((*state.db).clone());
    match repo.delete(id).await {
        Ok(()) => deleted(),
        Err(e) => failure("Failed to delete asset", &map_asset_error(e)),
    }
}
