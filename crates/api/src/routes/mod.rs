//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod assets;
pub mod auth;
pub mod dashboard;
pub mod expenses;
pub mod health;
pub mod products;
pub mod revenues;
pub mod transactions;

/// Routes reachable without a token.
pub fn public_routes() -> Router<AppState> {
    Router::new().merge(health::routes()).merge(auth::routes())
}

/// Creates the API router; everything but the public routes sits behind the
/// bearer-token middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(expenses::routes())
        .merge(revenues::routes())
        .merge(assets::routes())
        .merge(products::routes())
        .merge(transactions::routes())
        .merge(dashboard::routes())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    public_routes().merge(protected_routes)
}
