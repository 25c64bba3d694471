//! Authentication routes for register, login, profile and fund contributions.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    AppState,
    extractors::ValidatedJson,
    middleware::AuthUser,
    response::{failure, map_db_error, ok},
};
use fintools_core::auth::{UserRole, hash_password, verify_password};
use fintools_db::UserRepository;
use fintools_db::entities::users;
use fintools_shared::AppError;
use fintools_shared::auth::{LoginRequest, RegisterRequest, TokenResponse};
use fintools_shared::requests::UpdateContributionRequest;
use fintools_shared::resources::UserResource;

/// Public auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// Auth routes that need a bearer token.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(me))
        .route("/auth/update-contribution/{id}", put(update_contribution))
}

fn invalid_credentials() -> Response {
    failure(
        "Login rejected",
        &AppError::Unauthorized("Invalid credentials".into()),
    )
}

fn issue_token(state: &AppState, user: &users::Model) -> Response {
    match state.jwt_service.generate_token(user.id, &user.role) {
        Ok(token) => Json(TokenResponse { token }).into_response(),
        Err(e) => failure("Failed to sign token", &AppError::Internal(e.to_string())),
    }
}

/// POST /auth/register - Create a founder account and return a token.
async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> impl IntoResponse {
    let repo = UserRepository::new((*state.db).clone());

    match repo.email_exists(&payload.email).await {
        Ok(false) => {}
        Ok(true) => {
            return failure(
                "Registration rejected",
                &AppError::Conflict("User already exists".into()),
            );
        }
        Err(e) => return failure("Failed to check email", &map_db_error(e)),
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => return failure("Failed to hash password", &AppError::Internal(e.to_string())),
    };

    let user = match repo
        .create(&payload.name, &payload.email, &password_hash, UserRole::Founder)
        .await
    {
        Ok(u) => u,
        Err(e) => return failure("Failed to create user", &map_db_error(e)),
    };

    info!(user_id = %user.id, "User registered");
    issue_token(&state, &user)
}

/// POST /auth/login - Exchange credentials for a token.
async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> impl IntoResponse {
    let repo = UserRepository::new((*state.db).clone());

    let user = match repo.find_by_email(&payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!(email = %payload.email, "Login attempt for non-existent user");
            return invalid_credentials();
        }
        Err(e) => return failure("Database error during login", &map_db_error(e)),
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => issue_token(&state, &user),
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            invalid_credentials()
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            failure("Login failed", &AppError::Internal(e.to_string()))
        }
    }
}

/// GET /auth/me - The caller's profile.
async fn me(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = UserRepository::new((*state.db).clone());

    match repo.find_by_id(auth.user_id()).await {
        Ok(Some(user)) => ok(UserResource::from(user)),
        Ok(None) => failure("Token user vanished", &AppError::NotFound("User not found".into())),
        Err(e) => failure("Failed to load user", &map_db_error(e)),
    }
}

/// PUT /auth/update-contribution/{id} - Set a user's fund contribution.
///
/// Admins may change anyone; other users only themselves.
async fn update_contribution(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateContributionRequest>,
) -> impl IntoResponse {
    if !auth.role().can_manage_users() && auth.user_id() != id {
        return failure(
            "Contribution update refused",
            &AppError::Forbidden("Not authorized to update other users' contributions".into()),
        );
    }

    let repo = UserRepository::new((*state.db).clone());
    match repo.update_contribution(id, payload.fund_contribution).await {
        Ok(Some(user)) => {
            info!(user_id = %id, by = %auth.user_id(), "Fund contribution updated");
            ok(UserResource::from(user))
        }
        Ok(None) => failure(
            "Contribution target missing",
            &AppError::NotFound("User not found".into()),
        ),
        Err(e) => failure("Failed to update contribution", &map_db_error(e)),
    }
}
