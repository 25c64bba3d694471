//! Shared fixtures for router tests.

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use fintools_api::{AppState, create_router};
use fintools_core::auth::UserRole;
use fintools_db::UserRepository;
use fintools_db::migration::{Migrator, MigratorTrait};
use fintools_shared::{JwtConfig, JwtService};

/// Router plus handles for seeding data behind its back.
pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    pub jwt: JwtService,
}

impl TestApp {
    /// Sends one request and returns the status with the decoded JSON body.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, Some(token), None).await
    }

    /// Inserts a user directly and signs a token for them.
    pub async fn login_as(&self, role: UserRole) -> (Uuid, String) {
        let email = format!("{}-{}@example.com", role.as_str(), Uuid::new_v4());
        let user = UserRepository::new(self.db.clone())
            .create("Test User", &email, "$argon2id$unused", role)
            .await
            .expect("Failed to create user");
        let token = self
            .jwt
            .generate_token(user.id, role.as_str())
            .expect("Failed to sign token");
        (user.id, token)
    }
}

/// A router over a fresh in-memory database.
pub async fn spawn_app() -> TestApp {
    let db = fintools_db::connect_with_pool("sqlite::memory:", 1, 1)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None).await.expect("Failed to migrate");

    let jwt = JwtService::new(&JwtConfig {
        secret: "router-test-secret".into(),
        token_expiry_secs: 3600,
    });
    let state = AppState::new(db.clone(), jwt.clone());

    TestApp {
        router: create_router(state),
        db,
        jwt,
    }
}

/// Reads a decimal serialized as a JSON string.
pub fn money(value: &Value) -> Decimal {
    value
        .as_str()
        .unwrap_or_else(|| panic!("expected a decimal string, got {value}"))
        .parse()
        .expect("invalid decimal")
}
