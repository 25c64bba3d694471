//! End-to-end tests of the client and cache against a live router.

use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use fintools_api::{AppState, create_router};
use fintools_client::{ApiClient, ClientError, EntityCache, Mutation, Resource, Snapshot};
use fintools_db::migration::{Migrator, MigratorTrait};
use fintools_shared::auth::{LoginRequest, RegisterRequest};
use fintools_shared::requests::{CreateExpenseRequest, MarkSoldRequest};
use fintools_shared::types::ExpenseCategory;
use fintools_shared::{JwtConfig, JwtService};

/// Serves the API on a random local port and returns its base URL.
async fn serve() -> String {
    let db = fintools_db::connect_with_pool("sqlite::memory:", 1, 1)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None).await.expect("Failed to migrate");
    let jwt = JwtService::new(&JwtConfig {
        secret: "client-test-secret".into(),
        token_expiry_secs: 3600,
    });
    let router = create_router(AppState::new(db, jwt));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{addr}/api/v1")
}

async fn registered(base_url: &str) -> ApiClient {
    let mut client = ApiClient::new(base_url);
    client
        .register(&RegisterRequest {
            name: "Grace".into(),
            email: "grace@example.com".into(),
            password: "s3cret-pass".into(),
        })
        .await
        .unwrap();
    client
}

#[tokio::test]
async fn test_client_round_trip_with_cache() {
    let base_url = serve().await;
    let client = registered(&base_url).await;

    let me = client.me().await.unwrap();
    assert_eq!(me.email, "grace@example.com");

    let cache = EntityCache::with_summary_ttl(client.clone(), Duration::from_secs(60));
    let before = cache.get(Resource::Summary).await.unwrap();
    assert!(matches!(&*before, Snapshot::Summary(s) if s.total_revenue.is_zero()));

    let written = client
        .create_expense(&CreateExpenseRequest {
            description: "iPhone 13".into(),
            amount: dec!(2500),
            category: ExpenseCategory::Phone,
            date: NaiveDate::from_ymd_opt(2024, 3, 15),
            notes: None,
            receipt: None,
            is_asset: None,
        })
        .await
        .unwrap();
    cache.after_mutation(Mutation::Expense).await;
    let product = written.product.expect("phone expense spawns a product");

    let spent = cache.get(Resource::Summary).await.unwrap();
    assert!(matches!(&*spent, Snapshot::Summary(s) if s.total_expenses == dec!(2500)));

    let outcome = client
        .mark_sold(
            product.id,
            &MarkSoldRequest {
                selling_price: Some(dec!(2800)),
                sold_date: NaiveDate::from_ymd_opt(2024, 4, 1),
                quantity_to_sell: Some(1),
                notes: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(outcome.revenue.amount, dec!(2800));

    // Still the stale snapshot until the sale is reported.
    let stale = cache.get(Resource::Summary).await.unwrap();
    assert!(matches!(&*stale, Snapshot::Summary(s) if s.total_revenue.is_zero()));

    cache.after_mutation(Mutation::ProductSale).await;
    let fresh = cache.get(Resource::Summary).await.unwrap();
    assert!(matches!(&*fresh, Snapshot::Summary(s) if s.pure_profit == dec!(300)));

    let products = cache.get(Resource::Products).await.unwrap();
    assert!(matches!(&*products, Snapshot::Products(p) if p.len() == 1 && !p[0].in_stock));
}

#[tokio::test]
async fn test_client_maps_failures() {
    let base_url = serve().await;
    let client = registered(&base_url).await;

    let err = client.expense(uuid::Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(ref m) if m == "Expense not found"));

    let mut stranger = ApiClient::new(&base_url);
    let err = stranger
        .login(&LoginRequest {
            email: "grace@example.com".into(),
            password: "wrong".into(),
        })
        .await
        .unwrap_err();
    assert!(err.is_auth());

    let err = ApiClient::new(&base_url).expenses().await.unwrap_err();
    assert!(err.is_auth());

    let err = client
        .create_expense(&CreateExpenseRequest {
            description: String::new(),
            amount: dec!(10),
            category: ExpenseCategory::Other,
            date: None,
            notes: None,
            receipt: None,
            is_asset: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Rejected(ref m) if m == &["Please add a description"]));

    assert!(client.assets_by_category("Spaceship").await.unwrap().is_empty());
    assert!(client.assets_by_category("Real Estate").await.unwrap().is_empty());
}
