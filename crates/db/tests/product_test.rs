//! Integration tests for products and sales.

mod common;

use chrono::NaiveDate;
use fintools_core::auth::UserRole;
use fintools_core::inventory::InventoryError;
use fintools_db::repositories::ProductError;
use fintools_db::{DashboardRepository, ExpenseRepository, ProductRepository, RevenueRepository};
use fintools_shared::requests::{
    CreateExpenseRequest, CreateProductRequest, MarkSoldRequest, ProductFromExpenseRequest,
    UpdateProductRequest,
};
use fintools_shared::types::{ExpenseCategory, ProductCategory, RevenueCategory};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

fn sold_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
}

fn sale(price: Decimal, quantity: Option<i32>) -> MarkSoldRequest {
    MarkSoldRequest {
        selling_price: Some(price),
        sold_date: Some(sold_on()),
        quantity_to_sell: quantity,
        notes: None,
    }
}

async fn stock(db: &DatabaseConnection, owner: Uuid, price: Decimal, quantity: i32) -> Uuid {
    ProductRepository::new(db.clone())
        .create(
            owner,
            CreateProductRequest {
                name: "Phone case".into(),
                description: None,
                category: ProductCategory::Accessories,
                purchase_price: price,
                selling_price: None,
                quantity: Some(quantity),
                purchase_date: NaiveDate::from_ymd_opt(2024, 3, 1),
                supplier: Some("Acme".into()),
                serial_number: None,
                related_expense: None,
                is_asset: None,
                notes: Some("shelf B".into()),
            },
        )
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn test_create_derives_asset_value() {
    let db = common::setup().await;
    let owner = common::user(&db, UserRole::Founder).await;
    let id = stock(&db, owner, dec!(25), 4).await;

    let product = ProductRepository::new(db).get(id).await.unwrap();
    assert_eq!(product.asset_value, dec!(100));
    assert!(product.in_stock);
    assert!(product.is_asset);
}

#[tokio::test]
async fn test_full_sale_mutates_in_place() {
    let db = common::setup().await;
    let owner = common::user(&db, UserRole::Founder).await;
    let id = stock(&db, owner, dec!(25), 3).await;
    let repo = ProductRepository::new(db.clone());

    let outcome = repo.mark_sold(id, owner, sale(dec!(40), Some(3))).await.unwrap();

    assert_eq!(outcome.products.len(), 1);
    let sold = &outcome.products[0];
    assert_eq!(sold.id, id);
    assert!(!sold.in_stock);
    assert_eq!(sold.quantity, 3);
    assert_eq!(sold.sold_price, Some(dec!(40)));
    assert_eq!(sold.sold_date, Some(sold_on()));
    assert_eq!(sold.notes.as_deref(), Some("shelf B"));

    assert_eq!(outcome.revenue.amount, dec!(120));
    assert_eq!(outcome.revenue.category, RevenueCategory::Sales);
    assert_eq!(outcome.revenue.description, "Sale of 3 Phone case");
    assert_eq!(outcome.revenue.received_by, owner);

    assert_eq!(repo.list().await.unwrap().len(), 1);
    assert_eq!(RevenueRepository::new(db).list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_partial_sale_splits_record() {
    let db = common::setup().await;
    let owner = common::user(&db, UserRole::Founder).await;
    let id = stock(&db, owner, dec!(25), 4).await;
    let repo = ProductRepository::new(db.clone());

    let outcome = repo.mark_sold(id, owner, sale(dec!(40), Some(1))).await.unwrap();

    assert_eq!(outcome.products.len(), 2);
    let original = &outcome.products[0];
    let split = &outcome.products[1];

    assert_eq!(original.id, id);
    assert!(original.in_stock);
    assert_eq!(original.quantity, 3);
    assert_eq!(original.asset_value, dec!(75));

    assert_ne!(split.id, id);
    assert!(!split.in_stock);
    assert_eq!(split.quantity, 1);
    assert_eq!(split.asset_value, dec!(25));
    assert_eq!(split.name, original.name);
    assert_eq!(split.supplier.as_deref(), Some("Acme"));
    assert_eq!(split.sold_price, Some(dec!(40)));

    assert_eq!(outcome.revenue.amount, dec!(40));
    assert_eq!(repo.list().await.unwrap().len(), 2);
    assert_eq!(RevenueRepository::new(db).list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_sale_rejections_leave_state_untouched() {
    let db = common::setup().await;
    let owner = common::user(&db, UserRole::Founder).await;
    let id = stock(&db, owner, dec!(25), 2).await;
    let repo = ProductRepository::new(db.clone());

    let err = repo.mark_sold(id, owner, sale(dec!(40), Some(5))).await.unwrap_err();
    assert!(matches!(
        err,
        ProductError::Inventory(InventoryError::InsufficientQuantity {
            available: 2,
            requested: 5
        })
    ));
    assert_eq!(err.to_string(), "Only 2 item(s) available");

    let missing = MarkSoldRequest {
        selling_price: None,
        ..sale(dec!(40), None)
    };
    assert!(matches!(
        repo.mark_sold(id, owner, missing).await,
        Err(ProductError::MissingField("Selling price is required"))
    ));

    let oversized = sale(dec!(40000000000000000000000000000), None);
    assert!(matches!(
        repo.mark_sold(id, owner, oversized).await,
        Err(ProductError::Inventory(InventoryError::AmountOutOfRange))
    ));
    assert!(repo.get(id).await.unwrap().in_stock);

    repo.mark_sold(id, owner, sale(dec!(40), None)).await.unwrap();
    assert!(matches!(
        repo.mark_sold(id, owner, sale(dec!(40), None)).await,
        Err(ProductError::Inventory(InventoryError::AlreadySold))
    ));

    assert!(matches!(
        repo.mark_sold(Uuid::new_v4(), owner, sale(dec!(1), None)).await,
        Err(ProductError::NotFound(_))
    ));

    // Only the one successful sale booked revenue.
    assert_eq!(RevenueRepository::new(db).list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_checks_related_expense() {
    let db = common::setup().await;
    let owner = common::user(&db, UserRole::Founder).await;
    let repo = ProductRepository::new(db);

    let orphan = CreateProductRequest {
        name: "Tablet".into(),
        description: None,
        category: ProductCategory::Other,
        purchase_price: dec!(400),
        selling_price: None,
        quantity: None,
        purchase_date: None,
        supplier: None,
        serial_number: None,
        related_expense: Some(Uuid::new_v4()),
        is_asset: None,
        notes: None,
    };
    assert!(matches!(
        repo.create(owner, orphan).await,
        Err(ProductError::ExpenseNotFound(_))
    ));
    assert!(repo.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_recomputes_value_and_freezes_sold() {
    let db = common::setup().await;
    let owner = common::user(&db, UserRole::Founder).await;
    let id = stock(&db, owner, dec!(25), 2).await;
    let repo = ProductRepository::new(db);

    let patch = UpdateProductRequest {
        quantity: Some(6),
        ..UpdateProductRequest::default()
    };
    let updated = repo.update(id, patch).await.unwrap();
    assert_eq!(updated.asset_value, dec!(150));

    repo.mark_sold(id, owner, sale(dec!(30), None)).await.unwrap();

    let reprice = UpdateProductRequest {
        purchase_price: Some(dec!(1)),
        ..UpdateProductRequest::default()
    };
    assert!(matches!(
        repo.update(id, reprice).await,
        Err(ProductError::Inventory(InventoryError::SoldProductFrozen))
    ));

    let rename = UpdateProductRequest {
        notes: Some("archived".into()),
        ..UpdateProductRequest::default()
    };
    assert_eq!(repo.update(id, rename).await.unwrap().notes.as_deref(), Some("archived"));
}

#[tokio::test]
async fn test_delete_rules_and_expense_flag_reset() {
    let db = common::setup().await;
    let owner = common::user(&db, UserRole::Founder).await;
    let expenses = ExpenseRepository::new(db.clone());
    let repo = ProductRepository::new(db.clone());

    let written = expenses
        .create(
            owner,
            CreateExpenseRequest {
                description: "Galaxy S24".into(),
                amount: dec!(900),
                category: ExpenseCategory::Phone,
                date: None,
                notes: None,
                receipt: None,
                is_asset: None,
            },
        )
        .await
        .unwrap();
    let product_id = written.product.unwrap().id;

    let removal = repo.delete(product_id).await.unwrap();
    assert!(removal.warnings.is_empty());
    assert!(!expenses.get(written.expense.id).await.unwrap().is_product_created);

    let sold_id = stock(&db, owner, dec!(5), 1).await;
    repo.mark_sold(sold_id, owner, sale(dec!(9), None)).await.unwrap();
    assert!(matches!(
        repo.delete(sold_id).await,
        Err(ProductError::Inventory(InventoryError::SoldProductNotDeletable))
    ));
}

#[tokio::test]
async fn test_create_from_expense_once() {
    let db = common::setup().await;
    let owner = common::user(&db, UserRole::Founder).await;
    let expenses = ExpenseRepository::new(db.clone());
    let repo = ProductRepository::new(db);

    let written = expenses
        .create(
            owner,
            CreateExpenseRequest {
                description: "Screen protectors".into(),
                amount: dec!(3),
                category: ExpenseCategory::OfficeSupplies,
                date: None,
                notes: None,
                receipt: None,
                is_asset: None,
            },
        )
        .await
        .unwrap();

    let overrides = ProductFromExpenseRequest {
        quantity: Some(10),
        selling_price: Some(dec!(8)),
        ..ProductFromExpenseRequest::default()
    };
    let product = repo
        .create_from_expense(written.expense.id, owner, overrides)
        .await
        .unwrap();
    assert_eq!(product.category, ProductCategory::Other);
    assert_eq!(product.quantity, 10);
    assert_eq!(product.asset_value, dec!(30));
    assert_eq!(product.selling_price, Some(dec!(8)));
    assert!(expenses.get(written.expense.id).await.unwrap().is_product_created);

    assert!(matches!(
        repo.create_from_expense(written.expense.id, owner, ProductFromExpenseRequest::default())
            .await,
        Err(ProductError::AlreadyCreated(_))
    ));
    assert!(matches!(
        repo.create_from_expense(Uuid::new_v4(), owner, ProductFromExpenseRequest::default())
            .await,
        Err(ProductError::ExpenseNotFound(_))
    ));
}

#[tokio::test]
async fn test_iphone_purchase_to_sale_scenario() {
    let db = common::setup().await;
    let owner = common::user(&db, UserRole::Founder).await;
    let dashboard = DashboardRepository::new(db.clone());
    let before = dashboard.summary().await.unwrap();

    let written = ExpenseRepository::new(db.clone())
        .create(
            owner,
            CreateExpenseRequest {
                description: "iPhone 13".into(),
                amount: dec!(2500),
                category: ExpenseCategory::Phone,
                date: None,
                notes: None,
                receipt: None,
                is_asset: None,
            },
        )
        .await
        .unwrap();
    let product = written.product.unwrap();
    assert_eq!(product.purchase_price, dec!(2500));
    assert_eq!(product.asset_value, dec!(2500));
    assert_eq!(product.quantity, 1);
    assert!(product.in_stock);

    let outcome = ProductRepository::new(db)
        .mark_sold(product.id, owner, sale(dec!(2800), Some(1)))
        .await
        .unwrap();
    assert!(!outcome.products[0].in_stock);
    assert_eq!(outcome.revenue.amount, dec!(2800));
    assert_eq!(outcome.revenue.category, RevenueCategory::Sales);

    let after = dashboard.summary().await.unwrap();
    assert_eq!(after.total_revenue - before.total_revenue, dec!(2800));
    assert_eq!(after.total_expenses - before.total_expenses, dec!(2500));
    assert_eq!(after.pure_profit, dec!(300));
}
