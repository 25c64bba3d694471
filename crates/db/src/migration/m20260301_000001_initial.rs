//! Initial database migration.
//!
//! Creates the bookkeeping tables with the schema builder so the same
//! migration runs on PostgreSQL and SQLite.

use sea_orm::DatabaseBackend;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Role,
    FundContribution,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    Description,
    Amount,
    Category,
    Date,
    Notes,
    Receipt,
    PaidBy,
    Approved,
    ApprovedBy,
    ApprovalDate,
    IsAsset,
    IsProductCreated,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Products {
    Table,
    Id,
    Name,
    Description,
    Category,
    PurchasePrice,
    SellingPrice,
    Quantity,
    InStock,
    PurchaseDate,
    SoldDate,
    SoldPrice,
    Supplier,
    SerialNumber,
    RelatedExpense,
    IsAsset,
    AssetValue,
    Notes,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Revenues {
    Table,
    Id,
    Description,
    Amount,
    Category,
    Date,
    Client,
    Invoice,
    Notes,
    ReceivedBy,
    Verified,
    VerifiedBy,
    VerificationDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Assets {
    Table,
    Id,
    Name,
    Category,
    PurchaseValue,
    CurrentValue,
    AcquisitionDate,
    Description,
    Condition,
    Location,
    DepreciationRate,
    LastValuationDate,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    TransactionType,
    Amount,
    Description,
    Date,
    Category,
    Account,
    RelatedEntityId,
    EntityModel,
    Notes,
    Reconciled,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

/// Money column: exact decimal on Postgres, REAL on SQLite.
fn money<T: IntoIden>(backend: DatabaseBackend, name: T) -> ColumnDef {
    let mut col = ColumnDef::new(name);
    match backend {
        DatabaseBackend::Sqlite => col.double(),
        _ => col.decimal_len(19, 4),
    };
    col
}

fn timestamps<T: IntoIden>(name: T) -> ColumnDef {
    let mut col = ColumnDef::new(name);
    col.timestamp_with_time_zone().not_null();
    col
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    #[allow(clippy::too_many_lines)]
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();

        // ============================================================
        // USERS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string_len(50).not_null())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string_len(20)
                            .not_null()
                            .default("founder"),
                    )
                    .col(money(backend, Users::FundContribution).not_null().default(0))
                    .col(timestamps(Users::CreatedAt))
                    .col(timestamps(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // EXPENSES
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Expenses::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Expenses::Description).string_len(200).not_null())
                    .col(money(backend, Expenses::Amount).not_null())
                    .col(ColumnDef::new(Expenses::Category).string_len(50).not_null())
                    .col(ColumnDef::new(Expenses::Date).date().not_null())
                    .col(ColumnDef::new(Expenses::Notes).string_len(500))
                    .col(ColumnDef::new(Expenses::Receipt).string())
                    .col(ColumnDef::new(Expenses::PaidBy).uuid().not_null())
                    .col(
                        ColumnDef::new(Expenses::Approved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Expenses::ApprovedBy).uuid())
                    .col(ColumnDef::new(Expenses::ApprovalDate).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Expenses::IsAsset)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Expenses::IsProductCreated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(timestamps(Expenses::CreatedAt))
                    .col(timestamps(Expenses::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-paid_by")
                            .from(Expenses::Table, Expenses::PaidBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-date")
                    .table(Expenses::Table)
                    .col(Expenses::Date)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PRODUCTS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Products::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Products::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Products::Description).string_len(200))
                    .col(ColumnDef::new(Products::Category).string_len(50).not_null())
                    .col(money(backend, Products::PurchasePrice).not_null())
                    .col(&mut money(backend, Products::SellingPrice))
                    .col(
                        ColumnDef::new(Products::Quantity)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Products::InStock)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Products::PurchaseDate).date().not_null())
                    .col(ColumnDef::new(Products::SoldDate).date())
                    .col(&mut money(backend, Products::SoldPrice))
                    .col(ColumnDef::new(Products::Supplier).string())
                    .col(ColumnDef::new(Products::SerialNumber).string())
                    .col(ColumnDef::new(Products::RelatedExpense).uuid())
                    .col(
                        ColumnDef::new(Products::IsAsset)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(money(backend, Products::AssetValue).not_null().default(0))
                    .col(ColumnDef::new(Products::Notes).string_len(500))
                    .col(ColumnDef::new(Products::CreatedBy).uuid().not_null())
                    .col(timestamps(Products::CreatedAt))
                    .col(timestamps(Products::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-products-related_expense")
                            .from(Products::Table, Products::RelatedExpense)
                            .to(Expenses::Table, Expenses::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-products-created_by")
                            .from(Products::Table, Products::CreatedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-products-related_expense")
                    .table(Products::Table)
                    .col(Products::RelatedExpense)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // REVENUES
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Revenues::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Revenues::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Revenues::Description).string_len(200).not_null())
                    .col(money(backend, Revenues::Amount).not_null())
                    .col(ColumnDef::new(Revenues::Category).string_len(50).not_null())
                    .col(ColumnDef::new(Revenues::Date).date().not_null())
                    .col(ColumnDef::new(Revenues::Client).string())
                    .col(ColumnDef::new(Revenues::Invoice).string())
                    .col(ColumnDef::new(Revenues::Notes).string_len(500))
                    .col(ColumnDef::new(Revenues::ReceivedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(Revenues::Verified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Revenues::VerifiedBy).uuid())
                    .col(ColumnDef::new(Revenues::VerificationDate).timestamp_with_time_zone())
                    .col(timestamps(Revenues::CreatedAt))
                    .col(timestamps(Revenues::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-revenues-received_by")
                            .from(Revenues::Table, Revenues::ReceivedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // ASSETS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Assets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Assets::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Assets::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Assets::Category).string_len(50).not_null())
                    .col(money(backend, Assets::PurchaseValue).not_null())
                    .col(money(backend, Assets::CurrentValue).not_null())
                    .col(ColumnDef::new(Assets::AcquisitionDate).date().not_null())
                    .col(ColumnDef::new(Assets::Description).string_len(500))
                    .col(
                        ColumnDef::new(Assets::Condition)
                            .string_len(20)
                            .not_null()
                            .default("Good"),
                    )
                    .col(ColumnDef::new(Assets::Location).string_len(100))
                    .col(money(backend, Assets::DepreciationRate).not_null().default(0))
                    .col(ColumnDef::new(Assets::LastValuationDate).date().not_null())
                    .col(ColumnDef::new(Assets::Notes).string_len(500))
                    .col(timestamps(Assets::CreatedAt))
                    .col(timestamps(Assets::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // TRANSACTIONS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Transactions::TransactionType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(money(backend, Transactions::Amount).not_null())
                    .col(
                        ColumnDef::new(Transactions::Description)
                            .string_len(200)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Date).date().not_null())
                    .col(ColumnDef::new(Transactions::Category).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::Account)
                            .string_len(20)
                            .not_null()
                            .default("main"),
                    )
                    .col(ColumnDef::new(Transactions::RelatedEntityId).uuid())
                    .col(ColumnDef::new(Transactions::EntityModel).string_len(20))
                    .col(ColumnDef::new(Transactions::Notes).string_len(500))
                    .col(
                        ColumnDef::new(Transactions::Reconciled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Transactions::CreatedBy).uuid().not_null())
                    .col(timestamps(Transactions::CreatedAt))
                    .col(timestamps(Transactions::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-created_by")
                            .from(Transactions::Table, Transactions::CreatedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-date")
                    .table(Transactions::Table)
                    .col(Transactions::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Revenues::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
