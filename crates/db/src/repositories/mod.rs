//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod asset;
pub mod dashboard;
pub mod expense;
pub mod product;
pub mod revenue;
pub mod transaction;
pub mod user;
mod views;

pub use asset::{AssetError, AssetRepository};
pub use dashboard::{DashboardError, DashboardRepository};
pub use expense::{ExpenseError, ExpenseRepository, ExpenseWrite};
pub use product::{ProductError, ProductRemoval, ProductRepository};
pub use revenue::{RevenueError, RevenueRepository};
pub use transaction::{TransactionError, TransactionRepository};
pub use user::UserRepository;
