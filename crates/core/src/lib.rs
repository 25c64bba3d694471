//! Core business logic for FinTools.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain rules and calculations live here.
//!
//! # Modules
//!
//! - `auth` - Password hashing and user roles
//! - `inventory` - Expense to product to revenue derivation rules
//! - `ledger` - Financial summary and cash-flow aggregation

pub mod auth;
pub mod inventory;
pub mod ledger;
