//! Typed client for the FinTools API.
//!
//! This crate provides:
//! - [`ApiClient`], a reqwest client covering every endpoint
//! - [`EntityCache`], fetch-or-cached snapshots with single-flight loading
//! - [`ClientError`], the status-code mapping of failed responses

pub mod cache;
pub mod client;
pub mod error;

pub use cache::{EntityCache, Fetcher, Mutation, Resource, Snapshot};
pub use client::{ApiClient, ExpenseWritten};
pub use error::ClientError;
