//! Shared types, errors, and configuration for FinTools.
//!
//! This crate provides common types used across all other crates:
//! - Category vocabularies and the tagged related-entity reference
//! - Request payloads with validation rules
//! - Resource views and the response envelope
//! - Application-wide error types
//! - Configuration management and JWT handling

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod requests;
pub mod resources;
pub mod types;

pub use auth::Claims;
pub use config::{AppConfig, JwtConfig};
pub use error::{AppError, AppResult};
pub use jwt::{JwtError, JwtService};
pub use resources::{ApiEnvelope, ErrorMessage};
