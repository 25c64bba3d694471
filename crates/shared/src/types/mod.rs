//! Common types used across the application.

pub mod category;
pub mod related;

pub use category::*;
pub use related::RelatedEntity;
