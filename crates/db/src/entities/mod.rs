//! `SeaORM` entity definitions.
//!
//! Category-like columns are stored as their label strings and parsed with the
//! vocabularies in `fintools_shared::types`.

pub mod prelude;

pub mod assets;
pub mod expenses;
pub mod products;
pub mod revenues;
pub mod transactions;
pub mod users;
