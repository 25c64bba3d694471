//! Entity re-exports.

pub use super::assets::Entity as Assets;
pub use super::expenses::Entity as Expenses;
pub use super::products::Entity as Products;
pub use super::revenues::Entity as Revenues;
pub use super::transactions::Entity as Transactions;
pub use super::users::Entity as Users;
