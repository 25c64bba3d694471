//! `SeaORM` Entity for products table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub purchase_price: Decimal,
    pub selling_price: Option<Decimal>,
    pub quantity: i32,
    pub in_stock: bool,
    pub purchase_date: Date,
    pub sold_date: Option<Date>,
    pub sold_price: Option<Decimal>,
    pub supplier: Option<String>,
    pub serial_number: Option<String>,
    pub related_expense: Option<Uuid>,
    pub is_asset: bool,
    pub asset_value: Decimal,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::expenses::Entity",
        from = "Column::RelatedExpense",
        to = "super::expenses::Column::Id"
    )]
    Expense,
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expense.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
