//! Closed vocabularies stored as their display labels.
//!
//! Every enum serializes to (and parses from) the exact label used on the
//! wire and in the database, e.g. `ExpenseCategory::OfficeSupplies` is
//! `"Office Supplies"`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a label does not name any variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a valid {kind}")]
pub struct UnknownVariant {
    /// Name of the enum being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Macro to generate label-backed enums.
macro_rules! labeled_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub enum $name {
            $(
                #[doc = $label]
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Returns the stored label.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok(Self::$variant),)+
                    _ => Err(UnknownVariant {
                        kind: stringify!($name),
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

labeled_enum!(
    /// Expense categories.
    ExpenseCategory {
        Salary => "Salary",
        Rental => "Rental",
        Utilities => "Utilities",
        OfficeSupplies => "Office Supplies",
        Equipment => "Equipment",
        Marketing => "Marketing",
        Transport => "Transport",
        Insurance => "Insurance",
        Taxes => "Taxes",
        Phone => "Phone",
        Accessories => "Accessories",
        Courier => "Courier",
        Bonus => "Bonus",
        Advertisement => "Advertisement",
        Other => "Other",
    }
);

impl ExpenseCategory {
    /// Categories that describe resellable stock.
    #[must_use]
    pub const fn is_stock(self) -> bool {
        matches!(self, Self::Phone | Self::Accessories)
    }
}

labeled_enum!(
    /// Revenue categories.
    RevenueCategory {
        Sales => "Sales",
        Services => "Services",
        Investments => "Investments",
        Grants => "Grants",
        Royalties => "Royalties",
        Interest => "Interest",
        Other => "Other",
    }
);

labeled_enum!(
    /// Asset categories.
    AssetCategory {
        RealEstate => "Real Estate",
        Vehicle => "Vehicle",
        Equipment => "Equipment",
        Technology => "Technology",
        Furniture => "Furniture",
        IntellectualProperty => "Intellectual Property",
        Investment => "Investment",
        Other => "Other",
    }
);

labeled_enum!(
    /// Physical condition of an asset.
    AssetCondition {
        Excellent => "Excellent",
        Good => "Good",
        Fair => "Fair",
        Poor => "Poor",
    }
);

impl Default for AssetCondition {
    fn default() -> Self {
        Self::Good
    }
}

labeled_enum!(
    /// Product categories.
    ProductCategory {
        Phone => "Phone",
        Accessories => "Accessories",
        Other => "Other",
    }
);

impl From<ExpenseCategory> for ProductCategory {
    fn from(category: ExpenseCategory) -> Self {
        match category {
            ExpenseCategory::Phone => Self::Phone,
            ExpenseCategory::Accessories => Self::Accessories,
            _ => Self::Other,
        }
    }
}

labeled_enum!(
    /// Kind of cash movement.
    TransactionType {
        Income => "income",
        Expense => "expense",
        Transfer => "transfer",
        Investment => "investment",
    }
);

labeled_enum!(
    /// Logical ledger a transaction is booked against.
    Account {
        Main => "main",
        Savings => "savings",
        Investment => "investment",
        PettyCash => "petty-cash",
    }
);

impl Default for Account {
    fn default() -> Self {
        Self::Main
    }
}

labeled_enum!(
    /// Entity types a transaction may reference.
    EntityKind {
        User => "User",
        Expense => "Expense",
        Revenue => "Revenue",
        Asset => "Asset",
    }
);
