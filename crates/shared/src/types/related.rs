//! Tagged reference from a transaction to another record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::EntityKind;

/// A reference to a user, expense, revenue, or asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedEntity {
    /// Which collection `id` belongs to.
    pub kind: EntityKind,
    /// Target record id.
    pub id: Uuid,
}

impl RelatedEntity {
    /// Creates a reference.
    #[must_use]
    pub const fn new(kind: EntityKind, id: Uuid) -> Self {
        Self { kind, id }
    }

    /// Rebuilds a reference from its stored column pair.
    ///
    /// Returns `None` unless both halves are present and the kind is known.
    #[must_use]
    pub fn from_columns(id: Option<Uuid>, kind: Option<&str>) -> Option<Self> {
        let kind = kind?.parse().ok()?;
        Some(Self { kind, id: id? })
    }
}
