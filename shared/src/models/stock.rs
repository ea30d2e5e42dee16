//! Derived stock level

use serde::{Deserialize, Serialize};

/// One row of the derived availability table
///
/// `available = Σ batch quantity - Σ unexpired hold quantity`, clamped at
/// zero. This is the payload of stock broadcasts and the source for the
/// catalog view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StockLevel {
    pub recipe_id: i64,
    pub package_size_id: i64,
    pub available: i64,
}
