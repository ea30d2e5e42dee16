//! Recipe Model (catalog entry)

use serde::{Deserialize, Serialize};

/// A beer recipe - immutable catalog entry
///
/// `base_price` is the price of one reference-volume unit
/// ([`crate::models::REFERENCE_VOLUME_ML`]); package prices scale from it.
/// Catalog rows are created by an external admin workflow and never mutated
/// by this server.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    /// Beer color family ("Blonde", "Amber", "Brown", "Dark")
    pub color: String,
    pub description: Option<String>,
    /// Price per reference volume unit
    pub base_price: f64,
    pub created_at: i64,
}
