//! Reservation Model (time-limited stock hold)

use serde::{Deserialize, Serialize};

/// A client's hold on stock - not yet a commitment
///
/// At most one hold exists per (client, recipe, package size); repeat
/// reservations merge into it. `price` is frozen when the hold is first
/// created and survives later quantity changes and catalog price changes.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reservation {
    pub id: i64,
    pub client_id: String,
    pub recipe_id: i64,
    pub package_size_id: i64,
    pub quantity: i64,
    /// Unit price frozen at first creation
    pub price: f64,
    /// Hold is active while `expires_at > now` (strict)
    pub expires_at: i64,
    pub created_at: i64,
}

impl Reservation {
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at <= now
    }
}

/// Reservation joined with its recipe and package size, for cart views
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReservationDetail {
    pub id: i64,
    pub client_id: String,
    pub recipe_id: i64,
    pub recipe_name: String,
    pub package_size_id: i64,
    pub volume_ml: i64,
    pub quantity: i64,
    pub price: f64,
    pub expires_at: i64,
}
