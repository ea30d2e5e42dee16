//! Client Model
//!
//! Identity itself lives in the external auth layer; this row only anchors
//! foreign keys for holds and orders.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Client {
    /// Opaque id issued by the auth layer
    pub id: String,
    pub name: String,
    pub email: Option<String>,
}
