//! Domain models
//!
//! Persisted rows derive `sqlx::FromRow`; timestamps are Unix milliseconds
//! (`i64`) throughout, produced by [`crate::util::now_millis`].

pub mod client;
pub mod order;
pub mod package_size;
pub mod recipe;
pub mod reservation;
pub mod stock;

pub use client::Client;
pub use order::{Order, OrderLineDetail, OrderStatus};
pub use stock::StockLevel;
pub use package_size::{PackageSize, REFERENCE_VOLUME_ML};
pub use recipe::Recipe;
pub use reservation::{Reservation, ReservationDetail};
