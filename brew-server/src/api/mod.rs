//! API route modules
//!
//! - [`health`] - liveness check
//! - [`beers`] - catalog with live availability
//! - [`cart`] - reservation lifecycle
//! - [`orders`] - checkout and order retrieval

pub mod convert;

pub mod beers;
pub mod cart;
pub mod health;
pub mod orders;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
