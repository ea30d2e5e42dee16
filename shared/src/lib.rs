//! Shared types for the brewery storefront
//!
//! Domain models, message-bus event types, the unified error system and
//! small utilities used by both the server and any in-process consumers.

pub mod error;
pub mod message;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use message::BusMessage;
