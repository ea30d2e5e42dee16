//! Server-side utilities
//!
//! - [`error`] - repository-to-API error bridging (types from `shared::error`)
//! - [`logger`] - tracing setup

pub mod error;
pub mod logger;

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
