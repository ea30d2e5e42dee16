//! Unified error codes
//!
//! Error codes are shared between the server and its clients so that the
//! frontend can branch on them without parsing messages. They serialize as
//! plain `u16` values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed (malformed or missing input)
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 1xxx: Reservation ====================
    /// Reservation (hold) not found
    ReservationNotFound = 1001,
    /// Reservation has expired
    ReservationExpired = 1002,
    /// Requested quantity exceeds current availability
    InsufficientStock = 1003,
    /// Checkout attempted with no active holds
    EmptyCart = 1004,

    // ==================== 2xxx: Order ====================
    /// Order not found
    OrderNotFound = 2001,
    /// Status string outside the allowed set
    InvalidOrderStatus = 2002,

    // ==================== 3xxx: Catalog ====================
    /// Recipe (product) not found
    RecipeNotFound = 3001,
    /// Package size not found
    PackageSizeNotFound = 3002,

    // ==================== 9xxx: System ====================
    /// Database error
    DatabaseError = 9001,
    /// Internal server error
    InternalError = 9002,
}

/// Error returned when converting an unknown `u16` into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Success),
            1 => Ok(Self::Unknown),
            2 => Ok(Self::ValidationFailed),
            3 => Ok(Self::NotFound),
            5 => Ok(Self::InvalidRequest),
            1001 => Ok(Self::ReservationNotFound),
            1002 => Ok(Self::ReservationExpired),
            1003 => Ok(Self::InsufficientStock),
            1004 => Ok(Self::EmptyCart),
            2001 => Ok(Self::OrderNotFound),
            2002 => Ok(Self::InvalidOrderStatus),
            3001 => Ok(Self::RecipeNotFound),
            3002 => Ok(Self::PackageSizeNotFound),
            9001 => Ok(Self::DatabaseError),
            9002 => Ok(Self::InternalError),
            other => Err(InvalidErrorCode(other)),
        }
    }
}

impl ErrorCode {
    /// Default human-readable message for this code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "OK",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::InvalidRequest => "Invalid request",
            Self::ReservationNotFound => "Reservation not found",
            Self::ReservationExpired => "Reservation has expired",
            Self::InsufficientStock => "Insufficient stock",
            Self::EmptyCart => "Cart is empty",
            Self::OrderNotFound => "Order not found",
            Self::InvalidOrderStatus => "Invalid order status",
            Self::RecipeNotFound => "Recipe not found",
            Self::PackageSizeNotFound => "Package size not found",
            Self::DatabaseError => "Database error",
            Self::InternalError => "Internal server error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u16)
    }
}
