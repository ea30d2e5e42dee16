//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    ///
    /// Expired reservations surface as 404 on the wire (the row is gone as
    /// far as the client is concerned); the body's `code` field still
    /// distinguishes expired from never-existed.
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::ReservationNotFound
            | Self::ReservationExpired
            | Self::OrderNotFound
            | Self::RecipeNotFound
            | Self::PackageSizeNotFound => StatusCode::NOT_FOUND,

            // 400 Bad Request
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InsufficientStock
            | Self::EmptyCart
            | Self::InvalidOrderStatus => StatusCode::BAD_REQUEST,

            // 500 Internal Server Error
            Self::Unknown | Self::DatabaseError | Self::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
