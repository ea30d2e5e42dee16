//! Error bridging
//!
//! Repositories speak [`RepoError`]; handlers and services speak
//! [`AppError`]. The conversion lives here so `?` works across the seam.

pub use shared::{ApiResponse, AppError, AppResult, ErrorCode};

use crate::db::repository::RepoError;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::validation(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_not_found_maps_to_404() {
        let err: AppError = RepoError::NotFound("Recipe 7 not found".into()).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.http_status(), http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn repo_validation_maps_to_400() {
        let err: AppError = RepoError::Validation("quantity".into()).into();
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
    }
}
