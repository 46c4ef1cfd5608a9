use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    /// Uniqueness violation. Reported as a client error, not a server fault.
    #[error("{0}")]
    Conflict(String),
}

impl AppError {
    pub fn course_not_found() -> Self {
        AppError::NotFound("Course not found".to_string())
    }

    pub fn student_not_found() -> Self {
        AppError::NotFound("Student not found".to_string())
    }

    pub fn duplicate_course_code() -> Self {
        AppError::Conflict("Course code already exists".to_string())
    }

    pub fn duplicate_student_email() -> Self {
        AppError::Conflict("Student email already exists".to_string())
    }

    /// Maps a unique-index violation from the store onto `conflict`, leaving
    /// other errors untouched. Covers writers that raced past the pre-check.
    pub fn from_unique_violation(err: sqlx::Error, conflict: fn() -> AppError) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return conflict();
            }
        }
        AppError::Database(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Database(e) => {
                error!("database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: status.to_string(),
            message: error_message,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::course_not_found(), StatusCode::NOT_FOUND),
            (AppError::duplicate_course_code(), StatusCode::BAD_REQUEST),
            (AppError::Validation("name is required".into()), StatusCode::BAD_REQUEST),
            (AppError::Database(sqlx::Error::PoolTimedOut), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_non_unique_errors_pass_through() {
        let err = AppError::from_unique_violation(
            sqlx::Error::RowNotFound,
            AppError::duplicate_student_email,
        );
        assert!(matches!(err, AppError::Database(sqlx::Error::RowNotFound)));
    }
}
