use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),
    #[error("Message text is empty")]
    EmptyMessage,
    #[error("Unknown {kind}: {value}")]
    UnknownOption { kind: &'static str, value: String },
    #[error("Unknown grade: {0}")]
    UnknownGrade(String),
    #[error("Credits must be non-negative and their total finite")]
    InvalidCredits,
    #[error("Session is closed")]
    SessionClosed,
    #[error("Too many messages waiting for a reply")]
    QueueFull,
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            AppError::EmptyMessage
            | AppError::UnknownOption { .. }
            | AppError::UnknownGrade(_)
            | AppError::InvalidCredits => StatusCode::BAD_REQUEST,
            AppError::SessionClosed => StatusCode::CONFLICT,
            AppError::QueueFull => StatusCode::TOO_MANY_REQUESTS,
            AppError::Csv(_) | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::SessionNotFound(Uuid::nil()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::EmptyMessage.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::SessionClosed.status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::QueueFull.status_code(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_unknown_option_message() {
        let err = AppError::UnknownOption {
            kind: "department",
            value: "Chemical Engineering".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown department: Chemical Engineering");
    }
}
