//! HTTP response handling for errors

use super::types::PortalError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

impl ResponseError for PortalError {
    fn status_code(&self) -> StatusCode {
        match self {
            PortalError::Validation(_) | PortalError::BadRequest(_) => StatusCode::BAD_REQUEST,
            PortalError::NotFound(_) => StatusCode::NOT_FOUND,
            PortalError::Auth(_) | PortalError::Network(_) | PortalError::HttpClient(_) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error_code, message) = match self {
            PortalError::Config(_) => ("CONFIG_ERROR", self.to_string()),
            PortalError::Validation(_) => ("VALIDATION_ERROR", self.to_string()),
            PortalError::BadRequest(_) => ("BAD_REQUEST", self.to_string()),
            PortalError::NotFound(_) => ("NOT_FOUND", self.to_string()),
            PortalError::FileStorage(_) => ("FILE_STORAGE_ERROR", self.to_string()),
            PortalError::SubmissionLog(_) => ("SUBMISSION_LOG_ERROR", self.to_string()),
            PortalError::Auth(_) => ("STORAGE_AUTH_ERROR", self.to_string()),
            PortalError::Network(_) | PortalError::HttpClient(_) => {
                ("NETWORK_ERROR", self.to_string())
            }
            _ => ("INTERNAL_ERROR", "An internal error occurred".to_string()),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: error_code.to_string(),
                message,
                timestamp: chrono::Utc::now().timestamp(),
            },
        };

        HttpResponse::build(self.status_code()).json(error_response)
    }
}

/// Standard error response format
#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(serde::Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
}
