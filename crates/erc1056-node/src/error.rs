use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use erc1056_ledger::LedgerError;
use erc1056_registry::ErrorKind;
use serde::Serialize;

/// API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Caller or signer does not control the identity
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg),
            ApiError::InvalidSignature(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_SIGNATURE", msg)
            }
            ApiError::Internal(err) => {
                tracing::error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetails {
                code: code.to_string(),
                message,
            },
        });

        (status, body).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(error: LedgerError) -> Self {
        match error.kind() {
            ErrorKind::Unauthorized => ApiError::Forbidden(error.to_string()),
            ErrorKind::InvalidArgument => ApiError::InvalidRequest(error.to_string()),
            ErrorKind::SignatureInvalid => ApiError::InvalidSignature(error.to_string()),
            ErrorKind::Internal => ApiError::Internal(anyhow::Error::new(error)),
        }
    }
}
