use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use git_context_engine::{GitContextEngineError, errors::GitContextEngineProviderError};
use phase_a::PhaseAError;
use thiserror::Error;

use crate::core::http::response_envelope::{ApiErrorDetail, ApiResponse};

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Config(#[from] PhaseAError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("bad request: {message}")]
    BadRequest {
        message: String,
        details: Vec<ApiErrorDetail>,
    },

    #[error("invalid trigger secret")]
    Unauthorized,

    /// Rich HTTP error mapped from lower layers with specific status & code.
    #[error("{message}")]
    Http {
        status: StatusCode,
        code: &'static str,
        message: String,
    },
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 4xx
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,

            // custom mapped
            AppError::Http { status, .. } => *status,

            // 5xx
            AppError::Config(_) | AppError::Bind(_) | AppError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest { .. } => "BAD_REQUEST",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Http { code, .. } => code,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();
        let message = self.to_string();
        let details = match self {
            AppError::BadRequest { details, .. } => details,
            _ => Vec::new(),
        };
        ApiResponse::<()>::error(code, message, details).into_response_with_status(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Convert JSON body rejections to a 400 pointing at the body.
impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        let hint = match &err {
            JsonRejection::JsonDataError(_) => "body does not match the expected fields",
            JsonRejection::JsonSyntaxError(_) => "body is not valid JSON",
            JsonRejection::MissingJsonContentType(_) => "set `Content-Type: application/json`",
            _ => "body could not be read",
        };
        AppError::BadRequest {
            message: err.body_text(),
            details: vec![ApiErrorDetail::new("body", hint)],
        }
    }
}

/// Convert `GitContextEngineError` to `AppError::Http` with precise HTTP status & code.
impl From<GitContextEngineError> for AppError {
    fn from(err: GitContextEngineError) -> Self {
        let message = err.to_string();
        let (status, code) = match &err {
            GitContextEngineError::Validation(_) => {
                (StatusCode::BAD_REQUEST, "INVALID_PULL_REQUEST")
            }
            GitContextEngineError::Config(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "PROVIDER_CONFIG_ERROR")
            }
            GitContextEngineError::Provider(p) => match p {
                GitContextEngineProviderError::NotFound => {
                    (StatusCode::NOT_FOUND, "PULL_REQUEST_NOT_FOUND")
                }
                GitContextEngineProviderError::RateLimited { .. } => {
                    (StatusCode::TOO_MANY_REQUESTS, "PROVIDER_RATE_LIMITED")
                }
                GitContextEngineProviderError::DiffTooLarge => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "DIFF_TOO_LARGE")
                }
                GitContextEngineProviderError::Timeout => {
                    (StatusCode::GATEWAY_TIMEOUT, "PROVIDER_TIMEOUT")
                }
                _ => (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR"),
            },
        };
        AppError::Http {
            status,
            code,
            message,
        }
    }
}
