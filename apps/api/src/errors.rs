use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Error bodies are the flat `{"error": "..."}` shape the clients expect.
/// Authorization and credit failures surface with their own status codes;
/// everything else falls through to a 500 carrying the error's message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Admin access required")]
    Forbidden,

    #[error("Insufficient credits")]
    InsufficientCredits,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("AI service payment required. Please contact support.")]
    ProviderPaymentRequired,

    #[error("AI generation failed")]
    GenerationFailed(String),

    #[error("Invalid AI response format: {0}")]
    MalformedAiResponse(String),

    #[error("Profile not found")]
    ProfileNotFound,

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Identity provider error: {0}")]
    AuthProvider(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            AppError::InsufficientCredits => (StatusCode::PAYMENT_REQUIRED, self.to_string()),
            AppError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, self.to_string()),
            AppError::ProviderPaymentRequired => (StatusCode::PAYMENT_REQUIRED, self.to_string()),
            AppError::GenerationFailed(detail) => {
                tracing::error!("AI generation failed: {detail}");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::MalformedAiResponse(detail) => {
                tracing::error!("Failed to parse AI response: {detail}");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::ProfileNotFound => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            AppError::InvalidAction(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::AuthProvider(detail) => {
                tracing::error!("Identity provider error: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An identity provider error occurred".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::RateLimited => AppError::RateLimited,
            LlmError::PaymentRequired => AppError::ProviderPaymentRequired,
            LlmError::EmptyContent => AppError::GenerationFailed("No content generated".to_string()),
            LlmError::Api { status, message } => {
                AppError::GenerationFailed(format!("provider returned {status}: {message}"))
            }
            LlmError::Http(e) => AppError::GenerationFailed(format!("provider unreachable: {e}")),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthorized => AppError::Unauthorized,
            AuthError::Api { status, message } => {
                AppError::AuthProvider(format!("identity provider returned {status}: {message}"))
            }
            AuthError::Http(e) => AppError::AuthProvider(format!("identity provider unreachable: {e}")),
        }
    }
}
