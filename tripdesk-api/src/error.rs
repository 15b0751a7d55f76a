use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tripdesk_booking::ExecuteError;

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    SensitiveDataError(String),
    RateLimited { remaining: u32 },
    InternalServerError(String),
}

impl From<ExecuteError> for AppError {
    fn from(err: ExecuteError) -> Self {
        match err {
            ExecuteError::Validation(e) => AppError::ValidationError(e.to_string()),
            ExecuteError::SensitiveData(e) => AppError::SensitiveDataError(e.to_string()),
            ExecuteError::RateLimited { remaining } => AppError::RateLimited { remaining },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::ValidationError(msg) | AppError::SensitiveDataError(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            AppError::RateLimited { remaining } => (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({
                    "error": "Rate limit exceeded. Please try again later.",
                    "remaining": remaining,
                })),
            )
                .into_response(),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal Server Error" })),
                )
                    .into_response()
            }
        }
    }
}
