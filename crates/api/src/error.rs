use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use doorway_control::UnlockError;
use doorway_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps domain errors and implements [`IntoResponse`] to produce consistent
/// `{ "error", "code" }` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Unlock(#[from] UnlockError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut attempt = None;

        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),

            AppError::Unlock(err) => {
                attempt = err.attempt().cloned();
                match err {
                    UnlockError::InFlight => {
                        (StatusCode::CONFLICT, "UNLOCK_IN_PROGRESS", err.to_string())
                    }
                    UnlockError::PreconditionMissing(_) => (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "PRECONDITION_MISSING",
                        err.to_string(),
                    ),
                    UnlockError::GatewayRejected { reason, .. } => {
                        (StatusCode::BAD_GATEWAY, "GATEWAY_REJECTED", reason.clone())
                    }
                    UnlockError::TransportFailure { reason, .. } => {
                        (StatusCode::BAD_GATEWAY, "GATEWAY_UNAVAILABLE", reason.clone())
                    }
                    UnlockError::Session(core) => classify_core_error(core),
                    UnlockError::Aborted(msg) => {
                        tracing::error!(error = %msg, "Unlock task aborted");
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            "INTERNAL_ERROR",
                            "An internal error occurred".to_string(),
                        )
                    }
                }
            }

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(attempt) = attempt {
            body["attempt"] = json!(attempt);
        }

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
    }
}
