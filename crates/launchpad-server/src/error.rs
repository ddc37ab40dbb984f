use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use launchpad_core::LaunchpadError;
use serde::Serialize;

/// Body of every failed action response.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub message: String,
}

/// Error returned by action handlers.
///
/// Every kind answers 400 with `{"message": ...}`, which is what Hasura
/// expects from an action handler; the kind only shows up in the logs.
#[derive(Debug)]
pub struct AppError(pub LaunchpadError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::warn!(kind = ?self.0.kind(), error = %self.0, "action failed");
        let body = ErrorEnvelope {
            message: self.0.to_string(),
        };
        (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<LaunchpadError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
