use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use futbot_brokers_crypto::ClientError;
use futbot_core::{ValidationError, ValidationErrors};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

/// Failure of a web request: bad user input or a failed exchange call.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl From<ValidationError> for WebError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.into())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        warn!(error = %message, "Request failed");
        (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
    }
}
