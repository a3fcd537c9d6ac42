//! Error-to-response translation.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Newtype mapping [`platter::Error`] onto HTTP: missing entities are 404,
/// rejected input 422, storage trouble 500. Every body is
/// `{"error": "<message>"}`.
pub struct ApiError(pub platter::Error);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<platter::Error> for ApiError {
    fn from(err: platter::Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            platter::Error::NotFound(_) => StatusCode::NOT_FOUND,
            platter::Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            platter::Error::Postgres(_) | platter::Error::Pool(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
