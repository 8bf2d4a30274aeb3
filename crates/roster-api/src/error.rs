//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every 400/404 response carries the legacy envelope
//! `{"result":"failure","msg":"...","error":"<status digits>"}`. Anything
//! unanticipated collapses to a plain-text `Something went wrong` with no
//! structured detail, so internals never leak to the caller.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// The opaque body used for any internal fault (and for caught panics).
pub const OPAQUE_FAILURE: &str = "Something went wrong";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// A required field was absent from the payload. Carries the
  /// presentation name of the field ("First name", "Email", ...).
  #[error("{0} cannot be empty")]
  MissingField(String),

  /// The id does not resolve. The legacy surface reports this as 400,
  /// not 404.
  #[error("Invalid ID")]
  InvalidId,

  /// The live person table is empty; the one condition reported as 404.
  #[error("Currently no people in the database. Please try again later")]
  EmptyStore,

  #[error("Invalid Version")]
  InvalidVersion,

  #[error("internal error")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<roster_core::Error> for ApiError {
  fn from(e: roster_core::Error) -> Self {
    match e {
      roster_core::Error::MissingField(f) => ApiError::MissingField(f.to_string()),
      roster_core::Error::NotFound(_) => ApiError::InvalidId,
      roster_core::Error::InvalidVersion { .. } => ApiError::InvalidVersion,
      roster_core::Error::Internal(source) => ApiError::Internal(source),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::EmptyStore => StatusCode::NOT_FOUND,
      ApiError::Internal(source) => {
        tracing::error!(error = %source, "unhandled fault in request handler");
        return (StatusCode::INTERNAL_SERVER_ERROR, OPAQUE_FAILURE).into_response();
      }
      _ => StatusCode::BAD_REQUEST,
    };

    let body = json!({
      "result": "failure",
      "msg":    self.to_string(),
      "error":  status.as_u16().to_string(),
    });
    (status, Json(body)).into_response()
  }
}
