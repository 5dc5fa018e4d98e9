//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use vitae_core::validation::ValidationErrors;

pub const NOT_PROVIDED: &str = "Authentication credentials were not provided.";
pub const INVALID_TOKEN: &str = "Invalid token.";
pub const INVALID_HEADER: &str = "Invalid token header.";
pub const INVALID_CREDENTIALS: &str = "Unable to authenticate with provided credentials.";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// 401 with the given `detail`.
  #[error("unauthenticated: {0}")]
  Unauthenticated(&'static str),

  #[error("invalid credentials")]
  InvalidCredentials,

  #[error("not found")]
  NotFound,

  #[error("validation failed: {0}")]
  Validation(ValidationErrors),

  /// The body could not be read as JSON of the expected shape.
  #[error("bad request: {0}")]
  BadRequest(String),

  /// Never shown to the client; logged when the response is built.
  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<vitae_core::Error> for ApiError {
  fn from(e: vitae_core::Error) -> Self {
    use vitae_core::Error as Core;
    match e {
      Core::Unauthorized => ApiError::Unauthenticated(INVALID_TOKEN),
      Core::InvalidCredentials => ApiError::InvalidCredentials,
      Core::NotFound => ApiError::NotFound,
      Core::Validation(errors) => ApiError::Validation(errors),
      other @ (Core::Credential(_) | Core::Store(_)) => ApiError::Internal(Box::new(other)),
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::Unauthenticated(detail) => {
        let mut res =
          (StatusCode::UNAUTHORIZED, Json(json!({ "detail": detail }))).into_response();
        res
          .headers_mut()
          .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Token"));
        res
      }
      ApiError::InvalidCredentials => (
        StatusCode::BAD_REQUEST,
        Json(json!({ "non_field_errors": [INVALID_CREDENTIALS] })),
      )
        .into_response(),
      ApiError::NotFound => {
        (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found." }))).into_response()
      }
      ApiError::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
      ApiError::BadRequest(detail) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "detail": detail }))).into_response()
      }
      ApiError::Internal(e) => {
        tracing::error!(error = %e, "request failed with an internal error");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "detail": "A server error occurred." })),
        )
          .into_response()
      }
    }
  }
}
