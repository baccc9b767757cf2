//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use barangay_api::ApiError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid username or password")]
  InvalidCredentials,

  #[error("password hashing failed: {0}")]
  PasswordHash(String),

  #[error(transparent)]
  Api(#[from] ApiError),
}

/// A [`crate::ServerConfig`] that cannot be served.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("session_ttl_hours must be between 1 and {max}, got {got}")]
  SessionTtl { got: i64, max: i64 },

  #[error("admin_password_hash is not an argon2 PHC string: {0}")]
  AdminPasswordHash(String),
}

impl Error {
  /// Wrap a store error.
  pub fn store<E: Into<barangay_core::Error>>(err: E) -> Self { Self::Api(ApiError::store(err)) }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::InvalidCredentials => (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Please enter a correct username and password." })),
      )
        .into_response(),
      Error::PasswordHash(msg) => {
        tracing::error!(error = %msg, "password hashing failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": "Internal server error." })),
        )
          .into_response()
      }
      Error::Api(e) => e.into_response(),
    }
  }
}
