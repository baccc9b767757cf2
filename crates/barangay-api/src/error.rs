//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use barangay_core::ValidationErrors;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("validation failed")]
  Validation(ValidationErrors),

  #[error("conflict on {field}: {message}")]
  Conflict { field: String, message: String },

  #[error("authentication required")]
  Unauthorized,

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Convert any store error through [`barangay_core::Error`].
  pub fn store<E: Into<barangay_core::Error>>(err: E) -> Self { err.into().into() }
}

impl From<barangay_core::Error> for ApiError {
  fn from(err: barangay_core::Error) -> Self {
    use barangay_core::Error as E;
    match err {
      E::NotFound { .. } => Self::NotFound(err.to_string()),
      E::Validation(fields) => Self::Validation(fields),
      E::ConstraintViolation { field, message } => Self::Conflict { field, message },
      other @ (E::InvalidIdentifierFormat(_) | E::Storage(_)) => Self::Internal(Box::new(other)),
    }
  }
}

impl From<ValidationErrors> for ApiError {
  fn from(errors: ValidationErrors) -> Self { Self::Validation(errors) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, Json(json!({ "error": m }))).into_response(),
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": m }))).into_response()
      }
      ApiError::Validation(fields) => (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "Please correct the errors below.", "fields": fields })),
      )
        .into_response(),
      ApiError::Conflict { field, message } => {
        let mut fields = ValidationErrors::new();
        fields.add(&field, message.clone());
        (StatusCode::CONFLICT, Json(json!({ "error": message, "fields": fields }))).into_response()
      }
      ApiError::Unauthorized => (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Authentication required." })),
      )
        .into_response(),
      ApiError::Internal(e) => {
        tracing::error!(error = %e, "request failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": "Internal server error." })),
        )
          .into_response()
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use barangay_core::ident::EntityKind;

  use super::*;

  #[test]
  fn core_errors_map_to_statuses() {
    let cases = [
      (barangay_core::Error::not_found(EntityKind::Resident, 7), StatusCode::NOT_FOUND),
      (
        barangay_core::Error::ConstraintViolation {
          field:   "household_head".into(),
          message: "taken".into(),
        },
        StatusCode::CONFLICT,
      ),
      (
        barangay_core::Error::InvalidIdentifierFormat("X".into()),
        StatusCode::INTERNAL_SERVER_ERROR,
      ),
      (
        barangay_core::Error::Validation(ValidationErrors::new()),
        StatusCode::BAD_REQUEST,
      ),
    ];
    for (err, status) in cases {
      assert_eq!(ApiError::from(err).into_response().status(), status);
    }
  }
}
