//! Error types for `barangay-core`.

use std::{collections::BTreeMap, fmt};

use serde::Serialize;
use thiserror::Error;

use crate::ident::EntityKind;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{kind} {id} not found")]
  NotFound { kind: EntityKind, id: i64 },

  /// A stored identifier could not be parsed while computing the next one.
  #[error("invalid identifier format: {0:?}")]
  InvalidIdentifierFormat(String),

  #[error("constraint violation on {field}: {message}")]
  ConstraintViolation { field: String, message: String },

  #[error("validation failed: {0}")]
  Validation(#[from] ValidationErrors),

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn not_found(kind: EntityKind, id: i64) -> Self {
    Self::NotFound { kind, id }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Field-level validation ──────────────────────────────────────────────────

/// Field-level messages collected while validating a form.
///
/// Serialises as `{"field": ["message", ...]}` with fields in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
  fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
  pub fn new() -> Self { Self::default() }

  pub fn add(&mut self, field: &str, message: impl Into<String>) {
    self
      .fields
      .entry(field.to_owned())
      .or_default()
      .push(message.into());
  }

  pub fn is_empty(&self) -> bool { self.fields.is_empty() }

  pub fn contains(&self, field: &str) -> bool { self.fields.contains_key(field) }

  /// Messages recorded for `field`, empty if none.
  pub fn messages(&self, field: &str) -> &[String] {
    self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
    self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
  }

  /// `Ok(value)` when nothing was recorded, otherwise `Err(self)`.
  pub fn into_result<T>(self, value: T) -> Result<T, Self> {
    if self.is_empty() { Ok(value) } else { Err(self) }
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for (field, messages) in &self.fields {
      for message in messages {
        if !first {
          f.write_str("; ")?;
        }
        write!(f, "{field}: {message}")?;
        first = false;
      }
    }
    Ok(())
  }
}

impl std::error::Error for ValidationErrors {}
