//! Error type for `barangay-store-sqlite`.

use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] barangay_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("decimal parse error: {0}")]
  Decimal(#[from] rust_decimal::Error),

  /// A stored enum column held a value no variant matches.
  #[error("unknown {column} value: {value:?}")]
  UnknownValue { column: &'static str, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
  /// Turn SQLite constraint failures into
  /// [`barangay_core::Error::ConstraintViolation`]; pass everything else
  /// through.
  ///
  /// The field comes from the SQLite message (`UNIQUE constraint failed:
  /// households.household_head_id`) when it names a column, otherwise
  /// `fallback_field` is used (foreign key failures name none).
  pub(crate) fn from_write(err: tokio_rusqlite::Error, fallback_field: &str) -> Self {
    let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(code, message)) = &err
    else {
      return Self::Database(err);
    };
    if code.code != ErrorCode::ConstraintViolation {
      return Self::Database(err);
    }

    let message = message.clone().unwrap_or_else(|| "constraint failed".to_owned());
    let (field, friendly) = match constraint_field(&message) {
      Some(column) => describe(column, &message),
      None if message.contains("FOREIGN KEY") => (
        fallback_field.to_owned(),
        format!("Select a valid {}.", fallback_field.replace('_', " ")),
      ),
      None => (fallback_field.to_owned(), message.clone()),
    };

    Self::Core(barangay_core::Error::ConstraintViolation { field, message: friendly })
  }
}

/// Column named in `"<KIND> constraint failed: table.column"`.
fn constraint_field(message: &str) -> Option<&str> {
  let (_, target) = message.split_once("failed: ")?;
  let first = target.split(',').next()?.trim();
  let (_, column) = first.split_once('.')?;
  Some(column)
}

/// Map a column back to its form field with a readable message.
fn describe(column: &str, raw: &str) -> (String, String) {
  let (field, message) = match column {
    "household_head_id" => (
      "household_head",
      "This resident is already the head of another household.",
    ),
    "resident_id" => ("resident_id", "Resident with this identifier already exists."),
    "household_id" => ("household_id", "Household with this identifier already exists."),
    other => (other, raw),
  };
  (field.to_owned(), message.to_owned())
}

impl From<Error> for barangay_core::Error {
  fn from(err: Error) -> Self {
    match err {
      Error::Core(e) => e,
      other => Self::Storage(Box::new(other)),
    }
  }
}
