//! Staff accounts, the authenticated users of the portal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
  Admin,
  #[default]
  Staff,
  Viewer,
}

/// A staff member as seen by handlers; carries no secrets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
  pub id:         i64,
  pub username:   String,
  pub full_name:  String,
  pub role:       Role,
  pub is_active:  bool,
  pub created_at: DateTime<Utc>,
}

/// A staff member together with the stored argon2 PHC string.
#[derive(Debug, Clone)]
pub struct StaffCredentials {
  pub staff:         Staff,
  pub password_hash: String,
}

/// Input to [`crate::store::SessionStore::upsert_staff`].
#[derive(Debug, Clone)]
pub struct NewStaff {
  pub username:      String,
  pub full_name:     String,
  pub role:          Role,
  pub password_hash: String,
}
