//! Resident records, one row per person living in the barangay.

use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ─── Choices ─────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
)]
pub enum Gender {
  #[serde(rename = "M")]
  #[strum(serialize = "M")]
  Male,
  #[serde(rename = "F")]
  #[strum(serialize = "F")]
  Female,
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CivilStatus {
  Single,
  Married,
  Widowed,
  Separated,
  Divorced,
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EmploymentStatus {
  Employed,
  Unemployed,
  SelfEmployed,
  Student,
  Retired,
}

// ─── Editable fields ─────────────────────────────────────────────────────────

/// Everything staff can edit on a resident, already validated.
///
/// `household` and `relationship_to_head` are plain writes: the store only
/// checks that the household row exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidentFields {
  pub first_name:           String,
  pub middle_name:          String,
  pub last_name:            String,
  pub suffix:               String,
  pub date_of_birth:        NaiveDate,
  pub gender:               Gender,
  pub civil_status:         CivilStatus,
  pub phone_number:         String,
  pub email:                String,
  pub purok:                String,
  pub street:               String,
  pub household:            Option<i64>,
  pub relationship_to_head: String,
  pub is_pwd:               bool,
  pub is_senior:            bool,
  pub is_4ps:               bool,
  pub employment_status:    Option<EmploymentStatus>,
  pub occupation:           String,
  pub notes:                String,
}

/// Input to [`crate::store::RegistryStore::create_resident`].
#[derive(Debug, Clone)]
pub struct NewResident {
  /// Caller-supplied identifier; `None` lets the store assign the next one.
  pub resident_id: Option<String>,
  pub fields:      ResidentFields,
  /// The staff member recording the resident.
  pub created_by:  Option<i64>,
}

// ─── Resident ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resident {
  /// Internal insertion sequence; used in URLs.
  pub id:                 i64,
  /// `RES-0001` style identifier. Never changes once assigned.
  pub resident_id:        String,
  #[serde(flatten)]
  pub fields:             ResidentFields,
  pub has_portal_account: bool,
  pub is_active:          bool,
  pub created_by:         Option<i64>,
  pub created_at:         DateTime<Utc>,
  pub updated_at:         DateTime<Utc>,
}

impl Resident {
  /// First, middle and last name plus suffix, skipping blank parts.
  pub fn full_name(&self) -> String {
    let f = &self.fields;
    display_name(&f.first_name, &f.middle_name, &f.last_name, &f.suffix)
  }

  pub fn full_address(&self) -> String {
    format!("{}, Purok {}", self.fields.street, self.fields.purok)
  }

  /// Age in whole years on `today`.
  pub fn age_on(&self, today: NaiveDate) -> i32 {
    age_between(self.fields.date_of_birth, today)
  }

  /// Age in whole years as of the local current date.
  pub fn age(&self) -> i32 { self.age_on(Local::now().date_naive()) }
}

/// `"Juan Reyes Dela Cruz Jr."`; blank parts are skipped.
pub fn display_name(first: &str, middle: &str, last: &str, suffix: &str) -> String {
  [first, middle, last, suffix]
    .into_iter()
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
}

/// Completed years between `born` and `on`.
///
/// One less than the difference in years if the birthday has not yet come
/// round in `on`'s year. A 29 February birthday counts from 1 March in
/// common years.
pub fn age_between(born: NaiveDate, on: NaiveDate) -> i32 {
  let before_birthday = (on.month(), on.day()) < (born.month(), born.day());
  on.year() - born.year() - i32::from(before_birthday)
}
