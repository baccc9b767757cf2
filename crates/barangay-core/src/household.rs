//! Households: family units grouping residents.
//!
//! A household's head and its members are two independent links: the head
//! is a one-to-one reference held by the household, membership is a
//! nullable reference held by each resident. Nothing forces them to agree.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HousingType {
  Owned,
  Rented,
  /// Informal settler.
  Informal,
  RentFree,
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
pub enum HousingCondition {
  Good,
  Fair,
  Dilapidated,
  Makeshift,
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
pub enum WaterSource {
  Piped,
  Well,
  Public,
  Other,
}

// ─── Editable fields ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdFields {
  /// Internal id of the head resident; unique across households.
  pub household_head:    Option<i64>,
  pub street:            String,
  pub purok:             String,
  pub housing_type:      HousingType,
  pub housing_condition: HousingCondition,
  pub has_electricity:   bool,
  pub has_water:         bool,
  pub water_source:      Option<WaterSource>,
  pub monthly_income:    Option<Decimal>,
  pub notes:             String,
}

/// Input to [`crate::store::RegistryStore::create_household`].
#[derive(Debug, Clone)]
pub struct NewHousehold {
  pub household_id: Option<String>,
  pub fields:       HouseholdFields,
  pub created_by:   Option<i64>,
}

// ─── Household ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Household {
  pub id:           i64,
  /// `HH-0001` style identifier.
  pub household_id: String,
  #[serde(flatten)]
  pub fields:       HouseholdFields,
  pub is_active:    bool,
  pub created_by:   Option<i64>,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

impl Household {
  pub fn full_address(&self) -> String {
    format!("{}, Purok {}", self.fields.street, self.fields.purok)
  }
}

// ─── Read model ──────────────────────────────────────────────────────────────

/// Just enough of the head resident to label a household in a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadSummary {
  pub id:          i64,
  pub resident_id: String,
  pub full_name:   String,
  /// The head may have been deactivated without the link being cleared.
  pub is_active:   bool,
}

/// A household as read: the row plus values derived at query time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdView {
  #[serde(flatten)]
  pub household:    Household,
  pub head:         Option<HeadSummary>,
  /// Active residents linked to this household, counted on every read.
  pub member_count: u32,
}

impl HouseholdView {
  /// `"Household HH-0001 - Juan Dela Cruz"`, or `No Head` when unset.
  pub fn label(&self) -> String {
    let head = self
      .head
      .as_ref()
      .map(|h| h.full_name.as_str())
      .unwrap_or("No Head");
    format!("Household {} - {head}", self.household.household_id)
  }
}
