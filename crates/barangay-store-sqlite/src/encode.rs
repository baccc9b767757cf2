//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are fixed-width RFC 3339 UTC strings (microseconds, `Z`), so
//! lexical and chronological order agree. Dates are `YYYY-MM-DD`. Enums are
//! stored as their snake_case names, decimals as their string form.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rust_decimal::Decimal;

use barangay_core::{
  household::{HeadSummary, Household, HouseholdFields, HouseholdView},
  resident::{Resident, ResidentFields, display_name},
  staff::Staff,
};

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(e.to_string()))
}

pub fn decode_enum<T: FromStr>(column: &'static str, s: &str) -> Result<T> {
  s.parse()
    .map_err(|_| Error::UnknownValue { column, value: s.to_owned() })
}

fn decode_opt_enum<T: FromStr>(column: &'static str, s: Option<String>) -> Result<Option<T>> {
  s.as_deref().map(|v| decode_enum(column, v)).transpose()
}

// ─── Column lists ────────────────────────────────────────────────────────────

/// Columns read by [`RawResident::from_row`], aliased `r`.
pub const RESIDENT_COLUMNS: &str = "
  r.id, r.resident_id, r.first_name, r.middle_name, r.last_name, r.suffix,
  r.date_of_birth, r.gender, r.civil_status, r.phone_number, r.email,
  r.purok, r.street, r.household_id, r.relationship_to_head,
  r.is_pwd, r.is_senior, r.is_4ps, r.employment_status, r.occupation,
  r.has_portal_account, r.is_active, r.notes, r.created_by,
  r.created_at, r.updated_at";

/// Columns read by [`RawHousehold::from_row`]: the household `h`, its head
/// `hd` (LEFT JOIN) and the live member count.
pub const HOUSEHOLD_COLUMNS: &str = "
  h.id, h.household_id, h.household_head_id, h.street, h.purok,
  h.housing_type, h.housing_condition, h.has_electricity, h.has_water,
  h.water_source, h.monthly_income, h.notes, h.is_active, h.created_by,
  h.created_at, h.updated_at,
  hd.resident_id, hd.first_name, hd.middle_name, hd.last_name, hd.suffix,
  hd.is_active,
  (SELECT COUNT(*) FROM residents m
    WHERE m.household_id = h.id AND m.is_active = 1) AS member_count";

/// `FROM` clause matching [`HOUSEHOLD_COLUMNS`].
pub const HOUSEHOLD_FROM: &str =
  "households h LEFT JOIN residents hd ON hd.id = h.household_head_id";

pub const STAFF_COLUMNS: &str =
  "s.id, s.username, s.full_name, s.role, s.is_active, s.created_at";

// ─── Write-side rows ─────────────────────────────────────────────────────────

/// [`ResidentFields`] flattened to column values, ready to move into a
/// connection closure.
pub struct ResidentRow {
  pub first_name:           String,
  pub middle_name:          String,
  pub last_name:            String,
  pub suffix:               String,
  pub date_of_birth:        String,
  pub gender:               String,
  pub civil_status:         String,
  pub phone_number:         String,
  pub email:                String,
  pub purok:                String,
  pub street:               String,
  pub household:            Option<i64>,
  pub relationship_to_head: String,
  pub is_pwd:               bool,
  pub is_senior:            bool,
  pub is_4ps:               bool,
  pub employment_status:    Option<String>,
  pub occupation:           String,
  pub notes:                String,
}

impl From<ResidentFields> for ResidentRow {
  fn from(f: ResidentFields) -> Self {
    Self {
      first_name:           f.first_name,
      middle_name:          f.middle_name,
      last_name:            f.last_name,
      suffix:               f.suffix,
      date_of_birth:        encode_date(f.date_of_birth),
      gender:               f.gender.to_string(),
      civil_status:         f.civil_status.to_string(),
      phone_number:         f.phone_number,
      email:                f.email,
      purok:                f.purok,
      street:               f.street,
      household:            f.household,
      relationship_to_head: f.relationship_to_head,
      is_pwd:               f.is_pwd,
      is_senior:            f.is_senior,
      is_4ps:               f.is_4ps,
      employment_status:    f.employment_status.map(|e| e.to_string()),
      occupation:           f.occupation,
      notes:                f.notes,
    }
  }
}

/// [`HouseholdFields`] flattened to column values.
pub struct HouseholdRow {
  pub household_head:    Option<i64>,
  pub street:            String,
  pub purok:             String,
  pub housing_type:      String,
  pub housing_condition: String,
  pub has_electricity:   bool,
  pub has_water:         bool,
  pub water_source:      Option<String>,
  pub monthly_income:    Option<String>,
  pub notes:             String,
}

impl From<HouseholdFields> for HouseholdRow {
  fn from(f: HouseholdFields) -> Self {
    Self {
      household_head:    f.household_head,
      street:            f.street,
      purok:             f.purok,
      housing_type:      f.housing_type.to_string(),
      housing_condition: f.housing_condition.to_string(),
      has_electricity:   f.has_electricity,
      has_water:         f.has_water,
      water_source:      f.water_source.map(|w| w.to_string()),
      monthly_income:    f.monthly_income.map(|d| d.to_string()),
      notes:             f.notes,
    }
  }
}

// ─── Read-side rows ──────────────────────────────────────────────────────────

/// Raw values read directly from a `residents` row.
pub struct RawResident {
  pub id:                   i64,
  pub resident_id:          String,
  pub first_name:           String,
  pub middle_name:          String,
  pub last_name:            String,
  pub suffix:               String,
  pub date_of_birth:        String,
  pub gender:               String,
  pub civil_status:         String,
  pub phone_number:         String,
  pub email:                String,
  pub purok:                String,
  pub street:               String,
  pub household:            Option<i64>,
  pub relationship_to_head: String,
  pub is_pwd:               bool,
  pub is_senior:            bool,
  pub is_4ps:               bool,
  pub employment_status:    Option<String>,
  pub occupation:           String,
  pub has_portal_account:   bool,
  pub is_active:            bool,
  pub notes:                String,
  pub created_by:           Option<i64>,
  pub created_at:           String,
  pub updated_at:           String,
}

impl RawResident {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                   row.get(0)?,
      resident_id:          row.get(1)?,
      first_name:           row.get(2)?,
      middle_name:          row.get(3)?,
      last_name:            row.get(4)?,
      suffix:               row.get(5)?,
      date_of_birth:        row.get(6)?,
      gender:               row.get(7)?,
      civil_status:         row.get(8)?,
      phone_number:         row.get(9)?,
      email:                row.get(10)?,
      purok:                row.get(11)?,
      street:               row.get(12)?,
      household:            row.get(13)?,
      relationship_to_head: row.get(14)?,
      is_pwd:               row.get(15)?,
      is_senior:            row.get(16)?,
      is_4ps:               row.get(17)?,
      employment_status:    row.get(18)?,
      occupation:           row.get(19)?,
      has_portal_account:   row.get(20)?,
      is_active:            row.get(21)?,
      notes:                row.get(22)?,
      created_by:           row.get(23)?,
      created_at:           row.get(24)?,
      updated_at:           row.get(25)?,
    })
  }

  pub fn into_resident(self) -> Result<Resident> {
    let fields = ResidentFields {
      first_name:           self.first_name,
      middle_name:          self.middle_name,
      last_name:            self.last_name,
      suffix:               self.suffix,
      date_of_birth:        decode_date(&self.date_of_birth)?,
      gender:               decode_enum("gender", &self.gender)?,
      civil_status:         decode_enum("civil_status", &self.civil_status)?,
      phone_number:         self.phone_number,
      email:                self.email,
      purok:                self.purok,
      street:               self.street,
      household:            self.household,
      relationship_to_head: self.relationship_to_head,
      is_pwd:               self.is_pwd,
      is_senior:            self.is_senior,
      is_4ps:               self.is_4ps,
      employment_status:    decode_opt_enum("employment_status", self.employment_status)?,
      occupation:           self.occupation,
      notes:                self.notes,
    };

    Ok(Resident {
      id: self.id,
      resident_id: self.resident_id,
      fields,
      has_portal_account: self.has_portal_account,
      is_active: self.is_active,
      created_by: self.created_by,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values from a household row joined with its head.
pub struct RawHousehold {
  pub id:                i64,
  pub household_id:      String,
  pub household_head:    Option<i64>,
  pub street:            String,
  pub purok:             String,
  pub housing_type:      String,
  pub housing_condition: String,
  pub has_electricity:   bool,
  pub has_water:         bool,
  pub water_source:      Option<String>,
  pub monthly_income:    Option<String>,
  pub notes:             String,
  pub is_active:         bool,
  pub created_by:        Option<i64>,
  pub created_at:        String,
  pub updated_at:        String,
  // head join
  pub head_resident_id:  Option<String>,
  pub head_first_name:   Option<String>,
  pub head_middle_name:  Option<String>,
  pub head_last_name:    Option<String>,
  pub head_suffix:       Option<String>,
  pub head_is_active:    Option<bool>,
  pub member_count:      u32,
}

impl RawHousehold {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                row.get(0)?,
      household_id:      row.get(1)?,
      household_head:    row.get(2)?,
      street:            row.get(3)?,
      purok:             row.get(4)?,
      housing_type:      row.get(5)?,
      housing_condition: row.get(6)?,
      has_electricity:   row.get(7)?,
      has_water:         row.get(8)?,
      water_source:      row.get(9)?,
      monthly_income:    row.get(10)?,
      notes:             row.get(11)?,
      is_active:         row.get(12)?,
      created_by:        row.get(13)?,
      created_at:        row.get(14)?,
      updated_at:        row.get(15)?,
      head_resident_id:  row.get(16)?,
      head_first_name:   row.get(17)?,
      head_middle_name:  row.get(18)?,
      head_last_name:    row.get(19)?,
      head_suffix:       row.get(20)?,
      head_is_active:    row.get(21)?,
      member_count:      row.get(22)?,
    })
  }

  pub fn into_view(self) -> Result<HouseholdView> {
    let head = match (self.household_head, self.head_resident_id) {
      (Some(id), Some(resident_id)) => Some(HeadSummary {
        id,
        resident_id,
        full_name: display_name(
          self.head_first_name.as_deref().unwrap_or_default(),
          self.head_middle_name.as_deref().unwrap_or_default(),
          self.head_last_name.as_deref().unwrap_or_default(),
          self.head_suffix.as_deref().unwrap_or_default(),
        ),
        is_active: self.head_is_active.unwrap_or(false),
      }),
      _ => None,
    };

    let fields = HouseholdFields {
      household_head:    self.household_head,
      street:            self.street,
      purok:             self.purok,
      housing_type:      decode_enum("housing_type", &self.housing_type)?,
      housing_condition: decode_enum("housing_condition", &self.housing_condition)?,
      has_electricity:   self.has_electricity,
      has_water:         self.has_water,
      water_source:      decode_opt_enum("water_source", self.water_source)?,
      monthly_income:    self
        .monthly_income
        .as_deref()
        .map(Decimal::from_str)
        .transpose()?,
      notes:             self.notes,
    };

    let household = Household {
      id: self.id,
      household_id: self.household_id,
      fields,
      is_active: self.is_active,
      created_by: self.created_by,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    };

    Ok(HouseholdView { household, head, member_count: self.member_count })
  }
}

/// Raw values from a `staff` row (without the password hash).
pub struct RawStaff {
  pub id:         i64,
  pub username:   String,
  pub full_name:  String,
  pub role:       String,
  pub is_active:  bool,
  pub created_at: String,
}

impl RawStaff {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      username:   row.get(1)?,
      full_name:  row.get(2)?,
      role:       row.get(3)?,
      is_active:  row.get(4)?,
      created_at: row.get(5)?,
    })
  }

  pub fn into_staff(self) -> Result<Staff> {
    Ok(Staff {
      id:         self.id,
      username:   self.username,
      full_name:  self.full_name,
      role:       decode_enum("role", &self.role)?,
      is_active:  self.is_active,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
