//! Raw form input and its validation.
//!
//! Forms arrive with every field optional so that a missing required field
//! becomes a field-level message instead of a deserialisation failure.
//! Choices, dates, references and amounts arrive as raw [`Input`] and are
//! parsed here for the same reason. Text is trimmed before any check.

use std::{str::FromStr, sync::LazyLock};

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
  error::ValidationErrors,
  household::{
    HouseholdFields, HousingCondition, HousingType, NewHousehold, WaterSource,
  },
  ident::{EntityKind, MAX_IDENTIFIER_LEN},
  resident::{CivilStatus, EmploymentStatus, Gender, NewResident, ResidentFields},
};

const REQUIRED: &str = "This field is required.";
const INVALID_CHOICE: &str = "Select a valid choice.";
const INVALID_REFERENCE: &str =
  "Select a valid choice. That choice is not one of the available choices.";
const INVALID_DATE: &str = "Enter a valid date.";
const INVALID_NUMBER: &str = "Enter a number.";

static PHONE_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\+?1?\d{9,15}$").expect("valid phone regex"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("valid email regex")
});

// ─── Raw input ───────────────────────────────────────────────────────────────

/// A submitted scalar, kept as-is until validation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Input {
  Text(String),
  Int(i64),
  Float(f64),
  Bool(bool),
}

impl Input {
  fn into_text(self) -> String {
    match self {
      Self::Text(s) => s.trim().to_owned(),
      Self::Int(n) => n.to_string(),
      Self::Float(n) => n.to_string(),
      Self::Bool(b) => b.to_string(),
    }
  }

  fn is_blank(&self) -> bool { matches!(self, Self::Text(s) if s.trim().is_empty()) }
}

impl From<&str> for Input {
  fn from(value: &str) -> Self { Self::Text(value.to_owned()) }
}

impl From<i64> for Input {
  fn from(value: i64) -> Self { Self::Int(value) }
}

// ─── Field helpers ───────────────────────────────────────────────────────────

struct Checker {
  errors: ValidationErrors,
}

impl Checker {
  fn new() -> Self { Self { errors: ValidationErrors::new() } }

  /// Trim, then enforce `max` characters.
  fn text(&mut self, field: &str, value: String, max: usize) -> String {
    let value = value.trim().to_owned();
    let len = value.chars().count();
    if len > max {
      self.errors.add(
        field,
        format!("Ensure this value has at most {max} characters (it has {len})."),
      );
    }
    value
  }

  fn required_text(&mut self, field: &str, value: String, max: usize) -> String {
    let value = self.text(field, value, max);
    if value.is_empty() {
      self.errors.add(field, REQUIRED);
    }
    value
  }

  /// Parse a non-blank input; blank means absent. An unparseable value is
  /// reported under `field` with `message`.
  fn parsed<T>(
    &mut self,
    field: &str,
    value: Option<Input>,
    message: &str,
    parse: impl FnOnce(&str) -> Option<T>,
  ) -> Option<T> {
    let text = value.filter(|v| !v.is_blank())?.into_text();
    let parsed = parse(&text);
    if parsed.is_none() {
      self.errors.add(field, message);
    }
    parsed
  }

  /// Report a missing value unless `parsed` already reported a bad one.
  fn present<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
    if value.is_none() && !self.errors.contains(field) {
      self.errors.add(field, REQUIRED);
    }
    value
  }

  fn choice<T: FromStr>(&mut self, field: &str, value: Option<Input>) -> Option<T> {
    self.parsed(field, value, INVALID_CHOICE, |s| s.parse().ok())
  }

  fn required_choice<T: FromStr>(&mut self, field: &str, value: Option<Input>) -> Option<T> {
    let choice = self.choice(field, value);
    self.present(field, choice)
  }

  fn required_date(&mut self, field: &str, value: Option<Input>) -> Option<NaiveDate> {
    let date = self.parsed(field, value, INVALID_DATE, |s| {
      NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
    });
    self.present(field, date)
  }

  /// A primary key chosen from a list.
  fn reference(&mut self, field: &str, value: Option<Input>) -> Option<i64> {
    self.parsed(field, value, INVALID_REFERENCE, |s| s.parse().ok())
  }

  fn decimal(&mut self, field: &str, value: Option<Input>) -> Option<Decimal> {
    self.parsed(field, value, INVALID_NUMBER, |s| Decimal::from_str(s).ok())
  }

  fn identifier(&mut self, field: &str, kind: EntityKind, value: Option<String>) -> Option<String> {
    let value = value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())?;
    let len = value.chars().count();
    if len > MAX_IDENTIFIER_LEN {
      self.errors.add(
        field,
        format!("Ensure this value has at most {MAX_IDENTIFIER_LEN} characters (it has {len})."),
      );
    } else if !kind.is_well_formed(&value) {
      self.errors.add(
        field,
        format!("Identifier must look like {}.", kind.format(1)),
      );
    }
    Some(value)
  }
}

// ─── Resident form ───────────────────────────────────────────────────────────

/// Resident form as submitted for create and edit.
///
/// `resident_id` is honoured on create only; an edit never changes the
/// stored identifier.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResidentForm {
  pub resident_id:          Option<String>,
  pub first_name:           String,
  pub middle_name:          String,
  pub last_name:            String,
  pub suffix:               String,
  pub date_of_birth:        Option<Input>,
  pub gender:               Option<Input>,
  pub civil_status:         Option<Input>,
  pub phone_number:         String,
  pub email:                String,
  pub purok:                String,
  pub street:               String,
  pub household:            Option<Input>,
  pub relationship_to_head: String,
  pub is_pwd:               bool,
  pub is_senior:            bool,
  pub is_4ps:               bool,
  pub employment_status:    Option<Input>,
  pub occupation:           String,
  pub notes:                String,
}

impl ResidentForm {
  /// Validate the editable fields.
  pub fn validate(self) -> Result<ResidentFields, ValidationErrors> {
    self.check().1
  }

  /// Validate for creation, including an optional caller-supplied
  /// identifier.
  pub fn into_new(self, created_by: Option<i64>) -> Result<NewResident, ValidationErrors> {
    let (resident_id, fields) = self.check();
    let fields = fields?;
    Ok(NewResident { resident_id, fields, created_by })
  }

  fn check(self) -> (Option<String>, Result<ResidentFields, ValidationErrors>) {
    let mut c = Checker::new();

    let resident_id = c.identifier("resident_id", EntityKind::Resident, self.resident_id);

    let first_name  = c.required_text("first_name", self.first_name, 100);
    let middle_name = c.text("middle_name", self.middle_name, 100);
    let last_name   = c.required_text("last_name", self.last_name, 100);
    let suffix      = c.text("suffix", self.suffix, 10);
    let date_of_birth = c.required_date("date_of_birth", self.date_of_birth);
    let gender: Option<Gender> = c.required_choice("gender", self.gender);
    let civil_status: Option<CivilStatus> = c.required_choice("civil_status", self.civil_status);

    let phone_number = c.text("phone_number", self.phone_number, 17);
    if !phone_number.is_empty() && !PHONE_RE.is_match(&phone_number) {
      c.errors.add("phone_number", "Phone number must be 9-15 digits. Can start with +");
    }

    let email = c.text("email", self.email, 254);
    if !email.is_empty() && !EMAIL_RE.is_match(&email) {
      c.errors.add("email", "Enter a valid email address.");
    }

    let purok  = c.required_text("purok", self.purok, 50);
    let street = c.required_text("street", self.street, 200);
    let household = c.reference("household", self.household);
    let relationship_to_head = c.text("relationship_to_head", self.relationship_to_head, 50);
    let employment_status: Option<EmploymentStatus> =
      c.choice("employment_status", self.employment_status);
    let occupation = c.text("occupation", self.occupation, 100);
    let notes = self.notes.trim().to_owned();

    let fields = match (date_of_birth, gender, civil_status) {
      (Some(date_of_birth), Some(gender), Some(civil_status)) if c.errors.is_empty() => {
        Ok(ResidentFields {
          first_name,
          middle_name,
          last_name,
          suffix,
          date_of_birth,
          gender,
          civil_status,
          phone_number,
          email,
          purok,
          street,
          household,
          relationship_to_head,
          is_pwd: self.is_pwd,
          is_senior: self.is_senior,
          is_4ps: self.is_4ps,
          employment_status,
          occupation,
          notes,
        })
      }
      _ => Err(c.errors),
    };

    (resident_id, fields)
  }
}

// ─── Household form ──────────────────────────────────────────────────────────

fn default_true() -> bool { true }

#[derive(Debug, Clone, Deserialize)]
pub struct HouseholdForm {
  #[serde(default)]
  pub household_id:      Option<String>,
  #[serde(default)]
  pub household_head:    Option<Input>,
  #[serde(default)]
  pub street:            String,
  #[serde(default)]
  pub purok:             String,
  #[serde(default)]
  pub housing_type:      Option<Input>,
  #[serde(default)]
  pub housing_condition: Option<Input>,
  #[serde(default = "default_true")]
  pub has_electricity:   bool,
  #[serde(default = "default_true")]
  pub has_water:         bool,
  #[serde(default)]
  pub water_source:      Option<Input>,
  #[serde(default)]
  pub monthly_income:    Option<Input>,
  #[serde(default)]
  pub notes:             String,
}

impl Default for HouseholdForm {
  fn default() -> Self {
    Self {
      household_id:      None,
      household_head:    None,
      street:            String::new(),
      purok:             String::new(),
      housing_type:      None,
      housing_condition: None,
      has_electricity:   true,
      has_water:         true,
      water_source:      None,
      monthly_income:    None,
      notes:             String::new(),
    }
  }
}

/// Income is stored with at most 10 digits, 2 of them after the point.
const INCOME_MAX_DIGITS: usize = 10;
const INCOME_DECIMAL_PLACES: u32 = 2;

fn check_income(c: &mut Checker, income: Option<Input>) -> Option<Decimal> {
  let value = c.decimal("monthly_income", income)?.normalize();
  if value.scale() > INCOME_DECIMAL_PLACES {
    c.errors.add(
      "monthly_income",
      format!("Ensure that there are no more than {INCOME_DECIMAL_PLACES} decimal places."),
    );
  }
  let whole = value.trunc().abs().to_string();
  let whole_digits = whole.trim_start_matches('0').len();
  let max_whole = INCOME_MAX_DIGITS - INCOME_DECIMAL_PLACES as usize;
  if whole_digits > max_whole {
    c.errors.add(
      "monthly_income",
      format!("Ensure that there are no more than {max_whole} digits before the decimal point."),
    );
  }
  Some(value)
}

impl HouseholdForm {
  pub fn validate(self) -> Result<HouseholdFields, ValidationErrors> {
    self.check().1
  }

  pub fn into_new(self, created_by: Option<i64>) -> Result<NewHousehold, ValidationErrors> {
    let (household_id, fields) = self.check();
    let fields = fields?;
    Ok(NewHousehold { household_id, fields, created_by })
  }

  fn check(self) -> (Option<String>, Result<HouseholdFields, ValidationErrors>) {
    let mut c = Checker::new();

    let household_id = c.identifier("household_id", EntityKind::Household, self.household_id);
    let street = c.required_text("street", self.street, 200);
    let purok = c.required_text("purok", self.purok, 50);
    let household_head = c.reference("household_head", self.household_head);
    let housing_type: Option<HousingType> = c.required_choice("housing_type", self.housing_type);
    let housing_condition: Option<HousingCondition> =
      c.required_choice("housing_condition", self.housing_condition);
    let water_source: Option<WaterSource> = c.choice("water_source", self.water_source);
    let monthly_income = check_income(&mut c, self.monthly_income);

    let fields = match (housing_type, housing_condition) {
      (Some(housing_type), Some(housing_condition)) if c.errors.is_empty() => {
        Ok(HouseholdFields {
          household_head,
          street,
          purok,
          housing_type,
          housing_condition,
          has_electricity: self.has_electricity,
          has_water: self.has_water,
          water_source,
          monthly_income,
          notes: self.notes.trim().to_owned(),
        })
      }
      _ => Err(c.errors),
    };

    (household_id, fields)
  }
}

// ─── Household member form ───────────────────────────────────────────────────

/// Adds an existing resident to a household.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MemberForm {
  pub resident:             Option<Input>,
  pub relationship_to_head: String,
}

/// A validated [`MemberForm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberAssignment {
  pub resident:             i64,
  pub relationship_to_head: String,
}

impl MemberForm {
  pub fn validate(self) -> Result<MemberAssignment, ValidationErrors> {
    let mut c = Checker::new();
    let resident = c.reference("resident", self.resident);
    let resident = c.present("resident", resident);
    let relationship_to_head =
      c.text("relationship_to_head", self.relationship_to_head, 50);
    match resident {
      Some(resident) if c.errors.is_empty() => {
        Ok(MemberAssignment { resident, relationship_to_head })
      }
      _ => Err(c.errors),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn resident_form() -> ResidentForm {
    ResidentForm {
      first_name: "  Juan ".into(),
      last_name: "Dela Cruz".into(),
      date_of_birth: Some("1990-01-02".into()),
      gender: Some("M".into()),
      civil_status: Some("single".into()),
      purok: "1".into(),
      street: "Rizal Street".into(),
      ..ResidentForm::default()
    }
  }

  fn household_form() -> HouseholdForm {
    HouseholdForm {
      street: "Mabini Street".into(),
      purok: "3".into(),
      housing_type: Some("owned".into()),
      housing_condition: Some("good".into()),
      ..HouseholdForm::default()
    }
  }

  #[test]
  fn valid_resident_is_trimmed() {
    let fields = resident_form().validate().unwrap();
    assert_eq!(fields.first_name, "Juan");
    assert_eq!(fields.date_of_birth, NaiveDate::from_ymd_opt(1990, 1, 2).unwrap());
    assert_eq!(fields.gender, Gender::Male);
    assert_eq!(fields.civil_status, CivilStatus::Single);
    assert_eq!(fields.household, None);
  }

  #[test]
  fn unknown_choices_are_field_errors() {
    let form: ResidentForm = serde_json::from_str(
      r#"{"first_name":"Juan","last_name":"Cruz","date_of_birth":"1990-13-40",
          "gender":"X","civil_status":"engaged","employment_status":"astronaut",
          "household":"abc","purok":"1","street":"Rizal"}"#,
    )
    .unwrap();
    let errors = form.validate().unwrap_err();
    assert_eq!(errors.messages("gender"), [INVALID_CHOICE]);
    assert_eq!(errors.messages("civil_status"), [INVALID_CHOICE]);
    assert_eq!(errors.messages("employment_status"), [INVALID_CHOICE]);
    assert_eq!(errors.messages("date_of_birth"), [INVALID_DATE]);
    assert_eq!(errors.messages("household"), [INVALID_REFERENCE]);
  }

  #[test]
  fn references_accept_numbers_and_numeric_text() {
    let mut form = resident_form();
    form.household = Some(3.into());
    form.employment_status = Some("self_employed".into());
    let fields = form.validate().unwrap();
    assert_eq!(fields.household, Some(3));
    assert_eq!(fields.employment_status, Some(EmploymentStatus::SelfEmployed));

    let mut form = resident_form();
    form.household = Some("7".into());
    assert_eq!(form.validate().unwrap().household, Some(7));
  }

  #[test]
  fn blank_choice_is_required_not_invalid() {
    let mut form = resident_form();
    form.gender = Some("  ".into());
    form.employment_status = Some("".into());
    let errors = form.validate().unwrap_err();
    assert_eq!(errors.messages("gender"), [REQUIRED]);
    assert!(!errors.contains("employment_status"));
  }

  #[test]
  fn missing_required_fields_are_reported_per_field() {
    let errors = ResidentForm::default().validate().unwrap_err();
    for field in [
      "first_name",
      "last_name",
      "date_of_birth",
      "gender",
      "civil_status",
      "purok",
      "street",
    ] {
      assert_eq!(errors.messages(field), [REQUIRED], "{field}");
    }
    assert!(!errors.contains("middle_name"));
  }

  #[test]
  fn phone_number_pattern() {
    for ok in ["09171234567", "+639171234567", "123456789"] {
      let mut form = resident_form();
      form.phone_number = ok.into();
      assert!(form.validate().is_ok(), "{ok}");
    }
    for bad in ["12345678", "0917-123-4567", "+12345678901234567", "abcdefghij"] {
      let mut form = resident_form();
      form.phone_number = bad.into();
      let errors = form.validate().unwrap_err();
      assert!(errors.contains("phone_number"), "{bad}");
    }
  }

  #[test]
  fn email_must_look_like_an_address() {
    let mut form = resident_form();
    form.email = "juan@example.com".into();
    assert!(form.validate().is_ok());

    let mut form = resident_form();
    form.email = "juan-at-example".into();
    assert!(form.validate().unwrap_err().contains("email"));
  }

  #[test]
  fn overlong_text_is_rejected() {
    let mut form = resident_form();
    form.suffix = "a".repeat(11);
    let errors = form.validate().unwrap_err();
    assert_eq!(errors.messages("suffix").len(), 1);
  }

  #[test]
  fn blank_resident_id_means_generate() {
    let mut form = resident_form();
    form.resident_id = Some("   ".into());
    let new = form.into_new(Some(7)).unwrap();
    assert_eq!(new.resident_id, None);
    assert_eq!(new.created_by, Some(7));
  }

  #[test]
  fn malformed_resident_id_is_a_validation_error() {
    let mut form = resident_form();
    form.resident_id = Some("CUSTOM-1".into());
    let errors = form.into_new(None).unwrap_err();
    assert!(errors.contains("resident_id"));
  }

  #[test]
  fn household_identifier_is_length_checked() {
    let mut form = household_form();
    form.household_id = Some("HH-99999999999999999999".into());
    let errors = form.into_new(None).unwrap_err();
    assert_eq!(errors.messages("household_id").len(), 1);
    assert!(errors.messages("household_id")[0].starts_with("Ensure this value has at most 20"));

    let mut form = household_form();
    form.household_id = Some("HH-18446744073709551615".into());
    assert!(form.into_new(None).unwrap_err().contains("household_id"));

    let mut form = household_form();
    form.household_id = Some("HH-9999999999999999".into());
    let new = form.into_new(None).unwrap();
    assert_eq!(new.household_id.as_deref(), Some("HH-9999999999999999"));
  }

  #[test]
  fn household_choices_and_income_are_parsed() {
    let form: HouseholdForm = serde_json::from_str(
      r#"{"street":"Luna","purok":"2","housing_type":"castle","housing_condition":"good",
          "water_source":"river","monthly_income":"lots","household_head":"x"}"#,
    )
    .unwrap();
    let errors = form.validate().unwrap_err();
    assert_eq!(errors.messages("housing_type"), [INVALID_CHOICE]);
    assert_eq!(errors.messages("water_source"), [INVALID_CHOICE]);
    assert_eq!(errors.messages("monthly_income"), [INVALID_NUMBER]);
    assert_eq!(errors.messages("household_head"), [INVALID_REFERENCE]);
    assert!(!errors.contains("housing_condition"));

    let form: HouseholdForm = serde_json::from_str(
      r#"{"street":"Luna","purok":"2","housing_type":"rented","housing_condition":"fair",
          "water_source":"well","monthly_income":15000.5,"household_head":4}"#,
    )
    .unwrap();
    let fields = form.validate().unwrap();
    assert_eq!(fields.water_source, Some(WaterSource::Well));
    assert_eq!(fields.monthly_income, Some(Decimal::new(150005, 1)));
    assert_eq!(fields.household_head, Some(4));
  }

  #[test]
  fn household_defaults_utilities_on() {
    let form: HouseholdForm = serde_json::from_str(
      r#"{"street":"Luna","purok":"2","housing_type":"rent_free","housing_condition":"fair"}"#,
    )
    .unwrap();
    let fields = form.validate().unwrap();
    assert!(fields.has_electricity);
    assert!(fields.has_water);
    assert_eq!(fields.housing_type, HousingType::RentFree);
  }

  #[test]
  fn household_requires_housing_choices() {
    let mut form = household_form();
    form.housing_type = None;
    let errors = form.validate().unwrap_err();
    assert_eq!(errors.messages("housing_type"), [REQUIRED]);
  }

  #[test]
  fn member_form_requires_resident() {
    let errors = MemberForm::default().validate().unwrap_err();
    assert_eq!(errors.messages("resident"), [REQUIRED]);

    let ok = MemberForm { resident: Some(4.into()), relationship_to_head: " Spouse ".into() }
      .validate()
      .unwrap();
    assert_eq!(ok, MemberAssignment { resident: 4, relationship_to_head: "Spouse".into() });
  }

  #[test]
  fn income_precision() {
    let mut form = household_form();
    form.monthly_income = Some("12345678.90".into());
    assert!(form.validate().is_ok());

    let mut form = household_form();
    form.monthly_income = Some("15000.505".into());
    assert!(form.validate().unwrap_err().contains("monthly_income"));

    let mut form = household_form();
    form.monthly_income = Some("123456789".into());
    assert!(form.validate().unwrap_err().contains("monthly_income"));
  }
}
