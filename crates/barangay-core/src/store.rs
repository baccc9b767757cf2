//! The `RegistryStore` and `SessionStore` traits.
//!
//! Implemented by storage backends (e.g. `barangay-store-sqlite`). The HTTP
//! layers depend on these abstractions, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::{
  household::{HouseholdFields, HouseholdView, NewHousehold},
  ident::EntityKind,
  query::{HouseholdQuery, Page, ResidentQuery, Scope},
  resident::{NewResident, Resident, ResidentFields},
  staff::{NewStaff, Staff, StaffCredentials},
};

/// Active-record totals shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct RegistryCounts {
  pub residents:  u64,
  pub households: u64,
}

// ─── Registry ────────────────────────────────────────────────────────────────

/// Abstraction over the resident and household registry.
///
/// Records are never physically removed: "delete" is [`deactivate_resident`]
/// / [`deactivate_household`], and every read goes through a [`Scope`] that
/// defaults to active rows only.
///
/// Implementations must assign generated identifiers atomically with the
/// insert, so concurrent creations never receive the same identifier.
///
/// [`deactivate_resident`]: RegistryStore::deactivate_resident
/// [`deactivate_household`]: RegistryStore::deactivate_household
pub trait RegistryStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  // ── Identifiers ───────────────────────────────────────────────────────

  /// Preview the identifier the next created record of `kind` would get.
  /// Reserves nothing.
  fn next_id(
    &self,
    kind: EntityKind,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + '_;

  // ── Residents ─────────────────────────────────────────────────────────

  /// Persist a new resident, assigning `resident_id` when none was given.
  fn create_resident(
    &self,
    input: NewResident,
  ) -> impl Future<Output = Result<Resident, Self::Error>> + Send + '_;

  fn get_resident(
    &self,
    id: i64,
    scope: Scope,
  ) -> impl Future<Output = Result<Option<Resident>, Self::Error>> + Send + '_;

  /// Overwrite the editable fields of an active resident. `resident_id`
  /// is left untouched.
  fn update_resident(
    &self,
    id: i64,
    fields: ResidentFields,
  ) -> impl Future<Output = Result<Resident, Self::Error>> + Send + '_;

  /// Mark an active resident inactive. Nothing else changes.
  fn deactivate_resident(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn list_residents<'a>(
    &'a self,
    query: &'a ResidentQuery,
  ) -> impl Future<Output = Result<Page<Resident>, Self::Error>> + Send + 'a;

  /// Distinct puroks of active residents, sorted.
  fn resident_puroks(
    &self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  // ── Relationships ─────────────────────────────────────────────────────

  /// Point an active resident at `household` (or clear it) and record the
  /// relationship to the head. Only the foreign key is checked.
  fn assign_household(
    &self,
    resident: i64,
    household: Option<i64>,
    relationship_to_head: String,
  ) -> impl Future<Output = Result<Resident, Self::Error>> + Send + '_;

  /// Set or clear the head of an active household. A resident may head at
  /// most one household.
  fn set_household_head(
    &self,
    household: i64,
    head: Option<i64>,
  ) -> impl Future<Output = Result<HouseholdView, Self::Error>> + Send + '_;

  /// Active residents of `household`, by last then first name.
  fn household_members(
    &self,
    household: i64,
  ) -> impl Future<Output = Result<Vec<Resident>, Self::Error>> + Send + '_;

  /// Number of active residents linked to `household`.
  fn member_count(
    &self,
    household: i64,
  ) -> impl Future<Output = Result<u32, Self::Error>> + Send + '_;

  /// Active residents not linked to any household, by last then first name.
  fn unassigned_residents(
    &self,
  ) -> impl Future<Output = Result<Vec<Resident>, Self::Error>> + Send + '_;

  // ── Households ────────────────────────────────────────────────────────

  fn create_household(
    &self,
    input: NewHousehold,
  ) -> impl Future<Output = Result<HouseholdView, Self::Error>> + Send + '_;

  fn get_household(
    &self,
    id: i64,
    scope: Scope,
  ) -> impl Future<Output = Result<Option<HouseholdView>, Self::Error>> + Send + '_;

  fn update_household(
    &self,
    id: i64,
    fields: HouseholdFields,
  ) -> impl Future<Output = Result<HouseholdView, Self::Error>> + Send + '_;

  /// Mark an active household inactive. Members keep their link.
  fn deactivate_household(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn list_households<'a>(
    &'a self,
    query: &'a HouseholdQuery,
  ) -> impl Future<Output = Result<Page<HouseholdView>, Self::Error>> + Send + 'a;

  fn household_puroks(
    &self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  // ── Totals ────────────────────────────────────────────────────────────

  fn counts(
    &self,
  ) -> impl Future<Output = Result<RegistryCounts, Self::Error>> + Send + '_;
}

// ─── Sessions ────────────────────────────────────────────────────────────────

/// Staff accounts and login sessions.
///
/// Session tokens are never stored; callers pass a digest of the token.
pub trait SessionStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  /// Create the staff member, or update name, role and password hash if the
  /// username exists. The account is (re)activated.
  fn upsert_staff(
    &self,
    input: NewStaff,
  ) -> impl Future<Output = Result<Staff, Self::Error>> + Send + '_;

  /// Look up an active staff member with their password hash.
  fn staff_credentials<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<StaffCredentials>, Self::Error>> + Send + 'a;

  fn active_staff_count(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  fn create_session(
    &self,
    token_hash: String,
    staff_id: i64,
    expires_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// The active staff member owning an unexpired session, if any.
  fn resolve_session(
    &self,
    token_hash: String,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<Option<Staff>, Self::Error>> + Send + '_;

  fn delete_session(
    &self,
    token_hash: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
