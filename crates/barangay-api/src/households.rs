//! Handlers for `/households` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/households` | `?search=&purok=&page=` |
//! | `GET`  | `/households/puroks` | |
//! | `GET`  | `/households/create` | Identifier the next household would get |
//! | `POST` | `/households/create` | Body: household form |
//! | `GET`  | `/households/{id}` | Members and residents available to add |
//! | `GET`  | `/households/{id}/edit` | |
//! | `POST` | `/households/{id}/edit` | |
//! | `POST` | `/households/{id}/delete` | Soft delete; members keep their link |
//! | `POST` | `/households/{id}/members` | Body: `{"resident":1,"relationship_to_head":"Son"}` |

use std::sync::Arc;

use axum::{
  Extension, Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use barangay_core::{
  form::{HouseholdForm, MemberForm},
  household::HouseholdView,
  ident::EntityKind,
  query::{HouseholdQuery, Page, Scope, non_blank},
  staff::Staff,
  store::RegistryStore,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
  error::ApiError,
  residents::{ResidentView, page_param},
};

// ─── Views ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct HouseholdSummary {
  #[serde(flatten)]
  pub household:    HouseholdView,
  pub label:        String,
  pub full_address: String,
}

impl From<HouseholdView> for HouseholdSummary {
  fn from(household: HouseholdView) -> Self {
    Self {
      label: household.label(),
      full_address: household.household.full_address(),
      household,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct HouseholdDetail {
  #[serde(flatten)]
  pub household:           HouseholdSummary,
  pub members:             Vec<ResidentView>,
  /// Active residents not yet in any household.
  pub available_residents: Vec<ResidentView>,
}

async fn active_household<S: RegistryStore>(
  store: &S,
  id: i64,
) -> Result<HouseholdView, ApiError> {
  store
    .get_household(id, Scope::Active)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| barangay_core::Error::not_found(EntityKind::Household, id).into())
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListParams {
  pub search: Option<String>,
  pub purok:  Option<String>,
  pub page:   Option<String>,
}

/// `GET /households`
pub async fn list<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Page<HouseholdSummary>>, ApiError> {
  let query = HouseholdQuery {
    search: non_blank(params.search),
    purok: non_blank(params.purok),
    page: page_param(params.page),
    ..Default::default()
  };

  let page = store.list_households(&query).await.map_err(ApiError::store)?;
  Ok(Json(page.map(HouseholdSummary::from)))
}

/// `GET /households/puroks`
pub async fn puroks<S: RegistryStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<String>>, ApiError> {
  Ok(Json(store.household_puroks().await.map_err(ApiError::store)?))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `GET /households/create`
pub async fn new_form<S: RegistryStore>(
  State(store): State<Arc<S>>,
) -> Result<impl IntoResponse, ApiError> {
  let next_id = store
    .next_id(EntityKind::Household)
    .await
    .map_err(ApiError::store)?;
  let residents = store.unassigned_residents().await.map_err(ApiError::store)?;
  Ok(Json(json!({
    "next_id": next_id,
    "available_residents": residents.into_iter().map(ResidentView::from).collect::<Vec<_>>(),
  })))
}

/// `POST /households/create`
pub async fn create<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Extension(staff): Extension<Staff>,
  Json(form): Json<HouseholdForm>,
) -> Result<impl IntoResponse, ApiError> {
  let input = form.into_new(Some(staff.id))?;
  let household = store.create_household(input).await.map_err(ApiError::store)?;

  tracing::info!(
    household_id = %household.household.household_id,
    staff = %staff.username,
    "household created"
  );

  let message = format!(
    "Household {} created successfully!",
    household.household.household_id
  );
  Ok((
    StatusCode::CREATED,
    Json(json!({ "message": message, "household": HouseholdSummary::from(household) })),
  ))
}

// ─── Detail ──────────────────────────────────────────────────────────────────

/// `GET /households/{id}`
pub async fn detail<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<HouseholdDetail>, ApiError> {
  let household = active_household(store.as_ref(), id).await?;
  let members = store.household_members(id).await.map_err(ApiError::store)?;
  let available = store.unassigned_residents().await.map_err(ApiError::store)?;

  Ok(Json(HouseholdDetail {
    household:           household.into(),
    members:             members.into_iter().map(ResidentView::from).collect(),
    available_residents: available.into_iter().map(ResidentView::from).collect(),
  }))
}

// ─── Edit ────────────────────────────────────────────────────────────────────

/// `GET /households/{id}/edit`
pub async fn edit_form<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<HouseholdSummary>, ApiError> {
  Ok(Json(active_household(store.as_ref(), id).await?.into()))
}

/// `POST /households/{id}/edit`; a `household_id` in the body is ignored.
pub async fn update<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Extension(staff): Extension<Staff>,
  Path(id): Path<i64>,
  Json(form): Json<HouseholdForm>,
) -> Result<impl IntoResponse, ApiError> {
  let fields = form.validate()?;
  let household = store.update_household(id, fields).await.map_err(ApiError::store)?;

  tracing::info!(
    household_id = %household.household.household_id,
    staff = %staff.username,
    "household updated"
  );

  let message = format!(
    "Household {} updated successfully!",
    household.household.household_id
  );
  Ok(Json(json!({ "message": message, "household": HouseholdSummary::from(household) })))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `POST /households/{id}/delete`
pub async fn delete<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Extension(staff): Extension<Staff>,
  Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
  let household = active_household(store.as_ref(), id).await?;
  store.deactivate_household(id).await.map_err(ApiError::store)?;

  tracing::info!(
    household_id = %household.household.household_id,
    staff = %staff.username,
    "household deactivated"
  );

  let message = format!(
    "Household {} has been deactivated.",
    household.household.household_id
  );
  Ok(Json(json!({ "message": message })))
}

// ─── Members ─────────────────────────────────────────────────────────────────

/// `POST /households/{id}/members`
pub async fn add_member<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Extension(staff): Extension<Staff>,
  Path(id): Path<i64>,
  Json(form): Json<MemberForm>,
) -> Result<impl IntoResponse, ApiError> {
  let assignment = form.validate()?;
  let household = active_household(store.as_ref(), id).await?;
  let resident = store
    .assign_household(assignment.resident, Some(id), assignment.relationship_to_head)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(
    household_id = %household.household.household_id,
    resident_id = %resident.resident_id,
    staff = %staff.username,
    "household member added"
  );

  let message = format!(
    "{} added to household {}.",
    resident.full_name(),
    household.household.household_id
  );
  let member_count = store.member_count(id).await.map_err(ApiError::store)?;
  Ok(Json(json!({
    "message": message,
    "resident": ResidentView::from(resident),
    "member_count": member_count,
  })))
}
