//! Handlers for `/residents` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/residents` | `?search=&purok=&gender=&page=` |
//! | `GET`  | `/residents/puroks` | Distinct puroks of active residents |
//! | `GET`  | `/residents/create` | Identifier the next resident would get |
//! | `POST` | `/residents/create` | Body: resident form |
//! | `GET`  | `/residents/{id}` | 404 if missing or deactivated |
//! | `GET`  | `/residents/{id}/edit` | Current values |
//! | `POST` | `/residents/{id}/edit` | Body: resident form |
//! | `POST` | `/residents/{id}/delete` | Soft delete |

use std::sync::Arc;

use axum::{
  Extension, Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use barangay_core::{
  form::ResidentForm,
  ident::EntityKind,
  query::{Page, PageRequest, ResidentQuery, Scope, non_blank},
  resident::{Gender, Resident},
  staff::Staff,
  store::RegistryStore,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ApiError;

// ─── Views ───────────────────────────────────────────────────────────────────

/// A resident with its derived display values.
#[derive(Debug, Serialize)]
pub struct ResidentView {
  #[serde(flatten)]
  pub resident:     Resident,
  pub full_name:    String,
  pub full_address: String,
  pub age:          i32,
}

impl From<Resident> for ResidentView {
  fn from(resident: Resident) -> Self {
    Self {
      full_name: resident.full_name(),
      full_address: resident.full_address(),
      age: resident.age(),
      resident,
    }
  }
}

/// The household a resident belongs to, as shown on the resident's page.
#[derive(Debug, Serialize)]
pub struct HouseholdLink {
  pub id:           i64,
  pub household_id: String,
  pub label:        String,
  pub is_active:    bool,
}

#[derive(Debug, Serialize)]
pub struct ResidentDetail {
  #[serde(flatten)]
  pub resident:          ResidentView,
  pub household_summary: Option<HouseholdLink>,
}

/// Parse a lenient `?page=`; anything unparseable means the first page.
pub(crate) fn page_param(page: Option<String>) -> PageRequest {
  non_blank(page)
    .and_then(|p| p.parse().ok())
    .map(PageRequest)
    .unwrap_or_default()
}

async fn active_resident<S: RegistryStore>(store: &S, id: i64) -> Result<Resident, ApiError> {
  store
    .get_resident(id, Scope::Active)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| barangay_core::Error::not_found(EntityKind::Resident, id).into())
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListParams {
  pub search: Option<String>,
  pub purok:  Option<String>,
  pub gender: Option<String>,
  pub page:   Option<String>,
}

/// `GET /residents`
pub async fn list<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Page<ResidentView>>, ApiError> {
  let gender = non_blank(params.gender)
    .map(|g| {
      g.parse::<Gender>()
        .map_err(|_| ApiError::BadRequest(format!("unknown gender {g:?}")))
    })
    .transpose()?;

  let query = ResidentQuery {
    search: non_blank(params.search),
    purok: non_blank(params.purok),
    gender,
    page: page_param(params.page),
    ..Default::default()
  };

  let page = store.list_residents(&query).await.map_err(ApiError::store)?;
  Ok(Json(page.map(ResidentView::from)))
}

/// `GET /residents/puroks`
pub async fn puroks<S: RegistryStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<String>>, ApiError> {
  Ok(Json(store.resident_puroks().await.map_err(ApiError::store)?))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `GET /residents/create`
pub async fn new_form<S: RegistryStore>(
  State(store): State<Arc<S>>,
) -> Result<impl IntoResponse, ApiError> {
  let next_id = store
    .next_id(EntityKind::Resident)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(json!({ "next_id": next_id })))
}

/// `POST /residents/create`
pub async fn create<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Extension(staff): Extension<Staff>,
  Json(form): Json<ResidentForm>,
) -> Result<impl IntoResponse, ApiError> {
  let input = form.into_new(Some(staff.id))?;
  let resident = store.create_resident(input).await.map_err(ApiError::store)?;

  tracing::info!(
    resident_id = %resident.resident_id,
    staff = %staff.username,
    "resident created"
  );

  let message = format!("Resident {} added successfully!", resident.full_name());
  Ok((
    StatusCode::CREATED,
    Json(json!({ "message": message, "resident": ResidentView::from(resident) })),
  ))
}

// ─── Detail ──────────────────────────────────────────────────────────────────

/// `GET /residents/{id}`
pub async fn detail<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<ResidentDetail>, ApiError> {
  let resident = active_resident(store.as_ref(), id).await?;

  let household_summary = match resident.fields.household {
    Some(hid) => store
      .get_household(hid, Scope::All)
      .await
      .map_err(ApiError::store)?
      .map(|h| HouseholdLink {
        id:           h.household.id,
        household_id: h.household.household_id.clone(),
        label:        h.label(),
        is_active:    h.household.is_active,
      }),
    None => None,
  };

  Ok(Json(ResidentDetail { resident: resident.into(), household_summary }))
}

// ─── Edit ────────────────────────────────────────────────────────────────────

/// `GET /residents/{id}/edit`
pub async fn edit_form<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<ResidentView>, ApiError> {
  Ok(Json(active_resident(store.as_ref(), id).await?.into()))
}

/// `POST /residents/{id}/edit`; a `resident_id` in the body is ignored.
pub async fn update<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Extension(staff): Extension<Staff>,
  Path(id): Path<i64>,
  Json(form): Json<ResidentForm>,
) -> Result<impl IntoResponse, ApiError> {
  let fields = form.validate()?;
  let resident = store.update_resident(id, fields).await.map_err(ApiError::store)?;

  tracing::info!(
    resident_id = %resident.resident_id,
    staff = %staff.username,
    "resident updated"
  );

  let message = format!("Resident {} updated successfully!", resident.full_name());
  Ok(Json(json!({ "message": message, "resident": ResidentView::from(resident) })))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `POST /residents/{id}/delete`
pub async fn delete<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Extension(staff): Extension<Staff>,
  Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
  let resident = active_resident(store.as_ref(), id).await?;
  store.deactivate_resident(id).await.map_err(ApiError::store)?;

  tracing::info!(
    resident_id = %resident.resident_id,
    staff = %staff.username,
    "resident deactivated"
  );

  let message = format!("Resident {} has been deactivated.", resident.full_name());
  Ok(Json(json!({ "message": message })))
}
