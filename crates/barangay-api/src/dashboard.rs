//! `GET /dashboard`: registry totals for the signed-in staff member.

use std::sync::Arc;

use axum::{Extension, Json, extract::State};
use barangay_core::{
  staff::Staff,
  store::{RegistryStore, SessionStore},
};
use serde::Serialize;

use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct Dashboard {
  pub staff:            Staff,
  pub total_residents:  u64,
  pub total_households: u64,
  pub active_staff:     u64,
}

pub async fn handler<S>(
  State(store): State<Arc<S>>,
  Extension(staff): Extension<Staff>,
) -> Result<Json<Dashboard>, ApiError>
where
  S: RegistryStore + SessionStore,
{
  let counts = store.counts().await.map_err(ApiError::store)?;
  let active_staff = store.active_staff_count().await.map_err(ApiError::store)?;

  Ok(Json(Dashboard {
    staff,
    total_residents: counts.residents,
    total_households: counts.households,
    active_staff,
  }))
}
