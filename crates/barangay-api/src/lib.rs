//! JSON API for the barangay registry.
//!
//! Exposes an axum [`Router`] backed by any store implementing
//! [`RegistryStore`] and [`SessionStore`]. Authentication is the caller's
//! responsibility: every handler expects the signed-in
//! [`barangay_core::staff::Staff`] in the request extensions.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let api = barangay_api::api_router(store.clone())
//!   .layer(middleware::from_fn_with_state(state, auth::require_session));
//! ```

pub mod dashboard;
pub mod error;
pub mod households;
pub mod residents;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use barangay_core::store::{RegistryStore, SessionStore};

pub use error::ApiError;

/// Build the registry router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RegistryStore + SessionStore + 'static,
{
  Router::new()
    .route("/dashboard", get(dashboard::handler::<S>))
    // Residents
    .route("/residents", get(residents::list::<S>))
    .route("/residents/puroks", get(residents::puroks::<S>))
    .route(
      "/residents/create",
      get(residents::new_form::<S>).post(residents::create::<S>),
    )
    .route("/residents/{id}", get(residents::detail::<S>))
    .route(
      "/residents/{id}/edit",
      get(residents::edit_form::<S>).post(residents::update::<S>),
    )
    .route("/residents/{id}/delete", post(residents::delete::<S>))
    // Households
    .route("/households", get(households::list::<S>))
    .route("/households/puroks", get(households::puroks::<S>))
    .route(
      "/households/create",
      get(households::new_form::<S>).post(households::create::<S>),
    )
    .route("/households/{id}", get(households::detail::<S>))
    .route(
      "/households/{id}/edit",
      get(households::edit_form::<S>).post(households::update::<S>),
    )
    .route("/households/{id}/delete", post(households::delete::<S>))
    .route("/households/{id}/members", post(households::add_member::<S>))
    .with_state(store)
}
