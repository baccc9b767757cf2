//! HTTP server for the barangay registry.
//!
//! Puts staff sessions in front of the [`barangay_api`] router and exposes
//! the login and logout endpoints.

pub mod auth;
pub mod error;

pub use error::{ConfigError, Error};

use std::{path::PathBuf, sync::Arc};

use argon2::PasswordHash;
use axum::{
  Router, middleware,
  routing::{get, post},
};
use barangay_core::store::{RegistryStore, SessionStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

fn default_session_ttl_hours() -> i64 { 12 }

/// Longest accepted session lifetime, one year.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 366;

/// Runtime server configuration, deserialised from `config.toml` and
/// `BARANGAY_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  pub store_path:          PathBuf,
  #[serde(default = "default_session_ttl_hours")]
  pub session_ttl_hours:   i64,
  /// Add `Secure` to the session cookie; enable behind HTTPS.
  #[serde(default)]
  pub cookie_secure:       bool,
  /// Staff account created or refreshed at startup.
  pub admin_username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub admin_password_hash: String,
  #[serde(default)]
  pub admin_full_name:     Option<String>,
}

impl ServerConfig {
  /// Reject settings the server cannot run with.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if !(1..=MAX_SESSION_TTL_HOURS).contains(&self.session_ttl_hours) {
      return Err(ConfigError::SessionTtl {
        got: self.session_ttl_hours,
        max: MAX_SESSION_TTL_HOURS,
      });
    }
    PasswordHash::new(&self.admin_password_hash)
      .map_err(|e| ConfigError::AdminPasswordHash(e.to_string()))?;
    Ok(())
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through the login, logout and session guard.
pub struct AppState<S> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), config: Arc::clone(&self.config) }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
///
/// Everything except `/login` and `/logout` requires a session.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: RegistryStore + SessionStore + 'static,
{
  let api = barangay_api::api_router(state.store.clone()).layer(
    middleware::from_fn_with_state(state.clone(), auth::require_session::<S>),
  );

  Router::new()
    .route("/login", post(auth::login::<S>))
    .route("/logout", get(auth::logout::<S>).post(auth::logout::<S>))
    .with_state(state)
    .merge(api)
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use barangay_core::staff::{NewStaff, Role};
  use barangay_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn make_state(password: &str) -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let hash = auth::hash_password(password).unwrap();
    store
      .upsert_staff(NewStaff {
        username:      "admin".to_string(),
        full_name:     "Barangay Secretary".to_string(),
        role:          Role::Admin,
        password_hash: hash.clone(),
      })
      .await
      .unwrap();

    AppState {
      store:  Arc::new(store),
      config: Arc::new(ServerConfig {
        host:                "127.0.0.1".to_string(),
        port:                8000,
        store_path:          PathBuf::from(":memory:"),
        session_ttl_hours:   12,
        cookie_secure:       false,
        admin_username:      "admin".to_string(),
        admin_password_hash: hash,
        admin_full_name:     None,
      }),
    }
  }

  async fn send(
    state: &AppState<SqliteStore>,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
  ) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(c) = cookie {
      builder = builder.header(header::COOKIE, c);
    }
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    router(state.clone())
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap()
  }

  async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  /// Log in and return the `name=value` pair to send back as a cookie.
  async fn login(state: &AppState<SqliteStore>) -> String {
    let resp = send(
      state,
      "POST",
      "/login",
      None,
      Some(json!({ "username": "admin", "password": "secret" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let set_cookie = resp
      .headers()
      .get(header::SET_COOKIE)
      .unwrap()
      .to_str()
      .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
  }

  fn resident(first: &str, last: &str) -> Value {
    json!({
      "first_name": first,
      "last_name": last,
      "date_of_birth": "1990-05-17",
      "gender": "M",
      "civil_status": "single",
      "purok": "1",
      "street": "Rizal St",
    })
  }

  fn household(head: Option<i64>) -> Value {
    json!({
      "household_head": head,
      "street": "Mabini St",
      "purok": "3",
      "housing_type": "owned",
      "housing_condition": "good",
    })
  }

  // ── Sessions ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn login_sets_http_only_cookie() {
    let state = make_state("secret").await;
    let resp = send(
      &state,
      "POST",
      "/login",
      None,
      Some(json!({ "username": "admin", "password": "secret" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.starts_with("barangay_session="));
    assert!(cookie.contains("HttpOnly"));
    let body = json_body(resp).await;
    assert_eq!(body["staff"]["username"], "admin");
    assert_eq!(body["message"], "Welcome, Barangay Secretary!");
  }

  #[tokio::test]
  async fn wrong_password_is_rejected() {
    let state = make_state("secret").await;
    let resp = send(
      &state,
      "POST",
      "/login",
      None,
      Some(json!({ "username": "admin", "password": "wrong" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().get(header::SET_COOKIE).is_none());
  }

  #[tokio::test]
  async fn registry_requires_session() {
    let state = make_state("secret").await;
    for uri in ["/dashboard", "/residents", "/households", "/residents/1"] {
      let resp = send(&state, "GET", uri, None, None).await;
      assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }

    let resp = send(&state, "GET", "/residents", Some("barangay_session=forged"), None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = send(&state, "POST", "/residents/create", None, Some(resident("Juan", "Cruz"))).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(state.store.counts().await.unwrap().residents, 0);
  }

  #[tokio::test]
  async fn logout_ends_session() {
    let state = make_state("secret").await;
    let cookie = login(&state).await;

    let resp = send(&state, "GET", "/dashboard", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(&state, "POST", "/logout", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cleared = resp.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cleared.contains("Max-Age=0"));

    let resp = send(&state, "GET", "/dashboard", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  // ── Residents ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_residents_assigns_sequential_ids() {
    let state = make_state("secret").await;
    let cookie = login(&state).await;

    let resp = send(&state, "GET", "/residents/create", Some(&cookie), None).await;
    assert_eq!(json_body(resp).await["next_id"], "RES-0001");

    let resp = send(
      &state,
      "POST",
      "/residents/create",
      Some(&cookie),
      Some(resident("Juan", "Dela Cruz")),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp).await;
    assert_eq!(body["resident"]["resident_id"], "RES-0001");
    assert_eq!(body["resident"]["full_name"], "Juan Dela Cruz");
    assert_eq!(body["message"], "Resident Juan Dela Cruz added successfully!");
    assert!(body["resident"]["created_by"].is_i64());

    let resp = send(
      &state,
      "POST",
      "/residents/create",
      Some(&cookie),
      Some(resident("Maria", "Santos")),
    )
    .await;
    assert_eq!(json_body(resp).await["resident"]["resident_id"], "RES-0002");

    let resp = send(&state, "GET", "/residents", Some(&cookie), None).await;
    let body = json_body(resp).await;
    assert_eq!(body["total_count"], 2);
    assert_eq!(body["items"][0]["resident_id"], "RES-0002");
  }

  #[tokio::test]
  async fn invalid_resident_reports_fields() {
    let state = make_state("secret").await;
    let cookie = login(&state).await;

    let mut form = resident("", "Dela Cruz");
    form["phone_number"] = json!("12ab");
    let resp = send(&state, "POST", "/residents/create", Some(&cookie), Some(form)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert!(body["fields"]["first_name"].is_array());
    assert!(body["fields"]["phone_number"].is_array());
    assert!(body["fields"].get("last_name").is_none());
  }

  #[tokio::test]
  async fn deleted_resident_disappears() {
    let state = make_state("secret").await;
    let cookie = login(&state).await;
    send(&state, "POST", "/residents/create", Some(&cookie), Some(resident("Juan", "Cruz"))).await;

    let resp = send(&state, "GET", "/residents/1", Some(&cookie), None).await;
    let body = json_body(resp).await;
    assert_eq!(body["full_address"], "Rizal St, Purok 1");
    assert!(body["age"].is_i64());

    let resp = send(&state, "POST", "/residents/1/delete", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["message"], "Resident Juan Cruz has been deactivated.");

    let resp = send(&state, "GET", "/residents/1", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = send(&state, "POST", "/residents/1/delete", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = send(&state, "GET", "/residents?search=cruz", Some(&cookie), None).await;
    assert_eq!(json_body(resp).await["total_count"], 0);

    // The row is kept.
    assert!(
      state
        .store
        .get_resident(1, barangay_core::query::Scope::All)
        .await
        .unwrap()
        .is_some()
    );
  }

  #[tokio::test]
  async fn edit_keeps_identifier() {
    let state = make_state("secret").await;
    let cookie = login(&state).await;
    send(&state, "POST", "/residents/create", Some(&cookie), Some(resident("Juan", "Cruz"))).await;

    let mut form = resident("Juan", "Cruz");
    form["resident_id"] = json!("RES-9999");
    form["occupation"] = json!("Farmer");
    let resp = send(&state, "POST", "/residents/1/edit", Some(&cookie), Some(form)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["resident"]["resident_id"], "RES-0001");
    assert_eq!(body["resident"]["occupation"], "Farmer");
    assert_eq!(body["message"], "Resident Juan Cruz updated successfully!");
  }

  #[tokio::test]
  async fn unknown_gender_filter_is_bad_request() {
    let state = make_state("secret").await;
    let cookie = login(&state).await;
    let resp = send(&state, "GET", "/residents?gender=X", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = send(&state, "GET", "/residents?gender=&purok=&page=", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  // ── Households ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn second_household_with_same_head_conflicts() {
    let state = make_state("secret").await;
    let cookie = login(&state).await;
    send(&state, "POST", "/residents/create", Some(&cookie), Some(resident("Juan", "Cruz"))).await;

    let resp = send(&state, "POST", "/households/create", Some(&cookie), Some(household(Some(1)))).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp).await;
    assert_eq!(body["household"]["household_id"], "HH-0001");
    assert_eq!(body["household"]["label"], "Household HH-0001 - Juan Cruz");

    let resp = send(&state, "POST", "/households/create", Some(&cookie), Some(household(Some(1)))).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body = json_body(resp).await;
    assert!(body["fields"]["household_head"].is_array());
  }

  #[tokio::test]
  async fn members_are_added_and_counted() {
    let state = make_state("secret").await;
    let cookie = login(&state).await;
    for (first, last) in [("Juan", "Cruz"), ("Maria", "Cruz"), ("Pedro", "Reyes")] {
      send(&state, "POST", "/residents/create", Some(&cookie), Some(resident(first, last))).await;
    }
    send(&state, "POST", "/households/create", Some(&cookie), Some(household(Some(1)))).await;

    for id in [1, 2] {
      let resp = send(
        &state,
        "POST",
        "/households/1/members",
        Some(&cookie),
        Some(json!({ "resident": id, "relationship_to_head": "Family" })),
      )
      .await;
      assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = send(&state, "GET", "/households/1", Some(&cookie), None).await;
    let body = json_body(resp).await;
    assert_eq!(body["member_count"], 2);
    assert_eq!(body["members"].as_array().unwrap().len(), 2);
    let available = body["available_residents"].as_array().unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0]["resident_id"], "RES-0003");

    let resp = send(
      &state,
      "POST",
      "/households/1/members",
      Some(&cookie),
      Some(json!({ "relationship_to_head": "Son" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn dashboard_counts_active_records() {
    let state = make_state("secret").await;
    let cookie = login(&state).await;
    send(&state, "POST", "/residents/create", Some(&cookie), Some(resident("Juan", "Cruz"))).await;
    send(&state, "POST", "/residents/create", Some(&cookie), Some(resident("Ana", "Cruz"))).await;
    send(&state, "POST", "/households/create", Some(&cookie), Some(household(None))).await;
    send(&state, "POST", "/residents/2/delete", Some(&cookie), None).await;

    let resp = send(&state, "GET", "/dashboard", Some(&cookie), None).await;
    let body = json_body(resp).await;
    assert_eq!(body["total_residents"], 1);
    assert_eq!(body["total_households"], 1);
    assert_eq!(body["active_staff"], 1);
    assert_eq!(body["staff"]["username"], "admin");
  }

  #[tokio::test]
  async fn unknown_username_is_rejected() {
    let state = make_state("secret").await;
    let resp = send(
      &state,
      "POST",
      "/login",
      None,
      Some(json!({ "username": "nobody", "password": "secret" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(
      json_body(resp).await["error"],
      "Please enter a correct username and password."
    );
  }

  #[tokio::test]
  async fn invalid_choices_are_reported_per_field() {
    let state = make_state("secret").await;
    let cookie = login(&state).await;

    let mut form = resident("Juan", "Cruz");
    form["gender"] = json!("X");
    form["date_of_birth"] = json!("17/05/1990");
    let resp = send(&state, "POST", "/residents/create", Some(&cookie), Some(form)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert_eq!(body["fields"]["gender"], json!(["Select a valid choice."]));
    assert_eq!(body["fields"]["date_of_birth"], json!(["Enter a valid date."]));

    let mut form = household(None);
    form["housing_type"] = json!("castle");
    let resp = send(&state, "POST", "/households/create", Some(&cookie), Some(form)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert!(body["fields"]["housing_type"].is_array());
    assert_eq!(state.store.counts().await.unwrap().residents, 0);
  }

  #[tokio::test]
  async fn oversized_household_id_is_a_field_error() {
    let state = make_state("secret").await;
    let cookie = login(&state).await;

    let mut form = household(None);
    form["household_id"] = json!("HH-18446744073709551615");
    let resp = send(&state, "POST", "/households/create", Some(&cookie), Some(form)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["fields"]["household_id"].is_array());

    let resp = send(&state, "POST", "/households/create", Some(&cookie), Some(household(None))).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(json_body(resp).await["household"]["household_id"], "HH-0001");
  }

  // ── Configuration ───────────────────────────────────────────────────────────

  #[test]
  fn config_defaults() {
    let settings = config::Config::builder()
      .add_source(config::File::from_str(
        r#"
          host = "0.0.0.0"
          port = 8000
          store_path = "~/barangay.db"
          admin_username = "admin"
          admin_password_hash = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA"
        "#,
        config::FileFormat::Toml,
      ))
      .build()
      .unwrap();
    let cfg: ServerConfig = settings.try_deserialize().unwrap();
    assert_eq!(cfg.session_ttl_hours, 12);
    assert!(!cfg.cookie_secure);
    assert_eq!(cfg.admin_full_name, None);
  }

  #[tokio::test]
  async fn config_rejects_bad_session_ttl_and_hash() {
    let state = make_state("secret").await;
    let base = (*state.config).clone();
    assert!(base.validate().is_ok());

    for ttl in [0, -1, MAX_SESSION_TTL_HOURS + 1, i64::MAX] {
      let cfg = ServerConfig { session_ttl_hours: ttl, ..base.clone() };
      assert!(
        matches!(cfg.validate(), Err(ConfigError::SessionTtl { got, .. }) if got == ttl),
        "{ttl}"
      );
    }

    let cfg = ServerConfig { admin_password_hash: "plaintext".into(), ..base };
    assert!(matches!(cfg.validate(), Err(ConfigError::AdminPasswordHash(_))));
  }
}
