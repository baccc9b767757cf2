//! Staff login, logout and the session guard.
//!
//! A session is a random 32-byte token handed to the browser in the
//! `barangay_session` cookie. Only its SHA-256 digest is stored.

use std::sync::LazyLock;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{
  Json,
  extract::{Request, State},
  http::{HeaderMap, HeaderValue, header},
  middleware::Next,
  response::{IntoResponse, Response},
};
use barangay_api::ApiError;
use barangay_core::{
  staff::StaffCredentials,
  store::{RegistryStore, SessionStore},
};
use chrono::{Duration, Utc};
use rand_core::{OsRng, RngCore as _};
use serde::Deserialize;
use serde_json::json;
use sha2::{Digest as _, Sha256};

use crate::{AppState, error::Error};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "barangay_session";

// ─── Tokens and passwords ────────────────────────────────────────────────────

/// A fresh hex-encoded session token.
pub fn generate_token() -> String {
  let mut bytes = [0u8; 32];
  OsRng.fill_bytes(&mut bytes);
  hex::encode(bytes)
}

/// The digest under which a token is stored.
pub fn hash_token(token: &str) -> String { hex::encode(Sha256::digest(token.as_bytes())) }

/// Hash `password` into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, Error> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| Error::PasswordHash(e.to_string()))
}

/// Check `password` against a PHC string. A malformed hash never matches.
pub fn verify_password(password: &str, phc: &str) -> bool {
  PasswordHash::new(phc).is_ok_and(|parsed| {
    Argon2::default()
      .verify_password(password.as_bytes(), &parsed)
      .is_ok()
  })
}

/// Hash verified against when the username is unknown.
static DUMMY_HASH: LazyLock<Option<String>> =
  LazyLock::new(|| hash_password("barangay-unknown-staff").ok());

/// The credentials, if `password` matches them. A missing account still
/// costs one argon2 verification.
fn check_credentials(
  password: &str,
  credentials: Option<StaffCredentials>,
) -> Option<StaffCredentials> {
  match credentials {
    Some(c) => verify_password(password, &c.password_hash).then_some(c),
    None => {
      if let Some(dummy) = DUMMY_HASH.as_deref() {
        verify_password(password, dummy);
      }
      None
    }
  }
}

/// The session token from the request's `Cookie` headers, if any.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
  headers
    .get_all(header::COOKIE)
    .iter()
    .filter_map(|v| v.to_str().ok())
    .flat_map(|v| v.split(';'))
    .filter_map(|pair| pair.trim().split_once('='))
    .find(|(name, _)| *name == SESSION_COOKIE)
    .map(|(_, value)| value.to_owned())
    .filter(|value| !value.is_empty())
}

fn session_cookie(value: &str, max_age: i64, secure: bool) -> String {
  let mut cookie =
    format!("{SESSION_COOKIE}={value}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age}");
  if secure {
    cookie.push_str("; Secure");
  }
  cookie
}

fn with_cookie(mut response: Response, cookie: String) -> Result<Response, Error> {
  let value = HeaderValue::from_str(&cookie)
    .map_err(|e| Error::Api(ApiError::Internal(Box::new(e))))?;
  response.headers_mut().insert(header::SET_COOKIE, value);
  Ok(response)
}

// ─── Handlers ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginForm {
  pub username: String,
  pub password: String,
}

/// `POST /login`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(form): Json<LoginForm>,
) -> Result<Response, Error>
where
  S: RegistryStore + SessionStore,
{
  let username = form.username.trim();
  let credentials = state
    .store
    .staff_credentials(username)
    .await
    .map_err(Error::store)?;

  let Some(credentials) = check_credentials(&form.password, credentials) else {
    tracing::warn!(username, "failed login attempt");
    return Err(Error::InvalidCredentials);
  };

  let staff = credentials.staff;
  let ttl_hours = state.config.session_ttl_hours;
  let token = generate_token();
  state
    .store
    .create_session(hash_token(&token), staff.id, Utc::now() + Duration::hours(ttl_hours))
    .await
    .map_err(Error::store)?;

  tracing::info!(username = %staff.username, "staff signed in");

  let greeting = if staff.full_name.is_empty() { &staff.username } else { &staff.full_name };
  let response = Json(json!({
    "message": format!("Welcome, {greeting}!"),
    "staff": staff,
  }))
  .into_response();
  with_cookie(
    response,
    session_cookie(&token, ttl_hours * 3600, state.config.cookie_secure),
  )
}

/// `GET|POST /logout`; always succeeds and clears the cookie.
pub async fn logout<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> Result<Response, Error>
where
  S: RegistryStore + SessionStore,
{
  if let Some(token) = session_token(&headers) {
    state
      .store
      .delete_session(hash_token(&token))
      .await
      .map_err(Error::store)?;
    tracing::info!("staff signed out");
  }

  let response = Json(json!({ "message": "You have been logged out." })).into_response();
  with_cookie(response, session_cookie("", 0, state.config.cookie_secure))
}

// ─── Guard ───────────────────────────────────────────────────────────────────

/// Resolve the session cookie to an active staff member and make it
/// available to handlers as `Extension<Staff>`; otherwise `401`.
pub async fn require_session<S>(
  State(state): State<AppState<S>>,
  mut req: Request,
  next: Next,
) -> Result<Response, ApiError>
where
  S: RegistryStore + SessionStore,
{
  let token = session_token(req.headers()).ok_or(ApiError::Unauthorized)?;
  let staff = state
    .store
    .resolve_session(hash_token(&token), Utc::now())
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::Unauthorized)?;

  req.extensions_mut().insert(staff);
  Ok(next.run(req).await)
}
