//! Handlers for `/accounts` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/accounts/register/` | Body: `{"email","password","password1"}`; 201 `{"email"}` |
//! | `POST` | `/accounts/token/` | Body: `{"email","password"}`; 200 `{"token"}` |
//! | `GET`  | `/accounts/profile/` | The caller's profile |
//! | `PUT` / `PATCH` | `/accounts/profile/` | Absent keys are left alone |

use std::sync::Arc;

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Serialize;
use vitae_core::{
  Error as CoreError,
  accounts::{self, Login, Registration},
  profile::{ProfilePatch, ProfileView},
  store::AccountStore,
};

use crate::{auth::Authenticated, error::ApiError};

// ─── Register ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct Registered {
  pub email: String,
}

/// `POST /accounts/register/`
pub async fn register<S>(
  State(store): State<Arc<S>>,
  payload: Result<Json<Registration>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AccountStore,
{
  let Json(body) = payload?;
  let identity = accounts::register(store.as_ref(), body).await?;
  tracing::info!(identity_id = %identity.id, "registered identity");
  Ok((StatusCode::CREATED, Json(Registered { email: identity.email })))
}

// ─── Token ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct IssuedToken {
  pub token: String,
}

/// `POST /accounts/token/`
pub async fn token<S>(
  State(store): State<Arc<S>>,
  payload: Result<Json<Login>, JsonRejection>,
) -> Result<Json<IssuedToken>, ApiError>
where
  S: AccountStore,
{
  let Json(body) = payload?;
  let email = body.email.clone();
  match accounts::login(store.as_ref(), body).await {
    Ok(token) => Ok(Json(IssuedToken { token })),
    Err(CoreError::InvalidCredentials) => {
      tracing::warn!(email = ?email, "rejected login");
      Err(ApiError::InvalidCredentials)
    }
    Err(e) => Err(e.into()),
  }
}

// ─── Profile ──────────────────────────────────────────────────────────────────

/// `GET /accounts/profile/`
pub async fn profile<S>(
  State(store): State<Arc<S>>,
  Authenticated(caller): Authenticated,
) -> Result<Json<ProfileView>, ApiError>
where
  S: AccountStore + 'static,
{
  Ok(Json(accounts::profile(store.as_ref(), &caller).await?))
}

/// `PUT /accounts/profile/` and `PATCH /accounts/profile/`. Every profile
/// field is optional, so both verbs merge.
pub async fn update_profile<S>(
  State(store): State<Arc<S>>,
  Authenticated(caller): Authenticated,
  payload: Result<Json<ProfilePatch>, JsonRejection>,
) -> Result<Json<ProfileView>, ApiError>
where
  S: AccountStore + 'static,
{
  let Json(patch) = payload?;
  Ok(Json(accounts::update_profile(store.as_ref(), &caller, patch).await?))
}
