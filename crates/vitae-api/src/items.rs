//! Handlers for the owner-scoped resume collections.
//!
//! One generic handler set serves every [`ResumeItem`]; [`routes`] mounts it
//! under `/resume/<collection>/`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/resume/{collection}/` | The caller's records, oldest first |
//! | `POST`   | `/resume/{collection}/` | 201; `user` is stamped from the caller |
//! | `GET`    | `/resume/{collection}/{id}/` | 404 if absent or not the caller's |
//! | `PUT`    | `/resume/{collection}/{id}/` | Every required field must be present |
//! | `PATCH`  | `/resume/{collection}/{id}/` | Overlays the stored record |
//! | `DELETE` | `/resume/{collection}/{id}/` | 204 |

use std::sync::Arc;

use axum::{
  Json, Router,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
  routing::get,
};
use uuid::Uuid;
use vitae_core::{
  item::{Owned, ResumeItem},
  scoped::{self, UpdateMode},
  store::{AccountStore, OwnedStore},
};

use crate::{auth::Authenticated, error::ApiError};

/// Routes for one collection, keyed by [`ResumeItem::COLLECTION`].
pub fn routes<T, S>() -> Router<Arc<S>>
where
  T: ResumeItem,
  S: AccountStore + OwnedStore<T> + 'static,
{
  let collection = format!("/resume/{}/", T::COLLECTION);
  let record = format!("/resume/{}/{{id}}/", T::COLLECTION);
  Router::new()
    .route(&collection, get(list::<T, S>).post(create::<T, S>))
    .route(
      &record,
      get(retrieve::<T, S>)
        .put(replace::<T, S>)
        .patch(merge::<T, S>)
        .delete(destroy::<T, S>),
    )
}

/// An id that is not a UUID cannot name any record.
fn record_id(raw: &str) -> Result<Uuid, ApiError> {
  Uuid::parse_str(raw).map_err(|_| ApiError::NotFound)
}

// ─── Collection ───────────────────────────────────────────────────────────────

pub async fn list<T, S>(
  State(store): State<Arc<S>>,
  Authenticated(caller): Authenticated,
) -> Result<Json<Vec<Owned<T>>>, ApiError>
where
  T: ResumeItem,
  S: AccountStore + OwnedStore<T> + 'static,
{
  Ok(Json(scoped::list::<T, S>(store.as_ref(), &caller).await?))
}

pub async fn create<T, S>(
  State(store): State<Arc<S>>,
  Authenticated(caller): Authenticated,
  payload: Result<Json<T::Patch>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  T: ResumeItem,
  S: AccountStore + OwnedStore<T> + 'static,
{
  let Json(patch) = payload?;
  let created = scoped::create::<T, S>(store.as_ref(), &caller, patch).await?;
  Ok((StatusCode::CREATED, Json(created)))
}

// ─── Record ───────────────────────────────────────────────────────────────────

pub async fn retrieve<T, S>(
  State(store): State<Arc<S>>,
  Authenticated(caller): Authenticated,
  Path(id): Path<String>,
) -> Result<Json<Owned<T>>, ApiError>
where
  T: ResumeItem,
  S: AccountStore + OwnedStore<T> + 'static,
{
  let id = record_id(&id)?;
  Ok(Json(scoped::retrieve::<T, S>(store.as_ref(), &caller, id).await?))
}

pub async fn replace<T, S>(
  State(store): State<Arc<S>>,
  Authenticated(caller): Authenticated,
  Path(id): Path<String>,
  payload: Result<Json<T::Patch>, JsonRejection>,
) -> Result<Json<Owned<T>>, ApiError>
where
  T: ResumeItem,
  S: AccountStore + OwnedStore<T> + 'static,
{
  update::<T, S>(&store, caller, &id, payload, UpdateMode::Replace).await
}

pub async fn merge<T, S>(
  State(store): State<Arc<S>>,
  Authenticated(caller): Authenticated,
  Path(id): Path<String>,
  payload: Result<Json<T::Patch>, JsonRejection>,
) -> Result<Json<Owned<T>>, ApiError>
where
  T: ResumeItem,
  S: AccountStore + OwnedStore<T> + 'static,
{
  update::<T, S>(&store, caller, &id, payload, UpdateMode::Merge).await
}

async fn update<T, S>(
  store: &S,
  caller: vitae_core::identity::Caller,
  id: &str,
  payload: Result<Json<T::Patch>, JsonRejection>,
  mode: UpdateMode,
) -> Result<Json<Owned<T>>, ApiError>
where
  T: ResumeItem,
  S: OwnedStore<T>,
{
  let id = record_id(id)?;
  let Json(patch) = payload?;
  Ok(Json(scoped::update::<T, S>(store, &caller, id, patch, mode).await?))
}

pub async fn destroy<T, S>(
  State(store): State<Arc<S>>,
  Authenticated(caller): Authenticated,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  T: ResumeItem,
  S: AccountStore + OwnedStore<T> + 'static,
{
  let id = record_id(&id)?;
  scoped::destroy::<T, S>(store.as_ref(), &caller, id).await?;
  Ok(StatusCode::NO_CONTENT)
}
