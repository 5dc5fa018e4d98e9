//! `GET /resume/`: the caller's whole resume in one document.

use std::sync::Arc;

use axum::{Json, extract::State};
use vitae_core::{
  aggregate::{self, ResumeView},
  store::ResumeStore,
};

use crate::{auth::Authenticated, error::ApiError};

pub async fn handler<S>(
  State(store): State<Arc<S>>,
  Authenticated(caller): Authenticated,
) -> Result<Json<ResumeView>, ApiError>
where
  S: ResumeStore + 'static,
{
  Ok(Json(aggregate::assemble(store.as_ref(), &caller).await?))
}
