//! JSON REST API for Vitae.
//!
//! Exposes an axum [`Router`] backed by any [`vitae_core::store::ResumeStore`].
//! TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", vitae_api::api_router(store.clone()))
//! ```

pub mod accounts;
pub mod auth;
pub mod error;
pub mod items;
pub mod resume;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use vitae_core::{
  item::{Certificate, Education, Experience, Skill},
  store::ResumeStore,
};

pub use auth::Authenticated;
pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ResumeStore + 'static,
{
  Router::new()
    // Accounts
    .route("/accounts/register/", post(accounts::register::<S>))
    .route("/accounts/token/", post(accounts::token::<S>))
    .route(
      "/accounts/profile/",
      get(accounts::profile::<S>)
        .put(accounts::update_profile::<S>)
        .patch(accounts::update_profile::<S>),
    )
    // Resume collections
    .merge(items::routes::<Skill, S>())
    .merge(items::routes::<Education, S>())
    .merge(items::routes::<Certificate, S>())
    .merge(items::routes::<Experience, S>())
    // Aggregate
    .route("/resume/", get(resume::handler::<S>))
    .with_state(store)
}
