//! The combined, read-only resume view for one caller.

use serde::Serialize;

use crate::{
  Result, accounts,
  identity::Caller,
  item::{Certificate, Education, Experience, Owned, Skill},
  profile::ProfileView,
  scoped,
  store::ResumeStore,
};

/// Identity, profile and every collection, unpaginated.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeView {
  pub profile:      ProfileView,
  pub email:        String,
  pub skills:       Vec<Owned<Skill>>,
  pub educations:   Vec<Owned<Education>>,
  pub certificates: Vec<Owned<Certificate>>,
  pub experiences:  Vec<Owned<Experience>>,
}

/// Assemble the caller's resume. Every collection goes through the same
/// scoped listing as its own endpoint, so the view can never include a
/// record the caller could not list directly.
pub async fn assemble<S: ResumeStore>(store: &S, caller: &Caller) -> Result<ResumeView> {
  Ok(ResumeView {
    profile:      accounts::profile(store, caller).await?,
    email:        caller.email().to_owned(),
    skills:       scoped::list::<Skill, S>(store, caller).await?,
    educations:   scoped::list::<Education, S>(store, caller).await?,
    certificates: scoped::list::<Certificate, S>(store, caller).await?,
    experiences:  scoped::list::<Experience, S>(store, caller).await?,
  })
}
