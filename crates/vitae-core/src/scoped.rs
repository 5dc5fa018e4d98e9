//! The ownership-scoped access layer.
//!
//! One set of functions serves every [`ResumeItem`] collection. The caller is
//! always the owner key: reads only ever see the caller's records, creates
//! always stamp the caller as owner, and a record owned by someone else is
//! reported as [`Error::NotFound`] rather than forbidden, so its existence
//! is never revealed.

use uuid::Uuid;

use crate::{
  Error, Result,
  identity::Caller,
  item::{Owned, ResumeItem},
  store::OwnedStore,
};

/// How an update payload is combined with the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
  /// The payload must carry every required field (PUT).
  Replace,
  /// The payload overlays the stored record (PATCH).
  Merge,
}

pub async fn list<T, S>(store: &S, caller: &Caller) -> Result<Vec<Owned<T>>>
where
  T: ResumeItem,
  S: OwnedStore<T>,
{
  store.list_owned(caller.id()).await.map_err(Error::store)
}

pub async fn retrieve<T, S>(store: &S, caller: &Caller, id: Uuid) -> Result<Owned<T>>
where
  T: ResumeItem,
  S: OwnedStore<T>,
{
  store
    .get_owned(caller.id(), id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)
}

pub async fn create<T, S>(store: &S, caller: &Caller, patch: T::Patch) -> Result<Owned<T>>
where
  T: ResumeItem,
  S: OwnedStore<T>,
{
  let item = T::from_patch(patch)?;
  item.validate()?;
  store.insert_owned(caller.id(), item).await.map_err(Error::store)
}

/// Validation runs against the full candidate: for [`UpdateMode::Merge`] that
/// is the stored record with the patch overlaid, so a lone `start_date`
/// change is still checked against the stored `end_date`.
pub async fn update<T, S>(
  store: &S,
  caller: &Caller,
  id: Uuid,
  patch: T::Patch,
  mode: UpdateMode,
) -> Result<Owned<T>>
where
  T: ResumeItem,
  S: OwnedStore<T>,
{
  let existing = retrieve::<T, S>(store, caller, id).await?;

  let candidate = match mode {
    UpdateMode::Replace => T::from_patch(patch)?,
    UpdateMode::Merge => existing.item.apply(patch),
  };
  candidate.validate()?;

  store
    .update_owned(caller.id(), id, candidate)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)
}

pub async fn destroy<T, S>(store: &S, caller: &Caller, id: Uuid) -> Result<()>
where
  T: ResumeItem,
  S: OwnedStore<T>,
{
  let deleted = store
    .delete_owned(caller.id(), id)
    .await
    .map_err(Error::store)?;
  if deleted { Ok(()) } else { Err(Error::NotFound) }
}
