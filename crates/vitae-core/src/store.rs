//! Storage traits.
//!
//! Implemented by backends (e.g. `vitae-store-sqlite`). The use cases in this
//! crate and the HTTP layer depend only on these abstractions.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`). Arguments are
//! passed by value so the futures borrow nothing but `self`.

use std::future::Future;

use uuid::Uuid;

use crate::{
  identity::{Identity, NewIdentity},
  item::{Certificate, Education, Experience, Owned, ResumeItem, Skill},
  profile::{Profile, ProfileFields},
};

/// The error type shared by every store trait a backend implements.
pub trait Store: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;
}

// ─── Accounts ────────────────────────────────────────────────────────────────

pub trait AccountStore: Store {
  /// Persist a new identity and its empty profile in one transaction.
  ///
  /// Returns `None` (and writes nothing) if the email is already taken.
  fn create_identity(
    &self,
    input: NewIdentity,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + '_;

  /// Look up an identity by its already-normalised email.
  fn find_identity_by_email(
    &self,
    email: String,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + '_;

  /// Bind a token digest to an identity.
  fn insert_token(
    &self,
    digest: String,
    owner_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Resolve a token digest to the identity it was issued to.
  fn identity_for_token(
    &self,
    digest: String,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + '_;

  fn get_profile(
    &self,
    owner_id: Uuid,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  /// Overwrite the editable profile fields. Returns `None` if the owner has
  /// no profile.
  fn update_profile(
    &self,
    owner_id: Uuid,
    fields: ProfileFields,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;
}

// ─── Owned collections ───────────────────────────────────────────────────────

/// Owner-keyed storage for one resume collection.
///
/// Every method takes the owner; there is no way to reach a
/// record without naming who owns it.
pub trait OwnedStore<T: ResumeItem>: Store {
  /// All of the owner's records, oldest first.
  fn list_owned(
    &self,
    owner_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Owned<T>>, Self::Error>> + Send + '_;

  /// `None` if the record does not exist or has a different owner.
  fn get_owned(
    &self,
    owner_id: Uuid,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Owned<T>>, Self::Error>> + Send + '_;

  fn insert_owned(
    &self,
    owner_id: Uuid,
    item: T,
  ) -> impl Future<Output = Result<Owned<T>, Self::Error>> + Send + '_;

  /// Replace the item fields and bump `updated_at`. `None` if the record
  /// does not exist or has a different owner.
  fn update_owned(
    &self,
    owner_id: Uuid,
    id: Uuid,
    item: T,
  ) -> impl Future<Output = Result<Option<Owned<T>>, Self::Error>> + Send + '_;

  /// `false` if the record does not exist or has a different owner.
  fn delete_owned(
    &self,
    owner_id: Uuid,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

/// Everything the resume service needs from a backend.
pub trait ResumeStore:
  AccountStore
  + OwnedStore<Skill>
  + OwnedStore<Education>
  + OwnedStore<Certificate>
  + OwnedStore<Experience>
{
}

impl<S> ResumeStore for S where
  S: AccountStore
    + OwnedStore<Skill>
    + OwnedStore<Education>
    + OwnedStore<Certificate>
    + OwnedStore<Experience>
{
}
