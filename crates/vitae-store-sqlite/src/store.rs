//! [`SqliteStore`], the SQLite implementation of the account store.
//!
//! The resume collections are served by the generic impl in `table.rs`.

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use vitae_core::{
  identity::{Identity, NewIdentity},
  profile::{Profile, ProfileFields},
  store::{AccountStore, Store},
};

use crate::{
  Error, Result,
  encode::{RawIdentity, RawProfile, encode_dt, encode_uuid},
  schema::SCHEMA,
};

/// `SELECT` over `identities i` returning the columns [`RawIdentity`] expects.
macro_rules! select_identity {
  ($tail:literal) => {
    concat!(
      "SELECT i.identity_id, i.email, i.password_hash, i.is_active, i.is_staff, ",
      "i.is_superuser, i.created_at FROM identities i ",
      $tail
    )
  };
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Vitae store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn query_identity(&self, sql: &'static str, key: String) -> Result<Option<Identity>> {
    let raw: Option<RawIdentity> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(sql, rusqlite::params![key], RawIdentity::from_row)
          .optional()?)
      })
      .await?;

    raw.map(RawIdentity::into_identity).transpose()
  }
}

// ─── AccountStore impl ───────────────────────────────────────────────────────

impl Store for SqliteStore {
  type Error = Error;
}

impl AccountStore for SqliteStore {
  async fn create_identity(&self, input: NewIdentity) -> Result<Option<Identity>> {
    let identity = Identity {
      id:            Uuid::new_v4(),
      email:         input.email,
      password_hash: input.password_hash,
      is_active:     true,
      is_staff:      input.is_staff,
      is_superuser:  input.is_superuser,
      created_at:    Utc::now(),
    };

    let id_str       = encode_uuid(identity.id);
    let email        = identity.email.clone();
    let hash         = identity.password_hash.clone();
    let is_staff     = identity.is_staff;
    let is_superuser = identity.is_superuser;
    let at_str       = encode_dt(identity.created_at);

    let created = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let inserted = tx.execute(
          "INSERT INTO identities (
             identity_id, email, password_hash, is_active, is_staff, is_superuser, created_at
           ) VALUES (?1, ?2, ?3, 1, ?4, ?5, ?6)",
          rusqlite::params![id_str, email, hash, is_staff, is_superuser, at_str],
        );
        match inserted {
          Err(rusqlite::Error::SqliteFailure(e, _))
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
          {
            // Email already registered; dropping `tx` rolls back.
            return Ok(false);
          }
          other => {
            other?;
          }
        }

        tx.execute(
          "INSERT INTO profiles (owner_id, created_at, updated_at) VALUES (?1, ?2, ?2)",
          rusqlite::params![id_str, at_str],
        )?;

        tx.commit()?;
        Ok(true)
      })
      .await?;

    Ok(created.then_some(identity))
  }

  async fn find_identity_by_email(&self, email: String) -> Result<Option<Identity>> {
    self.query_identity(select_identity!("WHERE i.email = ?1"), email).await
  }

  async fn insert_token(&self, digest: String, owner_id: Uuid) -> Result<()> {
    let owner_str = encode_uuid(owner_id);
    let at_str    = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO tokens (digest, owner_id, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![digest, owner_str, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn identity_for_token(&self, digest: String) -> Result<Option<Identity>> {
    self
      .query_identity(
        select_identity!("JOIN tokens t ON t.owner_id = i.identity_id WHERE t.digest = ?1"),
        digest,
      )
      .await
  }

  async fn get_profile(&self, owner_id: Uuid) -> Result<Option<Profile>> {
    let owner_str = encode_uuid(owner_id);

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {} FROM profiles WHERE owner_id = ?1", RawProfile::SELECT),
            rusqlite::params![owner_str],
            RawProfile::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }

  async fn update_profile(
    &self,
    owner_id: Uuid,
    fields: ProfileFields,
  ) -> Result<Option<Profile>> {
    let owner_str = encode_uuid(owner_id);
    let at_str    = encode_dt(Utc::now());

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE profiles
             SET first_name = ?2, last_name = ?3, about_me = ?4, updated_at = ?5
           WHERE owner_id = ?1",
          rusqlite::params![
            owner_str,
            fields.first_name,
            fields.last_name,
            fields.about_me,
            at_str,
          ],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        let raw = tx.query_row(
          &format!("SELECT {} FROM profiles WHERE owner_id = ?1", RawProfile::SELECT),
          rusqlite::params![owner_str],
          RawProfile::from_row,
        )?;
        tx.commit()?;
        Ok(Some(raw))
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }
}
