//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as ISO 8601
//! `YYYY-MM-DD`, and UUIDs as hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;
use vitae_core::{identity::Identity, profile::Profile};

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from an `identities` row.
pub struct RawIdentity {
  pub identity_id:   String,
  pub email:         String,
  pub password_hash: String,
  pub is_active:     bool,
  pub is_staff:      bool,
  pub is_superuser:  bool,
  pub created_at:    String,
}

impl RawIdentity {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      identity_id:   row.get(0)?,
      email:         row.get(1)?,
      password_hash: row.get(2)?,
      is_active:     row.get(3)?,
      is_staff:      row.get(4)?,
      is_superuser:  row.get(5)?,
      created_at:    row.get(6)?,
    })
  }

  pub fn into_identity(self) -> Result<Identity> {
    Ok(Identity {
      id:            decode_uuid(&self.identity_id)?,
      email:         self.email,
      password_hash: self.password_hash,
      is_active:     self.is_active,
      is_staff:      self.is_staff,
      is_superuser:  self.is_superuser,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `profiles` row.
pub struct RawProfile {
  pub owner_id:   String,
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  pub about_me:   Option<String>,
  pub created_at: String,
  pub updated_at: String,
}

impl RawProfile {
  pub const SELECT: &'static str =
    "owner_id, first_name, last_name, about_me, created_at, updated_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      owner_id:   row.get(0)?,
      first_name: row.get(1)?,
      last_name:  row.get(2)?,
      about_me:   row.get(3)?,
      created_at: row.get(4)?,
      updated_at: row.get(5)?,
    })
  }

  pub fn into_profile(self) -> Result<Profile> {
    Ok(Profile {
      owner_id:   decode_uuid(&self.owner_id)?,
      first_name: self.first_name,
      last_name:  self.last_name,
      about_me:   self.about_me,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
