//! Identity, the authenticable account record.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::validation::MAX_TEXT_LEN;

/// A stored account. The credential is only ever held as a PHC hash string.
#[derive(Debug, Clone)]
pub struct Identity {
  pub id:            Uuid,
  /// Normalised with [`normalize_email`]; unique across all identities.
  pub email:         String,
  pub password_hash: String,
  pub is_active:     bool,
  pub is_staff:      bool,
  pub is_superuser:  bool,
  pub created_at:    DateTime<Utc>,
}

/// Input to [`crate::store::AccountStore::create_identity`].
/// `id` and `created_at` are always set by the store.
#[derive(Debug, Clone)]
pub struct NewIdentity {
  pub email:         String,
  pub password_hash: String,
  pub is_staff:      bool,
  pub is_superuser:  bool,
}

impl NewIdentity {
  /// A regular, non-privileged account.
  pub fn user(email: String, password_hash: String) -> Self {
    Self { email, password_hash, is_staff: false, is_superuser: false }
  }

  /// An account with both staff and superuser flags set.
  pub fn superuser(email: String, password_hash: String) -> Self {
    Self { email, password_hash, is_staff: true, is_superuser: true }
  }
}

/// Proof that a request was made by an authenticated, active identity.
///
/// Only [`crate::accounts::authenticate`] hands these out, so every scoped
/// operation that takes a `&Caller` has already passed authentication.
#[derive(Debug, Clone)]
pub struct Caller {
  id:    Uuid,
  email: String,
}

impl Caller {
  pub(crate) fn from_identity(identity: Identity) -> Self {
    Self { id: identity.id, email: identity.email }
  }

  pub fn id(&self) -> Uuid { self.id }

  pub fn email(&self) -> &str { &self.email }
}

// ─── Email ───────────────────────────────────────────────────────────────────

/// Trim and lowercase the domain part. The local part is left alone since
/// some mail systems treat it case-sensitively.
pub fn normalize_email(email: &str) -> String {
  let email = email.trim();
  match email.rsplit_once('@') {
    Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
    None => email.to_owned(),
  }
}

/// Structural check only; deliverability is not our concern.
pub fn is_valid_email(email: &str) -> bool {
  if email.is_empty()
    || email.chars().count() > MAX_TEXT_LEN
    || email.chars().any(char::is_whitespace)
  {
    return false;
  }
  let Some((local, domain)) = email.split_once('@') else {
    return false;
  };
  !local.is_empty()
    && !domain.contains('@')
    && domain.contains('.')
    && domain.split('.').all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normalize_lowercases_domain_only() {
    assert_eq!(normalize_email(" Test@EXAMPLE.Com "), "Test@example.com");
    assert_eq!(normalize_email("no-at-sign"), "no-at-sign");
  }

  #[test]
  fn email_shapes() {
    assert!(is_valid_email("test@example.com"));
    assert!(is_valid_email("first.last+tag@sub.example.org"));
    assert!(!is_valid_email(""));
    assert!(!is_valid_email("test"));
    assert!(!is_valid_email("@example.com"));
    assert!(!is_valid_email("test@example"));
    assert!(!is_valid_email("test@@example.com"));
    assert!(!is_valid_email("test@example..com"));
    assert!(!is_valid_email("te st@example.com"));
  }
}
