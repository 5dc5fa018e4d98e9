//! Profile: optional personal details, exactly one per identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use uuid::Uuid;

use crate::validation::{MAX_TEXT_LEN, ValidationErrors, check_max_len};

/// The stored profile row. Created empty alongside its identity.
#[derive(Debug, Clone)]
pub struct Profile {
  pub owner_id:   Uuid,
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  pub about_me:   Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// The editable part of a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileFields {
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  pub about_me:   Option<String>,
}

/// Partial update body. An absent key leaves the field alone; an explicit
/// `null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
  #[serde(default, with = "double_option")]
  pub first_name: Option<Option<String>>,
  #[serde(default, with = "double_option")]
  pub last_name:  Option<Option<String>>,
  #[serde(default, with = "double_option")]
  pub about_me:   Option<Option<String>>,
}

impl Profile {
  pub fn fields(&self) -> ProfileFields {
    ProfileFields {
      first_name: self.first_name.clone(),
      last_name:  self.last_name.clone(),
      about_me:   self.about_me.clone(),
    }
  }
}

impl ProfileFields {
  pub fn apply(mut self, patch: ProfilePatch) -> Self {
    if let Some(v) = patch.first_name {
      self.first_name = v;
    }
    if let Some(v) = patch.last_name {
      self.last_name = v;
    }
    if let Some(v) = patch.about_me {
      self.about_me = v;
    }
    self
  }

  pub fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_max_len(&mut errors, "first_name", self.first_name.as_deref(), MAX_TEXT_LEN);
    check_max_len(&mut errors, "last_name", self.last_name.as_deref(), MAX_TEXT_LEN);
    errors.into_result()
  }
}

/// The public projection of a profile, as returned by the profile endpoint
/// and nested in the aggregate resume view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileView {
  pub email:      String,
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  pub about_me:   Option<String>,
}

impl ProfileView {
  pub fn new(email: &str, profile: Profile) -> Self {
    Self {
      email:      email.to_owned(),
      first_name: profile.first_name,
      last_name:  profile.last_name,
      about_me:   profile.about_me,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn patch(json: serde_json::Value) -> ProfilePatch {
    serde_json::from_value(json).unwrap()
  }

  #[test]
  fn absent_keys_are_untouched_and_null_clears() {
    let current = ProfileFields {
      first_name: Some("Ada".into()),
      last_name:  Some("Lovelace".into()),
      about_me:   Some("Analyst".into()),
    };
    let next = current.apply(patch(serde_json::json!({
      "first_name": "Augusta",
      "about_me": null,
    })));
    assert_eq!(next.first_name.as_deref(), Some("Augusta"));
    assert_eq!(next.last_name.as_deref(), Some("Lovelace"));
    assert_eq!(next.about_me, None);
  }

  #[test]
  fn long_names_are_rejected() {
    let fields = ProfileFields {
      first_name: Some("x".repeat(256)),
      about_me: Some("y".repeat(10_000)),
      ..Default::default()
    };
    let errors = fields.validate().unwrap_err();
    assert!(errors.contains("first_name"));
    assert!(!errors.contains("about_me"));
  }
}
