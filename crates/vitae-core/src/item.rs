//! Resume items: the four owner-keyed collections that make up a resume.
//!
//! Every collection shares one envelope ([`Owned`]) and one capability trait
//! ([`ResumeItem`]), so the ownership rules in [`crate::scoped`] and the
//! storage code in backends are written once for all of them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_with::rust::double_option;
use uuid::Uuid;

use crate::validation::{
  ValidationErrors, check_date_order, check_date_range, check_text, require, trimmed,
};

// ─── Capability trait ────────────────────────────────────────────────────────

/// What a collection must provide to be served through the scoped access
/// layer: a patch shape, a way to build a full value from it, a way to merge
/// it into an existing value, and cross-field validation.
pub trait ResumeItem:
  Clone + std::fmt::Debug + Serialize + Send + Sync + 'static
{
  /// Collection name; used as the URL segment and the aggregate key.
  const COLLECTION: &'static str;

  /// Request body for create, replace and merge. Every field optional.
  type Patch: DeserializeOwned + Send + 'static;

  /// Build a complete value. Missing required fields are reported as
  /// field-level errors.
  fn from_patch(patch: Self::Patch) -> Result<Self, ValidationErrors>;

  /// Overlay the fields present in `patch` onto `self`.
  fn apply(self, patch: Self::Patch) -> Self;

  /// Check the complete candidate. Always run after [`Self::from_patch`] or
  /// [`Self::apply`], never on a bare patch.
  fn validate(&self) -> Result<(), ValidationErrors>;
}

// ─── Envelope ────────────────────────────────────────────────────────────────

/// A persisted item together with its ownership metadata.
///
/// Serialises flat: `{"id": ..., "user": <owner id>, ...item fields}`.
#[derive(Debug, Clone, Serialize)]
pub struct Owned<T> {
  pub id:         Uuid,
  /// Stamped by the server from the caller; never accepted from a request.
  #[serde(rename = "user")]
  pub owner_id:   Uuid,
  #[serde(skip)]
  pub created_at: DateTime<Utc>,
  #[serde(skip)]
  pub updated_at: DateTime<Utc>,
  #[serde(flatten)]
  pub item:       T,
}

fn check_span(errors: &mut ValidationErrors, start: NaiveDate, end: Option<NaiveDate>) {
  check_date_range(errors, "start_date", start);
  if let Some(end) = end {
    check_date_range(errors, "end_date", end);
  }
  check_date_order(errors, start, end);
}

// ─── Skill ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skill {
  pub title: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillPatch {
  #[serde(default, deserialize_with = "trimmed")]
  pub title: Option<String>,
}

impl ResumeItem for Skill {
  const COLLECTION: &'static str = "skills";

  type Patch = SkillPatch;

  fn from_patch(patch: SkillPatch) -> Result<Self, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    match require(&mut errors, "title", patch.title) {
      Some(title) => Ok(Self { title }),
      None => Err(errors),
    }
  }

  fn apply(mut self, patch: SkillPatch) -> Self {
    if let Some(title) = patch.title {
      self.title = title;
    }
    self
  }

  fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_text(&mut errors, "title", &self.title);
    errors.into_result()
  }
}

// ─── Education ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Education {
  pub institution: String,
  pub degree:      String,
  pub start_date:  NaiveDate,
  /// `None` while still enrolled.
  pub end_date:    Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EducationPatch {
  #[serde(default, deserialize_with = "trimmed")]
  pub institution: Option<String>,
  #[serde(default, deserialize_with = "trimmed")]
  pub degree:      Option<String>,
  pub start_date:  Option<NaiveDate>,
  #[serde(default, with = "double_option")]
  pub end_date:    Option<Option<NaiveDate>>,
}

impl ResumeItem for Education {
  const COLLECTION: &'static str = "educations";

  type Patch = EducationPatch;

  fn from_patch(patch: EducationPatch) -> Result<Self, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let institution = require(&mut errors, "institution", patch.institution);
    let degree = require(&mut errors, "degree", patch.degree);
    let start_date = require(&mut errors, "start_date", patch.start_date);
    match (institution, degree, start_date) {
      (Some(institution), Some(degree), Some(start_date)) => Ok(Self {
        institution,
        degree,
        start_date,
        end_date: patch.end_date.flatten(),
      }),
      _ => Err(errors),
    }
  }

  fn apply(mut self, patch: EducationPatch) -> Self {
    if let Some(v) = patch.institution {
      self.institution = v;
    }
    if let Some(v) = patch.degree {
      self.degree = v;
    }
    if let Some(v) = patch.start_date {
      self.start_date = v;
    }
    if let Some(v) = patch.end_date {
      self.end_date = v;
    }
    self
  }

  fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_text(&mut errors, "institution", &self.institution);
    check_text(&mut errors, "degree", &self.degree);
    check_span(&mut errors, self.start_date, self.end_date);
    errors.into_result()
  }
}

// ─── Certificate ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Certificate {
  pub title:                String,
  pub issuing_organization: String,
  pub issue_date:           NaiveDate,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CertificatePatch {
  #[serde(default, deserialize_with = "trimmed")]
  pub title:                Option<String>,
  #[serde(default, deserialize_with = "trimmed")]
  pub issuing_organization: Option<String>,
  pub issue_date:           Option<NaiveDate>,
}

impl ResumeItem for Certificate {
  const COLLECTION: &'static str = "certificates";

  type Patch = CertificatePatch;

  fn from_patch(patch: CertificatePatch) -> Result<Self, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let title = require(&mut errors, "title", patch.title);
    let issuing_organization =
      require(&mut errors, "issuing_organization", patch.issuing_organization);
    let issue_date = require(&mut errors, "issue_date", patch.issue_date);
    match (title, issuing_organization, issue_date) {
      (Some(title), Some(issuing_organization), Some(issue_date)) => {
        Ok(Self { title, issuing_organization, issue_date })
      }
      _ => Err(errors),
    }
  }

  fn apply(mut self, patch: CertificatePatch) -> Self {
    if let Some(v) = patch.title {
      self.title = v;
    }
    if let Some(v) = patch.issuing_organization {
      self.issuing_organization = v;
    }
    if let Some(v) = patch.issue_date {
      self.issue_date = v;
    }
    self
  }

  fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_text(&mut errors, "title", &self.title);
    check_text(&mut errors, "issuing_organization", &self.issuing_organization);
    check_date_range(&mut errors, "issue_date", self.issue_date);
    errors.into_result()
  }
}

// ─── Experience ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Experience {
  pub company:     String,
  pub position:    String,
  /// Free text, no length limit.
  pub description: Option<String>,
  pub start_date:  NaiveDate,
  /// `None` for a current position.
  pub end_date:    Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExperiencePatch {
  #[serde(default, deserialize_with = "trimmed")]
  pub company:     Option<String>,
  #[serde(default, deserialize_with = "trimmed")]
  pub position:    Option<String>,
  #[serde(default, with = "double_option")]
  pub description: Option<Option<String>>,
  pub start_date:  Option<NaiveDate>,
  #[serde(default, with = "double_option")]
  pub end_date:    Option<Option<NaiveDate>>,
}

impl ResumeItem for Experience {
  const COLLECTION: &'static str = "experiences";

  type Patch = ExperiencePatch;

  fn from_patch(patch: ExperiencePatch) -> Result<Self, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let company = require(&mut errors, "company", patch.company);
    let position = require(&mut errors, "position", patch.position);
    let start_date = require(&mut errors, "start_date", patch.start_date);
    match (company, position, start_date) {
      (Some(company), Some(position), Some(start_date)) => Ok(Self {
        company,
        position,
        description: patch.description.flatten(),
        start_date,
        end_date: patch.end_date.flatten(),
      }),
      _ => Err(errors),
    }
  }

  fn apply(mut self, patch: ExperiencePatch) -> Self {
    if let Some(v) = patch.company {
      self.company = v;
    }
    if let Some(v) = patch.position {
      self.position = v;
    }
    if let Some(v) = patch.description {
      self.description = v;
    }
    if let Some(v) = patch.start_date {
      self.start_date = v;
    }
    if let Some(v) = patch.end_date {
      self.end_date = v;
    }
    self
  }

  fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_text(&mut errors, "company", &self.company);
    check_text(&mut errors, "position", &self.position);
    check_span(&mut errors, self.start_date, self.end_date);
    errors.into_result()
  }
}
