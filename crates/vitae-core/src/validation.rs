//! Field-level validation errors and the shared checks that produce them.

use std::{collections::BTreeMap, fmt};

use chrono::{Datelike as _, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// Upper bound for every short text column.
pub const MAX_TEXT_LEN: usize = 255;

pub const REQUIRED: &str = "This field is required.";
pub const BLANK: &str = "This field may not be blank.";
pub const DATE_ORDER: &str = "Start date must be before the end date.";
pub const DATE_RANGE: &str = "Date must be between 0001-01-01 and 9999-12-31.";

/// Stored dates are four-digit ISO strings and compared as text.
pub const YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

/// Field name → messages. Serialises as a plain JSON object, e.g.
/// `{"end_date": ["Start date must be before the end date."]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
  pub fn new() -> Self { Self::default() }

  /// An error set holding exactly one message.
  pub fn single(field: &str, message: impl Into<String>) -> Self {
    let mut errors = Self::new();
    errors.add(field, message);
    errors
  }

  pub fn add(&mut self, field: &str, message: impl Into<String>) {
    self.0.entry(field.to_owned()).or_default().push(message.into());
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn contains(&self, field: &str) -> bool { self.0.contains_key(field) }

  pub fn messages(&self, field: &str) -> &[String] {
    self.0.get(field).map(Vec::as_slice).unwrap_or_default()
  }

  /// `Ok(())` if nothing was recorded.
  pub fn into_result(self) -> Result<(), Self> {
    if self.is_empty() { Ok(()) } else { Err(self) }
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for (field, messages) in &self.0 {
      for message in messages {
        if !first {
          f.write_str("; ")?;
        }
        write!(f, "{field}: {message}")?;
        first = false;
      }
    }
    Ok(())
  }
}

impl std::error::Error for ValidationErrors {}

// ─── Checks ──────────────────────────────────────────────────────────────────

/// Record [`REQUIRED`] when `value` is absent; pass it through otherwise.
pub fn require<T>(
  errors: &mut ValidationErrors,
  field: &str,
  value: Option<T>,
) -> Option<T> {
  if value.is_none() {
    errors.add(field, REQUIRED);
  }
  value
}

/// A required short text field: non-blank and at most [`MAX_TEXT_LEN`].
pub fn check_text(errors: &mut ValidationErrors, field: &str, value: &str) {
  if value.trim().is_empty() {
    errors.add(field, BLANK);
  }
  check_max_len(errors, field, Some(value), MAX_TEXT_LEN);
}

pub fn check_max_len(
  errors: &mut ValidationErrors,
  field: &str,
  value: Option<&str>,
  max: usize,
) {
  if let Some(v) = value
    && v.chars().count() > max
  {
    errors.add(
      field,
      format!("Ensure this field has no more than {max} characters."),
    );
  }
}

pub fn check_date_range(errors: &mut ValidationErrors, field: &str, date: NaiveDate) {
  if !YEARS.contains(&date.year()) {
    errors.add(field, DATE_RANGE);
  }
}

/// Open-ended ranges are always valid.
pub fn check_date_order(
  errors: &mut ValidationErrors,
  start: NaiveDate,
  end: Option<NaiveDate>,
) {
  if let Some(end) = end
    && start > end
  {
    errors.add("end_date", DATE_ORDER);
  }
}

// ─── Input normalisation ─────────────────────────────────────────────────────

/// `deserialize_with` helper for optional text: surrounding whitespace is
/// dropped before any check sees the value.
pub fn trimmed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(Option::<String>::deserialize(deserializer)?.map(|s| s.trim().to_owned()))
}
