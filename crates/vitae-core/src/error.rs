//! Error types for `vitae-core`.

use thiserror::Error;

use crate::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum Error {
  /// No caller, or a token that does not resolve to an active identity.
  #[error("unauthorized")]
  Unauthorized,

  /// Login failed. Does not say whether the email or the
  /// password was wrong.
  #[error("unable to authenticate with provided credentials")]
  InvalidCredentials,

  /// The record does not exist or belongs to someone else.
  #[error("not found")]
  NotFound,

  #[error("validation failed: {0}")]
  Validation(#[from] ValidationErrors),

  #[error("credential hashing error: {0}")]
  Credential(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Box a backend error.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
