//! Account use cases: registration, login, token authentication and the
//! caller's profile.

use serde::Deserialize;

use crate::{
  Error, Result,
  credential::{generate_token, hash_password, token_digest, verify_password},
  identity::{Caller, Identity, NewIdentity, is_valid_email, normalize_email},
  profile::{ProfilePatch, ProfileView},
  store::AccountStore,
  validation::{ValidationErrors, require},
};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_PASSWORD_LEN: usize = 68;

// ─── Registration ────────────────────────────────────────────────────────────

/// Registration body. Fields are optional so that a missing one is reported
/// as a field error instead of a parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registration {
  pub email:     Option<String>,
  pub password:  Option<String>,
  /// Confirmation; must equal `password`.
  pub password1: Option<String>,
}

/// Validate, hash, and create the identity with its profile.
///
/// Passwords are trimmed before any check; login does not trim. Field errors
/// (missing, malformed, too short) are reported together. The password
/// mismatch is only checked once every field is individually valid, and is
/// reported under `detail`.
pub async fn register<S: AccountStore>(store: &S, input: Registration) -> Result<Identity> {
  let mut errors = ValidationErrors::new();
  let email = require(&mut errors, "email", input.email).map(|e| normalize_email(&e));
  let password = require(&mut errors, "password", input.password).map(trim);
  let password1 = require(&mut errors, "password1", input.password1).map(trim);

  if let Some(email) = &email {
    check_email(&mut errors, email);
  }
  if let Some(password) = &password {
    check_password(&mut errors, "password", password);
  }
  if let Some(password1) = &password1 {
    check_password(&mut errors, "password1", password1);
  }

  let (Some(email), Some(password), Some(password1)) = (email, password, password1)
  else {
    return Err(errors.into());
  };
  errors.into_result()?;

  if password != password1 {
    return Err(ValidationErrors::single("detail", "passwords do not match").into());
  }

  provision(store, NewIdentity::user(email, hash_password(&password)?)).await
}

/// Create a staff + superuser identity. Applies the same email and password
/// rules as [`register`], minus the confirmation field.
pub async fn create_superuser<S: AccountStore>(
  store: &S,
  email: &str,
  password: &str,
) -> Result<Identity> {
  let email = normalize_email(email);
  let password = password.trim();
  let mut errors = ValidationErrors::new();
  check_email(&mut errors, &email);
  check_password(&mut errors, "password", password);
  errors.into_result()?;

  provision(store, NewIdentity::superuser(email, hash_password(password)?)).await
}

async fn provision<S: AccountStore>(store: &S, input: NewIdentity) -> Result<Identity> {
  store
    .create_identity(input)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| {
      ValidationErrors::single("email", "user with this email already exists.").into()
    })
}

fn trim(value: String) -> String { value.trim().to_owned() }

fn check_email(errors: &mut ValidationErrors, email: &str) {
  if !is_valid_email(email) {
    errors.add("email", "Enter a valid email address.");
  }
}

fn check_password(errors: &mut ValidationErrors, field: &str, password: &str) {
  let len = password.chars().count();
  if len < MIN_PASSWORD_LEN {
    errors.add(
      field,
      format!("Ensure this field has at least {MIN_PASSWORD_LEN} characters."),
    );
  } else if len > MAX_PASSWORD_LEN {
    errors.add(
      field,
      format!("Ensure this field has no more than {MAX_PASSWORD_LEN} characters."),
    );
  }
}

// ─── Sessions ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Login {
  pub email:    Option<String>,
  pub password: Option<String>,
}

/// Verify credentials and issue a fresh bearer token.
///
/// An unknown email, a wrong password and an inactive account all produce
/// the same [`Error::InvalidCredentials`].
pub async fn login<S: AccountStore>(store: &S, input: Login) -> Result<String> {
  let mut errors = ValidationErrors::new();
  let email = require(&mut errors, "email", input.email);
  let password = require(&mut errors, "password", input.password);
  let (Some(email), Some(password)) = (email, password) else {
    return Err(errors.into());
  };

  let identity = store
    .find_identity_by_email(normalize_email(&email))
    .await
    .map_err(Error::store)?
    .filter(|identity| identity.is_active)
    .filter(|identity| verify_password(&password, &identity.password_hash))
    .ok_or(Error::InvalidCredentials)?;

  let token = generate_token();
  store
    .insert_token(token_digest(&token), identity.id)
    .await
    .map_err(Error::store)?;
  Ok(token)
}

/// Resolve a presented bearer token to its caller.
pub async fn authenticate<S: AccountStore>(store: &S, token: &str) -> Result<Caller> {
  store
    .identity_for_token(token_digest(token))
    .await
    .map_err(Error::store)?
    .filter(|identity| identity.is_active)
    .map(Caller::from_identity)
    .ok_or(Error::Unauthorized)
}

// ─── Profile ─────────────────────────────────────────────────────────────────

pub async fn profile<S: AccountStore>(store: &S, caller: &Caller) -> Result<ProfileView> {
  let profile = store
    .get_profile(caller.id())
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;
  Ok(ProfileView::new(caller.email(), profile))
}

pub async fn update_profile<S: AccountStore>(
  store: &S,
  caller: &Caller,
  patch: ProfilePatch,
) -> Result<ProfileView> {
  let current = store
    .get_profile(caller.id())
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  let fields = current.fields().apply(patch);
  fields.validate()?;

  let updated = store
    .update_profile(caller.id(), fields)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;
  Ok(ProfileView::new(caller.email(), updated))
}
