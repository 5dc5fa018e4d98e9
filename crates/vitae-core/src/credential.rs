//! Password hashing and session token generation.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use rand_core::{OsRng, RngCore as _};
use sha2::{Digest as _, Sha256};

use crate::{Error, Result};

/// Raw token length in bytes; rendered as twice as many hex characters.
const TOKEN_BYTES: usize = 20;

/// Hash `password` into an argon2id PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| Error::Credential(e.to_string()))
}

/// `false` for a wrong password and for an unparseable stored hash alike.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(password_hash) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

/// A fresh opaque bearer token (40 lowercase hex characters).
pub fn generate_token() -> String {
  let mut bytes = [0u8; TOKEN_BYTES];
  OsRng.fill_bytes(&mut bytes);
  hex::encode(bytes)
}

/// The form in which a token is persisted. Tokens are never stored raw.
pub fn token_digest(token: &str) -> String {
  hex::encode(Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_then_verify() {
    let hash = hash_password("testpass123").unwrap();
    assert!(hash.starts_with("$argon2id$"));
    assert!(verify_password("testpass123", &hash));
    assert!(!verify_password("badpass123", &hash));
  }

  #[test]
  fn garbage_hash_never_verifies() {
    assert!(!verify_password("testpass123", "not-a-phc-string"));
  }

  #[test]
  fn tokens_are_hex_and_distinct() {
    let a = generate_token();
    let b = generate_token();
    assert_eq!(a.len(), TOKEN_BYTES * 2);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(a, b);
    assert_eq!(token_digest(&a), token_digest(&a));
    assert_ne!(token_digest(&a), a);
  }
}
