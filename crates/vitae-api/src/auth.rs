//! Token-auth extractor.
//!
//! Accepts `Authorization: Token <key>` and `Authorization: Bearer <key>`.
//! A request with no header, or with some other scheme, is treated as
//! anonymous and rejected as not provided.

use std::sync::Arc;

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use vitae_core::{accounts, identity::Caller, store::AccountStore};

use crate::error::{ApiError, INVALID_HEADER, NOT_PROVIDED};

/// Present in a handler's arguments means the request carried a token that
/// resolves to an active identity.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Caller);

/// Pull the raw key out of the `Authorization` header.
pub fn presented_token(headers: &HeaderMap) -> Result<&str, ApiError> {
  let value = headers
    .get(header::AUTHORIZATION)
    .ok_or(ApiError::Unauthenticated(NOT_PROVIDED))?
    .to_str()
    .map_err(|_| ApiError::Unauthenticated(INVALID_HEADER))?;

  let mut words = value.split_whitespace();
  let scheme = words.next().ok_or(ApiError::Unauthenticated(NOT_PROVIDED))?;
  if !scheme.eq_ignore_ascii_case("token") && !scheme.eq_ignore_ascii_case("bearer") {
    return Err(ApiError::Unauthenticated(NOT_PROVIDED));
  }

  match (words.next(), words.next()) {
    (Some(key), None) => Ok(key),
    _ => Err(ApiError::Unauthenticated(INVALID_HEADER)),
  }
}

impl<S> FromRequestParts<Arc<S>> for Authenticated
where
  S: AccountStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    store: &Arc<S>,
  ) -> Result<Self, Self::Rejection> {
    let key = presented_token(&parts.headers)?;
    let caller = accounts::authenticate(store.as_ref(), key).await?;
    Ok(Authenticated(caller))
  }
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;

  use super::*;
  use crate::error::INVALID_TOKEN;

  fn headers(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    headers
  }

  fn detail(result: Result<&str, ApiError>) -> &'static str {
    match result {
      Err(ApiError::Unauthenticated(detail)) => detail,
      other => panic!("expected 401, got {other:?}"),
    }
  }

  #[test]
  fn both_schemes_are_accepted() {
    assert_eq!(presented_token(&headers("Token abc123")).unwrap(), "abc123");
    assert_eq!(presented_token(&headers("Bearer abc123")).unwrap(), "abc123");
    assert_eq!(presented_token(&headers("token abc123")).unwrap(), "abc123");
  }

  #[test]
  fn missing_or_foreign_scheme_is_not_provided() {
    assert_eq!(detail(presented_token(&HeaderMap::new())), NOT_PROVIDED);
    assert_eq!(detail(presented_token(&headers("Basic dXNlcjpwYXNz"))), NOT_PROVIDED);
  }

  #[test]
  fn malformed_token_header() {
    assert_eq!(detail(presented_token(&headers("Token"))), INVALID_HEADER);
    assert_eq!(detail(presented_token(&headers("Token a b"))), INVALID_HEADER);
    assert_ne!(INVALID_HEADER, INVALID_TOKEN);
  }
}
