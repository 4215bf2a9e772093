//! Extraction of the caller identity from request headers.
//!
//! Tokens are verified upstream by the identity provider's gateway, which
//! forwards the authenticated user id in [`CALLER_HEADER`]. The value is
//! opaque here and only travels with the request into the service.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use harga_core::service::RequestContext;

/// Header carrying the authenticated user id.
pub const CALLER_HEADER: &str = "x-user-id";

/// Extractor wrapping the [`RequestContext`] for one request.
#[derive(Debug, Clone, Default)]
pub struct Caller(pub RequestContext);

impl<S: Send + Sync> FromRequestParts<S> for Caller {
  type Rejection = Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    let caller = parts
      .headers
      .get(CALLER_HEADER)
      .and_then(|v| v.to_str().ok())
      .map(str::trim)
      .filter(|v| !v.is_empty())
      .map(str::to_owned);
    Ok(Caller(RequestContext { caller }))
  }
}
