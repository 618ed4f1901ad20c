//! Authenticated-request context, as seen from handlers.
//!
//! The gate verifies the token and inserts an `AuthCtx` into the request
//! extensions; handlers receive it through the extractor and never touch the
//! token themselves. Explicit value passing only: there is no thread-local or
//! task-local ambient identity, so nothing can leak across reused workers.

use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};

use crate::state::AppState;

/// Identity attached to a request that passed the gate.
///
/// `subject` is `None` when the verified token carried no subject claim
/// (a token issued for an empty subject). Lives for a single request.
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub subject: Option<String>,
}

impl AuthCtx {
    pub fn new(subject: Option<String>) -> Self {
        Self { subject }
    }
}

/// Extractor for handlers that require an authenticated caller.
///
/// Missing `AuthCtx` means the gate did not run on this route, which is a
/// wiring mistake; reject with 401 rather than proceed unauthenticated.
pub struct AuthCtxExtractor(pub AuthCtx);

impl FromRequestParts<AppState> for AuthCtxExtractor
where
    AppState: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthCtx>()
            .cloned()
            .map(AuthCtxExtractor)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
