//! Bearer-token gate: extract → validate → attach identity, or 401.
//!
//! One pass per request. Public routes bypass the token service entirely;
//! everything else either reaches the next handler with an `AuthCtx` in the
//! request extensions or is rejected before routing happens.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::config::{HEALTH_CHECK_PATH, SWAGGER_UI_PREFIX};
use crate::error::AppError;
use crate::services::auth::AuthError;
use crate::state::AppState;

/// Apply the authentication gate to the given Router.
///
/// Applied at the top level so the predicate sees full request paths.
pub fn apply(router: Router, state: AppState) -> Router {
    router.layer(middleware::from_fn_with_state(state, auth_gate))
}

/// Exempt from authentication: the health-check endpoint (exact match) and
/// the documentation UI (prefix match).
fn is_public_route(path: &str) -> bool {
    path == HEALTH_CHECK_PATH || path.starts_with(SWAGGER_UI_PREFIX)
}

async fn auth_gate(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if is_public_route(req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let subject = authenticate(&state, req.headers()).inspect_err(|err| {
        tracing::warn!(error = %err, "request rejected by authentication gate");
    })?;

    // middleware → extractor handoff
    req.extensions_mut().insert(AuthCtx::new(subject));

    Ok(next.run(req).await)
}

/// Extract → validate → resolve the subject. Each step's failure kind
/// travels to the caller unchanged.
fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Option<String>, AuthError> {
    let token = state
        .tokens
        .extract_token(headers)
        .ok_or(AuthError::TokenNotFound)?;

    state.tokens.validate_token(&token)?;

    state.tokens.subject_of(&token)
}
