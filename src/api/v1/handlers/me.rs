use axum::{Json, response::IntoResponse};
use serde_json::json;

use crate::api::v1::extractors::AuthCtxExtractor;

/// Echo the authenticated identity attached by the gate.
///
/// `subject` is null when the token was issued with an empty subject.
pub async fn me(AuthCtxExtractor(ctx): AuthCtxExtractor) -> impl IntoResponse {
    Json(json!({ "subject": ctx.subject }))
}
