use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::v1::handlers::{health::health_check, me::me};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health-check", get(health_check))
        .route("/me", get(me))
}
