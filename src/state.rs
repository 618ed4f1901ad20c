use crate::config::Config;
use crate::services::auth::TokenService;

/// Shared, read-only application context. Clone is cheap; nothing in here
/// mutates after startup.
#[derive(Clone, Debug)]
pub struct AppState {
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            tokens: TokenService::new(config.jwt_secret.as_bytes(), config.jwt_ttl_millis),
        }
    }
}
