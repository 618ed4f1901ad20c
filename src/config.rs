use std::net::SocketAddr;
use std::str::FromStr;
use std::{env, fmt};

/// Minimum HMAC-SHA256 key length (bytes). Shorter secrets weaken the
/// signature below the algorithm's security level, so startup refuses them.
pub const MIN_SECRET_LEN: usize = 32;

/// Exact path exempt from authentication.
pub const HEALTH_CHECK_PATH: &str = "/api/v1/health-check";

/// Path prefix exempt from authentication (documentation UI).
pub const SWAGGER_UI_PREFIX: &str = "/api/v1/swagger-ui";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    /// Shared HMAC secret. Loaded once at startup, never logged.
    pub jwt_secret: String,
    /// Token time-to-live in milliseconds.
    pub jwt_ttl_millis: u64,
}

// Do not print the secret.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("jwt_ttl_millis", &self.jwt_ttl_millis)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Invalid("JWT_SECRET"));
        }

        let jwt_ttl_millis = env::var("JWT_TTL_MILLIS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3_600_000); // 1 hour

        Ok(Config {
            addr,
            app_env,
            cors_allowed_origins,
            jwt_secret,
            jwt_ttl_millis,
        })
    }
}
