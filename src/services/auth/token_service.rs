//! HMAC-signed bearer token issuance and verification.
//!
//! Stateless: a token's validity is decided solely by its signature and
//! expiry at verification time. Nothing is stored server-side.

use axum::http::{HeaderMap, header};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Typed verification failure, one kind per failure.
///
/// Classification follows the library's own pipeline order: structure and
/// signature are checked before `exp`, so a token that is both malformed and
/// expired reports `TokenMalformed`. Every kind maps to HTTP 401 at the
/// boundary.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("bearer token not found")]
    TokenNotFound,

    #[error("token expired: {0}")]
    TokenExpired(String),

    #[error("token malformed: {0}")]
    TokenMalformed(String),

    #[error("token unsupported: {0}")]
    TokenUnsupported(String),

    #[error("token illegal argument: {0}")]
    TokenIllegalArgument(String),

    #[error("authentication error: {0}")]
    Authentication(String),
}

impl AuthError {
    /// Stable machine-readable code for the HTTP error body.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TokenNotFound => "TOKEN_NOT_FOUND",
            Self::TokenExpired(_) => "TOKEN_EXPIRED",
            Self::TokenMalformed(_) => "TOKEN_MALFORMED",
            Self::TokenUnsupported(_) => "TOKEN_UNSUPPORTED",
            Self::TokenIllegalArgument(_) => "TOKEN_ILLEGAL_ARGUMENT",
            Self::Authentication(_) => "AUTHENTICATION_ERROR",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        let detail = e.to_string();
        match e.kind() {
            ErrorKind::ExpiredSignature => Self::TokenExpired(detail),
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_)
            | ErrorKind::MissingRequiredClaim(_) => Self::TokenMalformed(detail),
            ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::MissingAlgorithm => Self::TokenUnsupported(detail),
            // Signature mismatch and everything else the library can raise.
            _ => Self::Authentication(detail),
        }
    }
}

/// Registered claims carried by an issued token.
///
/// `sub` is optional: an empty subject at issuance is serialized as an
/// *absent* claim and decodes back as `None`. Callers treat that as a null
/// identifier, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    pub iat: u64,
    pub exp: u64,
}

/// Issues and verifies HMAC-SHA256 bearer tokens.
///
/// Built once from `Config` at startup and shared read-only through
/// `AppState`; safe for unsynchronized concurrent use.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_millis: u64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenService")
            .field("ttl_millis", &self.ttl_millis)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &[u8], ttl_millis: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // The expiry contract is exact: a token is invalid from the instant
        // its exp passes, so no clock-skew leeway.
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl_millis,
        }
    }

    pub fn ttl_millis(&self) -> u64 {
        self.ttl_millis
    }

    /// Issue a signed token for `subject` with `exp = now + ttl`.
    ///
    /// An empty subject is allowed and round-trips as an absent claim.
    pub fn generate_token(&self, subject: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let expires_at = now + Duration::milliseconds(self.ttl_millis as i64);

        let claims = Claims {
            sub: (!subject.is_empty()).then(|| subject.to_string()),
            iat: now.timestamp() as u64,
            exp: expires_at.timestamp() as u64,
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(AuthError::from)
    }

    /// Pull the bearer token out of the `Authorization` header.
    ///
    /// The prefix match is exact: `"Bearer "` (case-sensitive, single
    /// space). A bare `"Bearer"`, another scheme, or a missing/unreadable
    /// header all yield `None`.
    pub fn extract_token(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|t| t.to_string())
    }

    /// Verify signature and expiry. Invalid conditions are typed failures,
    /// never a boolean false.
    pub fn validate_token(&self, token: &str) -> Result<(), AuthError> {
        self.decode(token).map(|_| ())
    }

    /// Verify, then return the subject claim (`None` when the token was
    /// issued with an empty subject).
    pub fn subject_of(&self, token: &str) -> Result<Option<String>, AuthError> {
        self.decode(token).map(|claims| claims.sub)
    }

    fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        if token.trim().is_empty() {
            return Err(AuthError::TokenIllegalArgument(
                "token string is null or empty".to_string(),
            ));
        }

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;

        // The library only rejects once `exp < now`; the contract here is
        // on-or-after, so the equality instant must fail too.
        let now = Utc::now().timestamp() as u64;
        if now >= data.claims.exp {
            return Err(AuthError::TokenExpired(format!(
                "token expired at {}",
                data.claims.exp
            )));
        }

        Ok(data.claims)
    }
}
