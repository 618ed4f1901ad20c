//! Black-box tests for the authentication gate.
//!
//! Drives the fully assembled router in-process with `tower::ServiceExt`,
//! checking the public-route predicate, identity propagation, and the
//! kind→401 mapping at the HTTP boundary.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use tower::ServiceExt;

use auth_gate::app::build_router;
use auth_gate::config::{AppEnv, Config};
use auth_gate::services::auth::Claims;
use auth_gate::state::AppState;

const SECRET: &str = "integration-test-secret-of-32-bytes!";

fn test_config() -> Config {
    Config {
        addr: "0.0.0.0:0".parse().unwrap(),
        app_env: AppEnv::Development,
        cors_allowed_origins: Vec::new(),
        jwt_secret: SECRET.to_string(),
        jwt_ttl_millis: 60_000,
    }
}

fn test_app() -> (Router, AppState) {
    let config = test_config();
    let state = AppState::new(&config);
    (build_router(state.clone(), &config), state)
}

async fn send(app: Router, path: &str, bearer: Option<&str>) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().uri(path);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let response = app
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn error_code(body: &serde_json::Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}

/// Sign arbitrary claims with the app's secret, outside the service.
fn sign(claims: &Claims, secret: &str) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[tokio::test]
async fn health_check_is_reachable_without_credentials() {
    let (app, _) = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/health-check")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn swagger_ui_prefix_is_never_challenged() {
    let (app, _) = test_app();
    let (status, _) = send(app, "/api/v1/swagger-ui/index.html", None).await;
    // No handler is mounted there; the point is that the gate lets it
    // through to the router instead of rejecting with 401.
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn protected_path_without_header_rejects_token_not_found() {
    let (app, _) = test_app();
    let (status, body) = send(app, "/api/v1/private-route", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "TOKEN_NOT_FOUND");
}

#[tokio::test]
async fn non_bearer_scheme_rejects_token_not_found() {
    let (app, _) = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/me")
                .header(header::AUTHORIZATION, "Basic xyz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error_code(&json), "TOKEN_NOT_FOUND");
}

#[tokio::test]
async fn valid_token_reaches_handler_with_identity() {
    let (app, state) = test_app();
    let token = state.tokens.generate_token("user123").unwrap();

    let (status, body) = send(app, "/api/v1/me", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subject"], "user123");
}

#[tokio::test]
async fn empty_subject_propagates_as_null_identity() {
    let (app, state) = test_app();
    let token = state.tokens.generate_token("").unwrap();

    let (status, body) = send(app, "/api/v1/me", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["subject"].is_null());
}

#[tokio::test]
async fn foreign_key_rejects_authentication_error() {
    let (app, _) = test_app();
    let now = Utc::now().timestamp() as u64;
    let token = sign(
        &Claims {
            sub: Some("user123".to_string()),
            iat: now,
            exp: now + 3600,
        },
        "a-different-signing-secret-32-bytes!",
    );

    let (status, body) = send(app, "/api/v1/me", Some(&token)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "AUTHENTICATION_ERROR");
}

#[tokio::test]
async fn expired_token_rejects_token_expired() {
    let (app, _) = test_app();
    let now = Utc::now().timestamp() as u64;
    let token = sign(
        &Claims {
            sub: Some("user123".to_string()),
            iat: now - 7200,
            exp: now - 3600,
        },
        SECRET,
    );

    let (status, body) = send(app, "/api/v1/me", Some(&token)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "TOKEN_EXPIRED");
}

#[tokio::test]
async fn garbage_token_rejects_token_malformed() {
    let (app, _) = test_app();
    let (status, body) = send(app, "/api/v1/me", Some("not-a-jwt")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "TOKEN_MALFORMED");
}

#[tokio::test]
async fn alg_mismatch_rejects_token_unsupported() {
    let (app, _) = test_app();
    let now = Utc::now().timestamp() as u64;
    let token = jsonwebtoken::encode(
        &Header::new(Algorithm::HS384),
        &Claims {
            sub: Some("user123".to_string()),
            iat: now,
            exp: now + 3600,
        },
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    let (status, body) = send(app, "/api/v1/me", Some(&token)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "TOKEN_UNSUPPORTED");
}

#[tokio::test]
async fn empty_bearer_value_rejects_illegal_argument() {
    let (app, _) = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/me")
                .header(header::AUTHORIZATION, "Bearer ")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error_code(&json), "TOKEN_ILLEGAL_ARGUMENT");
}
