use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::util::ServiceExt;
use uuid::Uuid;

use common_auth::{JwtVerifier, TokenConfig, TokenSigner, TokenSubject};
use order_api::app::build_router;
use order_api::config::AppConfig;
use order_api::AppState;

const TEST_SECRET: &str = "router-smoke-secret-0123456789abcdef";

/// State over a lazy pool: nothing here may touch the database, which is
/// exactly what these tests assert for the rejection paths.
fn test_state() -> anyhow::Result<AppState> {
    let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@127.0.0.1:1/orders")?;

    let config = AppConfig {
        database_url: "postgres://postgres@127.0.0.1:1/orders".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        jwt_secret: TEST_SECRET.to_string(),
        jwt_expiration_seconds: 3600,
    };
    let token_config = TokenConfig::new(&config.jwt_secret, config.jwt_expiration_seconds);

    Ok(AppState {
        db: pool,
        verifier: Arc::new(JwtVerifier::new(&token_config)),
        signer: Arc::new(TokenSigner::new(&token_config)),
        config: Arc::new(config),
    })
}

#[tokio::test]
async fn health_responds_ok() -> anyhow::Result<()> {
    let app = build_router(test_state()?);

    let response = app
        .oneshot(Request::builder().uri("/healthz").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await?.to_bytes();
    assert_eq!(body.as_ref(), b"ok");
    Ok(())
}

#[tokio::test]
async fn protected_routes_reject_missing_token() -> anyhow::Result<()> {
    let app = build_router(test_state()?);

    for (method, uri) in [
        ("GET", "/order"),
        ("POST", "/order"),
        ("GET", "/user/detalhe"),
        ("GET", "/category"),
    ] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())?,
            )
            .await?;
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{method} {uri} without a token"
        );
    }
    Ok(())
}

#[tokio::test]
async fn protected_routes_reject_garbage_token() -> anyhow::Result<()> {
    let app = build_router(test_state()?);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/order")
                .header("Authorization", "Bearer not.a.token")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = response.into_body().collect().await?.to_bytes();
    let json: Value = serde_json::from_slice(&body)?;
    assert_eq!(json["code"], json!("AUTH_TOKEN"));
    Ok(())
}

#[tokio::test]
async fn token_signed_with_other_secret_is_rejected() -> anyhow::Result<()> {
    let app = build_router(test_state()?);

    let foreign = TokenSigner::new(&TokenConfig::new("some-entirely-different-secret!!", 3600));
    let issued = foreign.issue(&TokenSubject {
        user_id: Uuid::new_v4(),
        username: "intruder".to_string(),
    })?;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/order")
                .header("Authorization", format!("Bearer {}", issued.token))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn registration_validates_before_touching_storage() -> anyhow::Result<()> {
    let app = build_router(test_state()?);

    // Password above the 10-character bound; the lazy pool guarantees the
    // request never reached the database.
    let body = json!({
        "name": "Joana",
        "email": "joana@example.com",
        "password": "far-too-long-password"
    });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/user")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response
            .headers()
            .get("X-Error-Code")
            .and_then(|v| v.to_str().ok()),
        Some("validation")
    );
    Ok(())
}

#[tokio::test]
async fn login_rejects_malformed_email() -> anyhow::Result<()> {
    let app = build_router(test_state()?);

    let body = json!({ "email": "not-an-email", "password": "secret" });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/login")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn order_routes_reject_non_uuid_ids() -> anyhow::Result<()> {
    let app = build_router(test_state()?);

    let valid = TokenSigner::new(&TokenConfig::new(TEST_SECRET, 3600));
    let issued = valid.issue(&TokenSubject {
        user_id: Uuid::new_v4(),
        username: "joana".to_string(),
    })?;

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/order/not-a-uuid")
                .header("Authorization", format!("Bearer {}", issued.token))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
