mod common;

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    routing::post,
    Router,
};
use serde_json::json;
use tower::ServiceExt;

use sections_api::app::{operations, require_auth};
use sections_api::auth::{TokenIssuer, TokenValidator};
use sections_api::middleware::CallAuthorizer;
use sections_api::sections::SectionKind;
use sections_api::types::UserIdentity;

fn authorizer() -> CallAuthorizer {
    CallAuthorizer::new(Arc::new(TokenValidator::new(&common::security())))
}

/// A router whose only route counts how often its handler actually ran.
fn counting_router(path: &str, calls: Arc<AtomicUsize>) -> Router {
    let handler = post(move || {
        let calls = calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            "ok"
        }
    });

    Router::new().route(path, require_auth(handler, authorizer()))
}

fn request(path: &str, authorization: Option<String>) -> Result<Request<Body>> {
    let mut builder = Request::builder().method("POST").uri(path);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    Ok(builder.body(Body::empty())?)
}

#[tokio::test]
async fn missing_header_never_reaches_any_gated_operation() -> Result<()> {
    for op in operations().iter().filter(|op| op.requires_auth) {
        let calls = Arc::new(AtomicUsize::new(0));
        let router = counting_router(op.path, calls.clone());

        let response = router.oneshot(request(op.path, None)?).await?;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", op.name);
        assert_eq!(calls.load(Ordering::SeqCst), 0, "{} handler ran", op.name);
    }
    Ok(())
}

#[tokio::test]
async fn valid_bearer_token_invokes_operation_exactly_once() -> Result<()> {
    let token = TokenIssuer::new(&common::security())
        .issue(&UserIdentity::new(1, "alice"))?
        .token;

    for op in operations().iter().filter(|op| op.requires_auth) {
        let calls = Arc::new(AtomicUsize::new(0));
        let router = counting_router(op.path, calls.clone());

        let response = router
            .oneshot(request(op.path, Some(format!("Bearer {}", token)))?)
            .await?;

        assert_eq!(response.status(), StatusCode::OK, "{}", op.name);
        assert_eq!(calls.load(Ordering::SeqCst), 1, "{}", op.name);
    }
    Ok(())
}

#[tokio::test]
async fn rejected_tokens_never_reach_the_handler() -> Result<()> {
    let foreign = TokenIssuer::from_secret("a-completely-different-signing-key", Some(1))
        .issue(&UserIdentity::new(1, "alice"))?
        .token;
    let valid = TokenIssuer::new(&common::security())
        .issue(&UserIdentity::new(1, "alice"))?
        .token;

    let cases = [
        format!("Bearer {}", foreign),
        format!("bearer {}", valid),
        format!("Basic {}", valid),
        valid.clone(),
        "Bearer not-a-jwt".to_string(),
        "Bearer ".to_string(),
    ];

    for value in cases {
        let calls = Arc::new(AtomicUsize::new(0));
        let router = counting_router("/guarded", calls.clone());

        let response = router.oneshot(request("/guarded", Some(value.clone()))?).await?;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{value}");
        assert_eq!(calls.load(Ordering::SeqCst), 0, "{value}");
    }
    Ok(())
}

#[tokio::test]
async fn gated_operations_reject_without_touching_the_store() -> Result<()> {
    let app = common::test_app();

    for op in operations().iter().filter(|op| op.requires_auth) {
        let (status, body) = app.post(op.path, json!({ "id": 1, "active": "x" }), None).await?;

        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", op.name);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }

    for kind in SectionKind::ALL {
        assert_eq!(app.store.section_count(kind), 0);
    }
    Ok(())
}

#[tokio::test]
async fn expired_token_is_rejected() -> Result<()> {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let app = common::test_app();
    let (user_id, _) = app.signed_in("alice", "wonderland").await?;

    let now = chrono::Utc::now().timestamp();
    let claims = json!({
        "sub": "alice",
        "userName": "alice",
        "uid": user_id,
        "iat": now - 7200,
        "exp": now - 3600,
        "jti": uuid::Uuid::new_v4(),
    });
    let expired = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(common::TEST_SECRET.as_bytes()),
    )?;

    let (status, _) = app
        .post("/api/sections/hero", json!({}), Some(&expired))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.store.section_count(SectionKind::Hero), 0);
    Ok(())
}
