mod common;

use anyhow::Result;
use axum::http::StatusCode;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let app = common::test_app();

    let (status, body) = app.get("/health").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn root_lists_operations() -> Result<()> {
    let app = common::test_app();

    let (status, body) = app.get("/").await?;

    assert_eq!(status, StatusCode::OK);
    let endpoints = body["data"]["endpoints"].as_array().cloned().unwrap_or_default();
    assert_eq!(endpoints.len(), 8);
    assert!(endpoints
        .iter()
        .any(|e| e["operation"] == "updateHeroSection" && e["requiresAuth"] == true));
    assert!(endpoints
        .iter()
        .any(|e| e["operation"] == "login" && e["requiresAuth"] == false));
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_not_found() -> Result<()> {
    let app = common::test_app();

    let (status, _) = app.get("/api/sections/unknown").await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
