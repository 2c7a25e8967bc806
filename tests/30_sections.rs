mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::{json, Value};

use sections_api::sections::{default_content, SectionKind};

fn expected_defaults(kind: SectionKind) -> Value {
    default_content(kind)
        .iter()
        .map(|(field, value)| (field.to_string(), Value::String(value.to_string())))
        .collect::<serde_json::Map<String, Value>>()
        .into()
}

#[tokio::test]
async fn first_update_returns_defaults_for_every_kind() -> Result<()> {
    let app = common::test_app();
    let (user_id, token) = app.signed_in("alice", "wonderland").await?;

    for kind in SectionKind::ALL {
        let path = format!("/api/sections/{}", kind);
        let (status, body) = app
            .post(&path, json!({ "id": user_id, "active": "ignored on create" }), Some(&token))
            .await?;

        assert_eq!(status, StatusCode::OK, "{kind}");
        assert_eq!(body["data"]["userId"], user_id);
        for (field, value) in expected_defaults(kind).as_object().into_iter().flatten() {
            assert_eq!(&body["data"][field], value, "{kind}.{field}");
        }
        assert_eq!(app.store.section_count(kind), 1);
    }
    Ok(())
}

#[tokio::test]
async fn second_update_merges_only_non_empty_fields() -> Result<()> {
    let app = common::test_app();
    let (_, token) = app.signed_in("alice", "wonderland").await?;

    let (_, created) = app.post("/api/sections/hero", json!({}), Some(&token)).await?;
    assert_eq!(created["data"]["active"], "Split");

    let (status, updated) = app
        .post("/api/sections/hero", json!({ "active": "", "split": "X" }), Some(&token))
        .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["id"], created["data"]["id"]);
    assert_eq!(updated["data"]["active"], "Split");
    assert_eq!(updated["data"]["split"], "X");
    assert_eq!(updated["data"]["centered"], created["data"]["centered"]);
    assert_eq!(app.store.section_count(SectionKind::Hero), 1);
    Ok(())
}

#[tokio::test]
async fn string_user_id_matching_the_token_is_accepted() -> Result<()> {
    let app = common::test_app();
    let (user_id, token) = app.signed_in("alice", "wonderland").await?;

    let (status, body) = app
        .post("/api/sections/slider", json!({ "id": user_id.to_string() }), Some(&token))
        .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["userId"], user_id);
    Ok(())
}

#[tokio::test]
async fn token_cannot_update_another_users_sections() -> Result<()> {
    let app = common::test_app();
    let (_, alice_token) = app.signed_in("alice", "wonderland").await?;
    let (bob_id, bob_token) = app.signed_in("bob", "builder").await?;

    app.post("/api/sections/nav", json!({}), Some(&bob_token)).await?;

    let (status, body) = app
        .post("/api/sections/nav", json!({ "id": bob_id, "active": "Centered" }), Some(&alice_token))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    // Bob's section is untouched
    let (_, body) = app.post("/api/sections/nav", json!({}), Some(&bob_token)).await?;
    assert_eq!(body["data"]["active"], "Basic");
    assert_eq!(app.store.section_count(SectionKind::Nav), 1);
    Ok(())
}

#[tokio::test]
async fn valid_token_for_missing_user_is_not_found() -> Result<()> {
    use sections_api::auth::TokenIssuer;
    use sections_api::types::UserIdentity;

    let app = common::test_app();
    let token = TokenIssuer::new(&common::security())
        .issue(&UserIdentity::new(404, "ghost"))?
        .token;

    let (status, body) = app.post("/api/sections/footer", json!({}), Some(&token)).await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(app.store.section_count(SectionKind::Footer), 0);
    Ok(())
}

#[tokio::test]
async fn non_string_field_values_are_internal_errors() -> Result<()> {
    let app = common::test_app();
    let (_, token) = app.signed_in("alice", "wonderland").await?;

    let (status, _) = app
        .post("/api/sections/contact", json!({ "tile": { "nested": true } }), Some(&token))
        .await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(app.store.section_count(SectionKind::Contact), 0);
    Ok(())
}

#[tokio::test]
async fn null_field_keeps_stored_value() -> Result<()> {
    let app = common::test_app();
    let (user_id, token) = app.signed_in("alice", "wonderland").await?;

    let (_, created) = app.post("/api/sections/hero", json!({}), Some(&token)).await?;
    let (status, body) = app
        .post(
            "/api/sections/hero",
            json!({ "id": user_id, "split": null, "active": "Centered" }),
            Some(&token),
        )
        .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["split"], created["data"]["split"]);
    assert_eq!(body["data"]["active"], "Centered");
    Ok(())
}

#[tokio::test]
async fn unknown_keys_are_ignored_by_the_merge() -> Result<()> {
    let app = common::test_app();
    let (user_id, token) = app.signed_in("alice", "wonderland").await?;

    app.post("/api/sections/hero", json!({}), Some(&token)).await?;
    let (status, body) = app
        .post(
            "/api/sections/hero",
            json!({ "id": user_id, "version": 2, "split": "X" }),
            Some(&token),
        )
        .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["split"], "X");
    assert_eq!(body["data"]["active"], "Split");
    assert!(body["data"].get("version").is_none());
    Ok(())
}

#[tokio::test]
async fn sections_are_independent_per_kind() -> Result<()> {
    let app = common::test_app();
    let (_, token) = app.signed_in("alice", "wonderland").await?;

    app.post("/api/sections/detail", json!({}), Some(&token)).await?;
    let (_, detail) = app
        .post("/api/sections/detail", json!({ "active": "Split" }), Some(&token))
        .await?;
    let (_, contact) = app.post("/api/sections/contact", json!({}), Some(&token)).await?;

    assert_eq!(detail["data"]["active"], "Split");
    assert_eq!(contact["data"]["active"], "Centered");
    Ok(())
}
