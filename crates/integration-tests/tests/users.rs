//! Integration tests for the user collection.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use recipe_box_integration_tests::TestContext;
use serde_json::json;

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_register_user() {
    let ctx = TestContext::new();

    let resp = ctx
        .post(
            "/adduser",
            &json!({ "username": "alice", "email": "alice@example.com", "password": "pw-alice" }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(
        resp.json,
        json!({ "data": true, "message": "User registered successfully" })
    );
}

#[tokio::test]
async fn test_register_reports_each_missing_field() {
    let ctx = TestContext::new();

    let resp = ctx.post("/adduser", &json!({ "email": "alice@example.com" })).await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.json,
        json!({
            "errors": [
                { "type": "field", "msg": "Username is required", "path": "username", "location": "body" },
                { "type": "field", "msg": "Password is required", "path": "password", "location": "body" }
            ]
        })
    );

    let users = ctx.get("/user", None).await;
    assert_eq!(users.json["data"], json!([]));
}

#[tokio::test]
async fn test_register_rejects_malformed_email() {
    let ctx = TestContext::new();

    let resp = ctx
        .post(
            "/adduser",
            &json!({ "username": "bob", "email": "bob at example.com", "password": "pw" }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json["errors"][0]["path"], "email");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let ctx = TestContext::new();

    let resp = ctx
        .send(
            axum::http::Request::post("/adduser")
                .header("content-type", "application/json")
                .body(axum::body::Body::from("{\"username\":"))
                .unwrap(),
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.json["message"].is_string());
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_list_users_hides_password_hashes() {
    let ctx = TestContext::new();
    ctx.user_session("alice", "alice@example.com", "pw-alice").await;

    let resp = ctx.get("/user", None).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json["status"], "200");
    let user = &resp.json["data"][0];
    assert_eq!(user["username"], "alice");
    assert_eq!(user["email"], "alice@example.com");
    assert!(user["_id"].is_i64());
    assert!(user["createdAt"].is_string());
    assert!(!resp.text.contains("password"));
    assert!(!resp.text.contains("argon2"));
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_success_returns_token_and_user() {
    let ctx = TestContext::new();
    let (id, token) = ctx
        .user_session("alice", "alice@example.com", "pw-alice")
        .await;

    assert!(id > 0);
    assert!(token.contains('.'));
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let ctx = TestContext::new();

    for body in [
        json!({ "email": "alice@example.com" }),
        json!({ "password": "pw" }),
        json!({ "email": "", "password": "" }),
    ] {
        let resp = ctx.post("/login", &body).await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
        assert_eq!(resp.json, json!({ "message": "Email and password are required" }));
    }
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let ctx = TestContext::new();
    ctx.user_session("alice", "alice@example.com", "pw-alice").await;

    let wrong_password = ctx
        .post("/login", &json!({ "email": "alice@example.com", "password": "nope" }))
        .await;
    let unknown_email = ctx
        .post("/login", &json!({ "email": "carol@example.com", "password": "pw-alice" }))
        .await;
    let malformed_email = ctx
        .post("/login", &json!({ "email": "carol", "password": "pw-alice" }))
        .await;

    for resp in [&wrong_password, &unknown_email, &malformed_email] {
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
        assert_eq!(resp.json, json!({ "message": "Invalid email or password" }));
    }
}

#[tokio::test]
async fn test_login_with_shared_email_uses_oldest_user() {
    let ctx = TestContext::new();
    let (first_id, _) = ctx
        .user_session("first", "shared@example.com", "pw-first")
        .await;
    let second = ctx
        .post(
            "/adduser",
            &json!({ "username": "second", "email": "shared@example.com", "password": "pw-2" }),
        )
        .await;
    assert_eq!(second.status, StatusCode::CREATED);

    let resp = ctx
        .post("/login", &json!({ "email": "shared@example.com", "password": "pw-first" }))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json["user"]["_id"], first_id);
    assert_eq!(resp.json["user"]["username"], "first");

    let resp = ctx
        .post("/login", &json!({ "email": "shared@example.com", "password": "pw-2" }))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json, json!({ "message": "Invalid email or password" }));
}

// ============================================================================
// Deletion
// ============================================================================

#[tokio::test]
async fn test_user_can_delete_self() {
    let ctx = TestContext::new();
    let (id, token) = ctx
        .user_session("alice", "alice@example.com", "pw-alice")
        .await;

    let resp = ctx.delete(&format!("/deleteuser/{id}"), Some(&token)).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json["message"], "User deleted successfully");
    assert_eq!(resp.json["data"]["_id"], id);

    let users = ctx.get("/user", None).await;
    assert_eq!(users.json["data"], json!([]));
}

#[tokio::test]
async fn test_user_cannot_delete_someone_else() {
    let ctx = TestContext::new();
    let (alice, _) = ctx
        .user_session("alice", "alice@example.com", "pw-alice")
        .await;
    let (_, bob_token) = ctx.user_session("bob", "bob@example.com", "pw-bob").await;

    let resp = ctx
        .delete(&format!("/deleteuser/{alice}"), Some(&bob_token))
        .await;

    assert_eq!(resp.status, StatusCode::FORBIDDEN);
    let users = ctx.get("/user", None).await;
    assert_eq!(users.json["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_admin_can_delete_any_user() {
    let ctx = TestContext::new();
    let (alice, _) = ctx
        .user_session("alice", "alice@example.com", "pw-alice")
        .await;
    let admin = ctx.admin_token("root@example.com", "pw-root").await;

    let resp = ctx.delete(&format!("/deleteuser/{alice}"), Some(&admin)).await;

    assert_eq!(resp.status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_requires_token() {
    let ctx = TestContext::new();
    let (alice, _) = ctx
        .user_session("alice", "alice@example.com", "pw-alice")
        .await;

    let missing = ctx.delete(&format!("/deleteuser/{alice}"), None).await;
    let forged = ctx
        .delete(&format!("/deleteuser/{alice}"), Some("e30.deadbeef"))
        .await;

    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_missing_user_is_not_found() {
    let ctx = TestContext::new();
    let admin = ctx.admin_token("root@example.com", "pw-root").await;
    ctx.user_session("alice", "alice@example.com", "pw-alice").await;

    for id in ["999", "0", "-1", "not-an-id"] {
        let resp = ctx.delete(&format!("/deleteuser/{id}"), Some(&admin)).await;
        assert_eq!(resp.status, StatusCode::NOT_FOUND, "id {id}");
        assert_eq!(resp.json, json!({ "message": "User not found" }));
    }

    let users = ctx.get("/user", None).await;
    assert_eq!(users.json["data"].as_array().unwrap().len(), 1);
}
