//! Integration tests for the admin collection.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use recipe_box_integration_tests::TestContext;
use serde_json::json;

#[tokio::test]
async fn test_register_admin() {
    let ctx = TestContext::new();

    let resp = ctx
        .post(
            "/admin/register",
            &json!({ "name": "Root", "email": "root@example.com", "password": "pw-root" }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.json["message"], "Registration successful!");
    assert_eq!(resp.json["admin"]["name"], "Root");
    assert_eq!(resp.json["admin"]["email"], "root@example.com");
    assert!(!resp.text.contains("password"));
}

#[tokio::test]
async fn test_register_admin_requires_fields() {
    let ctx = TestContext::new();

    let resp = ctx
        .post("/admin/register", &json!({ "name": "Root", "email": "root@example.com" }))
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json, json!({ "message": "All fields are required!" }));
}

#[tokio::test]
async fn test_register_admin_rejects_malformed_email() {
    let ctx = TestContext::new();

    let resp = ctx
        .post(
            "/admin/register",
            &json!({ "name": "Root", "email": "root.example.com", "password": "pw-root" }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json, json!({ "message": "Invalid email address" }));
}

#[tokio::test]
async fn test_later_admins_need_an_admin_token() {
    let ctx = TestContext::new();
    let root = ctx.admin_token("root@example.com", "pw-root").await;
    let (_, user) = ctx
        .user_session("alice", "alice@example.com", "pw-alice")
        .await;
    let second = json!({ "name": "Second", "email": "second@example.com", "password": "pw-2" });

    let anonymous = ctx.post("/admin/register", &second).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.json, json!({ "message": "Invalid or missing token" }));

    let forged = ctx
        .request(Method::POST, "/admin/register", Some(&second), Some("not.a-token"))
        .await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);

    let as_user = ctx
        .request(Method::POST, "/admin/register", Some(&second), Some(&user))
        .await;
    assert_eq!(as_user.status, StatusCode::FORBIDDEN);

    let login = ctx
        .post("/admin/login", &json!({ "email": "second@example.com", "password": "pw-2" }))
        .await;
    assert_eq!(login.status, StatusCode::UNAUTHORIZED);

    let as_admin = ctx
        .request(Method::POST, "/admin/register", Some(&second), Some(&root))
        .await;
    assert_eq!(as_admin.status, StatusCode::CREATED);
    assert_eq!(as_admin.json["admin"]["email"], "second@example.com");

    let admins = ctx.get("/admin", Some(&root)).await;
    assert_eq!(admins.json.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_anonymous_caller_cannot_gain_delete_rights() {
    let ctx = TestContext::new();
    ctx.admin_token("root@example.com", "pw-root").await;
    let (alice, _) = ctx
        .user_session("alice", "alice@example.com", "pw-alice")
        .await;

    let resp = ctx
        .post(
            "/admin/register",
            &json!({ "name": "Mallory", "email": "mallory@example.com", "password": "x" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);

    let login = ctx
        .post("/admin/login", &json!({ "email": "mallory@example.com", "password": "x" }))
        .await;
    assert_eq!(login.status, StatusCode::UNAUTHORIZED);
    assert!(login.json["token"].is_null());

    let users = ctx.get("/user", None).await;
    assert_eq!(users.json["data"][0]["_id"], alice);
}

#[tokio::test]
async fn test_duplicate_admin_email_rejected() {
    let ctx = TestContext::new();
    let token = ctx.admin_token("root@example.com", "pw-root").await;

    let resp = ctx
        .request(
            Method::POST,
            "/admin/register",
            Some(&json!({ "name": "Again", "email": "root@example.com", "password": "other" })),
            Some(&token),
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json, json!({ "message": "Email already exists!" }));

    let admins = ctx.get("/admin", Some(&token)).await;
    assert_eq!(admins.json.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_admin_login_failures_are_indistinguishable() {
    let ctx = TestContext::new();
    ctx.admin_token("root@example.com", "pw-root").await;

    for body in [
        json!({ "email": "root@example.com", "password": "wrong" }),
        json!({ "email": "nobody@example.com", "password": "pw-root" }),
        json!({ "email": "root@example.com" }),
    ] {
        let resp = ctx.post("/admin/login", &body).await;
        assert_eq!(resp.status, StatusCode::UNAUTHORIZED, "{body}");
        assert_eq!(resp.json, json!({ "message": "Invalid credentials!" }));
    }
}

#[tokio::test]
async fn test_admin_login_returns_admin_and_token() {
    let ctx = TestContext::new();
    ctx.admin_token("root@example.com", "pw-root").await;

    let resp = ctx
        .post(
            "/admin/login",
            &json!({ "email": "root@example.com", "password": "pw-root" }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json["message"], "Login successful!");
    assert_eq!(resp.json["admin"]["email"], "root@example.com");
    assert!(resp.json["token"].is_string());
}

#[tokio::test]
async fn test_admin_listing_requires_admin_and_hides_hashes() {
    let ctx = TestContext::new();
    let admin = ctx.admin_token("root@example.com", "pw-root").await;
    let (_, user) = ctx
        .user_session("alice", "alice@example.com", "pw-alice")
        .await;

    assert_eq!(ctx.get("/admin", None).await.status, StatusCode::UNAUTHORIZED);
    assert_eq!(ctx.get("/admin", Some(&user)).await.status, StatusCode::FORBIDDEN);

    let resp = ctx.get("/admin", Some(&admin)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json[0]["email"], "root@example.com");
    assert!(!resp.text.contains("password"));
    assert!(!resp.text.contains("argon2"));
}
