//! Integration tests for Recipe Box.
//!
//! The tests drive the real router, middleware included, in-process with
//! `tower::ServiceExt::oneshot` against the in-memory store. No database or
//! network is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p recipe-box-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `users` - registration, login, deletion and its permission checks
//! - `recipes` - the add/list/delete lifecycle
//! - `admins` - registration, login and the admin listing
//! - `platform` - health checks, CORS, body limits, request IDs

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

use recipe_box_core::{Email, RecipeId, UserId};
use recipe_box_server::build_router;
use recipe_box_server::config::{DEFAULT_MAX_BODY_BYTES, LogFormat, ServerConfig, Storage};
use recipe_box_server::db::{
    AdminStore, MemoryStore, RecipeStore, RepositoryError, Store, UserStore,
};
use recipe_box_server::models::{Admin, NewAdmin, NewRecipe, NewUser, Recipe, User};
use recipe_box_server::state::AppState;

/// Origin the test router allows.
pub const TEST_ORIGIN: &str = "http://localhost:3001";

/// A router over a fresh in-memory store.
pub struct TestContext {
    pub app: Router,
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub text: String,
    /// Parsed body, or `Value::Null` when the body is not JSON.
    pub json: Value,
}

/// Test configuration with a fixed signing secret.
#[must_use]
pub fn test_config() -> ServerConfig {
    ServerConfig {
        storage: Storage::Memory,
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        allowed_origin: TEST_ORIGIN.to_owned(),
        max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        token_secret: SecretString::from("Xq7-vB2k9ZrT4mW8nLp3sYd6hF1jC5gA"),
        token_ttl_hours: 1,
        log_format: LogFormat::Pretty,
        sentry_dsn: None,
        sentry_environment: None,
    }
}

impl TestContext {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    #[must_use]
    pub fn with_config(config: ServerConfig) -> Self {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    #[must_use]
    pub fn with_store(config: ServerConfig, store: Arc<dyn Store>) -> Self {
        let state = AppState::new(config, store);
        let app = build_router(state).unwrap();
        Self { app }
    }

    /// Send a request and buffer the response.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            text,
            json,
        }
    }

    /// Send a request with an optional JSON body and bearer token.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        };
        self.send(request.unwrap()).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, None, token).await
    }

    pub async fn post(&self, uri: &str, body: &Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body), None).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::DELETE, uri, None, token).await
    }

    /// Register a user, log them in, and return `(id, token)`.
    pub async fn user_session(&self, username: &str, email: &str, password: &str) -> (i64, String) {
        let created = self
            .post(
                "/adduser",
                &json!({ "username": username, "email": email, "password": password }),
            )
            .await;
        assert_eq!(created.status, StatusCode::CREATED, "{}", created.text);

        let login = self
            .post("/login", &json!({ "email": email, "password": password }))
            .await;
        assert_eq!(login.status, StatusCode::OK, "{}", login.text);

        (
            login.json["user"]["_id"].as_i64().unwrap(),
            login.json["token"].as_str().unwrap().to_owned(),
        )
    }

    /// Register the first admin anonymously, log them in, and return the
    /// admin token. Later admins need that token to register.
    pub async fn admin_token(&self, email: &str, password: &str) -> String {
        let created = self
            .post(
                "/admin/register",
                &json!({ "name": "Admin", "email": email, "password": password }),
            )
            .await;
        assert_eq!(created.status, StatusCode::CREATED, "{}", created.text);

        let login = self
            .post("/admin/login", &json!({ "email": email, "password": password }))
            .await;
        assert_eq!(login.status, StatusCode::OK, "{}", login.text);

        login.json["token"].as_str().unwrap().to_owned()
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unavailable Store
// =============================================================================

/// A store whose backend is down: every call fails.
#[derive(Debug, Default)]
pub struct UnavailableStore;

fn unavailable<T>() -> Result<T, RepositoryError> {
    Err(RepositoryError::DataCorruption("connection refused by 10.0.0.7:5432".to_owned()))
}

#[async_trait]
impl UserStore for UnavailableStore {
    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        unavailable()
    }

    async fn create_user(&self, _user: NewUser) -> Result<User, RepositoryError> {
        unavailable()
    }

    async fn get_user_password_hash(
        &self,
        _email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        unavailable()
    }

    async fn delete_user(&self, _id: UserId) -> Result<Option<User>, RepositoryError> {
        unavailable()
    }
}

#[async_trait]
impl RecipeStore for UnavailableStore {
    async fn list_recipes(&self) -> Result<Vec<Recipe>, RepositoryError> {
        unavailable()
    }

    async fn create_recipe(&self, _recipe: NewRecipe) -> Result<Recipe, RepositoryError> {
        unavailable()
    }

    async fn delete_recipe(&self, _id: RecipeId) -> Result<Option<Recipe>, RepositoryError> {
        unavailable()
    }
}

#[async_trait]
impl AdminStore for UnavailableStore {
    async fn list_admins(&self) -> Result<Vec<Admin>, RepositoryError> {
        unavailable()
    }

    async fn get_admin_by_email(&self, _email: &Email) -> Result<Option<Admin>, RepositoryError> {
        unavailable()
    }

    async fn any_admin(&self) -> Result<bool, RepositoryError> {
        unavailable()
    }

    async fn create_admin(&self, _admin: NewAdmin) -> Result<Admin, RepositoryError> {
        unavailable()
    }

    async fn get_admin_password_hash(
        &self,
        _email: &Email,
    ) -> Result<Option<(Admin, String)>, RepositoryError> {
        unavailable()
    }
}

#[async_trait]
impl Store for UnavailableStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        unavailable()
    }
}
