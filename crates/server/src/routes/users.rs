//! User collection routes.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use recipe_box_core::{Email, UserId};

use super::{required, required_secret};
use crate::error::{AppError, FieldError, Result};
use crate::extract::JsonBody;
use crate::middleware::RequireAuth;
use crate::models::User;
use crate::services::auth::{AuthError, AuthService, Role};
use crate::state::AppState;

/// Listing envelope shared by the collection endpoints.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub status: &'static str,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub const fn ok(data: Vec<T>) -> Self {
        Self { status: "200", data }
    }
}

// ============================================================================
// List / register
// ============================================================================

/// List all users. Password hashes are never part of a `User`.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<ListResponse<User>>> {
    let users = state.store().list_users().await?;
    Ok(Json(ListResponse::ok(users)))
}

/// Registration form.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub data: bool,
    pub message: &'static str,
}

/// Register a new user.
///
/// Every failing field is reported, not just the first.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreateUserResponse>)> {
    let (username, email, password) = validate_new_user(body)?;

    let user = AuthService::new(state.store())
        .register_user(&username, email, &password)
        .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            data: true,
            message: "User registered successfully",
        }),
    ))
}

fn validate_new_user(body: CreateUserRequest) -> Result<(String, Email, String)> {
    let mut errors = Vec::new();

    let username = required(body.username);
    if username.is_none() {
        errors.push(FieldError::body("username", "Username is required"));
    }

    let email = match required(body.email) {
        None => {
            errors.push(FieldError::body("email", "Email is required"));
            None
        }
        Some(raw) => match Email::parse(&raw) {
            Ok(email) => Some(email),
            Err(_) => {
                errors.push(FieldError::body("email", "Invalid email address"));
                None
            }
        },
    };

    let password = required_secret(body.password);
    if password.is_none() {
        errors.push(FieldError::body("password", "Password is required"));
    }

    match (username, email, password) {
        (Some(username), Some(email), Some(password)) => Ok((username, email, password)),
        _ => Err(AppError::Validation(errors)),
    }
}

// ============================================================================
// Login
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
    pub user: User,
}

/// Log a user in and issue a session token.
///
/// Unknown email and wrong password give the same response.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let (Some(email), Some(password)) = (required(body.email), required_secret(body.password))
    else {
        return Err(AppError::BadRequest(
            "Email and password are required".to_owned(),
        ));
    };

    let user = AuthService::new(state.store())
        .login_user(&email, &password)
        .await
        .map_err(|e| match e {
            AuthError::InvalidCredentials => {
                AppError::BadRequest("Invalid email or password".to_owned())
            }
            other => AppError::Auth(other),
        })?;

    let token = state.tokens().issue_for_user(user.id)?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        message: "Login successful",
        token,
        user,
    }))
}

// ============================================================================
// Delete
// ============================================================================

#[derive(Debug, Serialize)]
pub struct DeleteUserResponse {
    pub message: &'static str,
    pub data: User,
}

/// Delete a user. Users may delete themselves; admins may delete anyone.
#[instrument(skip(state, claims))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<DeleteUserResponse>> {
    let not_found = || AppError::NotFound("User not found".to_owned());
    let id: UserId = id.parse().map_err(|_| not_found())?;

    if claims.role != Role::Admin && claims.user_id() != Some(id) {
        return Err(AppError::Forbidden(
            "Not allowed to delete this user".to_owned(),
        ));
    }

    let user = state.store().delete_user(id).await?.ok_or_else(not_found)?;

    tracing::info!(user_id = %user.id, by = ?claims.role, "User deleted");

    Ok(Json(DeleteUserResponse {
        message: "User deleted successfully",
        data: user,
    }))
}
