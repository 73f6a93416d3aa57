//! Admin collection routes.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use recipe_box_core::Email;

use super::{required, required_secret};
use crate::error::{AppError, Result};
use crate::extract::JsonBody;
use crate::middleware::RequireAdmin;
use crate::models::Admin;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// List all admins. Admin only; hashes are never part of an `Admin`.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<Vec<Admin>>> {
    let admins = state.store().list_admins().await?;
    Ok(Json(admins))
}

#[derive(Debug, Deserialize)]
pub struct RegisterAdminRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterAdminResponse {
    pub message: &'static str,
    pub admin: Admin,
}

/// Register a new admin.
///
/// Anyone may register the first admin. Once one exists the caller must
/// present an admin token.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    caller: Option<RequireAdmin>,
    JsonBody(body): JsonBody<RegisterAdminRequest>,
) -> Result<(StatusCode, Json<RegisterAdminResponse>)> {
    if caller.is_none() && state.store().any_admin().await? {
        tracing::warn!("Anonymous admin registration refused");
        return Err(AuthError::InvalidToken.into());
    }

    let (Some(name), Some(email), Some(password)) = (
        required(body.name),
        required(body.email),
        required_secret(body.password),
    ) else {
        return Err(AppError::BadRequest("All fields are required!".to_owned()));
    };

    let email = Email::parse(&email)
        .map_err(|_| AppError::BadRequest("Invalid email address".to_owned()))?;

    let admin = AuthService::new(state.store())
        .register_admin(&name, email, &password)
        .await?;

    tracing::info!(
        admin_id = %admin.id,
        registered_by = caller.map(|RequireAdmin(id)| id.as_i32()),
        "Admin registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(RegisterAdminResponse {
            message: "Registration successful!",
            admin,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AdminLoginResponse {
    pub message: &'static str,
    pub admin: Admin,
    pub token: String,
}

/// Log an admin in and issue an admin token.
///
/// Missing fields, unknown email and wrong password all give the same 401.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<AdminLoginRequest>,
) -> Result<Json<AdminLoginResponse>> {
    let (Some(email), Some(password)) = (required(body.email), required_secret(body.password))
    else {
        return Err(AuthError::InvalidCredentials.into());
    };

    let admin = AuthService::new(state.store())
        .login_admin(&email, &password)
        .await?;

    let token = state.tokens().issue_for_admin(admin.id)?;

    tracing::info!(admin_id = %admin.id, "Admin logged in");

    Ok(Json(AdminLoginResponse {
        message: "Login successful!",
        admin,
        token,
    }))
}
