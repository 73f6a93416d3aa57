//! Bearer-token extractors.
//!
//! Login endpoints hand out signed tokens; protected handlers take one of
//! these extractors to require a valid `Authorization: Bearer <token>`.

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use recipe_box_core::AdminId;

use crate::error::AppError;
use crate::services::auth::{AuthError, Claims};
use crate::state::AppState;

/// Extractor that requires a valid user or admin token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(claims): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", claims.sub)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAuth(pub Claims);

/// Extractor that requires a valid admin token.
///
/// A valid user token is rejected with 403 rather than 401. As
/// `Option<RequireAdmin>` it yields `None` when no bearer token is sent, but
/// a token that is sent must still be a valid admin token.
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin(pub AdminId);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthError::InvalidToken)?;
        let claims = state.tokens().verify(token)?;

        tracing::Span::current().record("subject", claims.sub);

        Ok(Self(claims))
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(claims) = RequireAuth::from_request_parts(parts, state).await?;

        claims
            .admin_id()
            .map(Self)
            .ok_or_else(|| AppError::Forbidden("Admin access required".to_owned()))
    }
}

impl OptionalFromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        if bearer_token(parts).is_none() {
            return Ok(None);
        }

        <Self as FromRequestParts<AppState>>::from_request_parts(parts, state)
            .await
            .map(Some)
    }
}

/// The token from an `Authorization: Bearer` header, if there is one.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() {
        Some(token.trim())
    } else {
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&parts_with(Some("Bearer abc.def"))), Some("abc.def"));
        assert_eq!(bearer_token(&parts_with(Some("bearer abc.def"))), Some("abc.def"));
        assert_eq!(bearer_token(&parts_with(Some("Basic dXNlcjpwdw=="))), None);
        assert_eq!(bearer_token(&parts_with(Some("Bearer "))), None);
        assert_eq!(bearer_token(&parts_with(Some("abc.def"))), None);
        assert_eq!(bearer_token(&parts_with(None)), None);
    }
}
