//! Request extractors.

use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` with rejections reported as a JSON `{"message": ...}` body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);
