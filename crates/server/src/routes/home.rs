//! Root banner.

use axum::response::Html;

/// Display the API banner.
pub async fn index() -> Html<&'static str> {
    Html("<h1>Recipe Box API is running</h1>")
}
