//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP context)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (recorded on the span)
//! 4. CORS
//! 5. Body size limit
//! 6. Security headers
//!
//! Authentication is not a layer: protected handlers take [`RequireAuth`]
//! or [`RequireAdmin`].

pub mod auth;
pub mod request_id;
pub mod security_headers;

pub use auth::{RequireAdmin, RequireAuth};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
