//! Request middleware and extractors.

pub mod auth_context;

pub use auth_context::{AuthUser, BearerToken};

use tower_http::cors::{Any, CorsLayer};

/// Permissive CORS layer; route paths and browsers are the only consumers
/// of this API.
pub fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
