//! Accounts Engine HTTP server
//!
//! The HTTP boundary over the user management core: it maps requests to
//! core operations and translates the core's tagged outcomes into status
//! codes and structured error payloads.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod validation;

// Re-export commonly used types
pub use error::{api_success, ApiError, ApiResponse};
pub use server::{AccountsServer, ServerConfig};

use axum::Router;
use tower_http::trace::TraceLayer;

/// Create the main application router with all routes and middleware.
pub fn create_app(server: AccountsServer) -> Router {
    routes::create_routes()
        .layer(TraceLayer::new_for_http())
        .layer(middleware::create_cors_layer())
        .with_state(server)
}
