pub mod paths;

use axum::{
    routing::{get, patch, post},
    Router,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    handlers::{auth, availability, health, meta, users},
    openapi,
    server::AccountsServer,
};

/// Create health check routes
pub fn health_routes() -> Router<AccountsServer> {
    Router::new()
        .route(paths::health::HEALTH, get(health::health_check))
        .route(paths::health::VERSION, get(health::version_info))
}

/// Create authentication routes
pub fn auth_routes() -> Router<AccountsServer> {
    Router::new()
        .route(paths::auth::REGISTER, post(auth::register))
        .route(paths::auth::LOGIN, post(auth::login))
        .route(paths::auth::TOKEN, get(auth::whoami))
        .route(paths::auth::VALIDATE, get(auth::validate_token))
        .route(paths::auth::SECURITY_QUESTION, post(auth::security_question))
        .route(paths::auth::SECURITY_ANSWER, post(auth::security_answer))
}

/// Create user management routes
pub fn user_routes() -> Router<AccountsServer> {
    Router::new()
        .route(paths::users::USERS, get(users::list_users))
        .route(paths::users::QUERY, post(users::query_users))
        .route(paths::users::DELETE, post(users::delete_user))
        .route(
            paths::users::USER_BY_ID,
            get(users::get_user_by_id).patch(users::update_user),
        )
        .route(paths::users::ROLE, get(users::user_role))
        .route(
            paths::users::RESEARCH_INTERESTS,
            get(users::research_interests),
        )
        .route(paths::users::PASSWORD, patch(users::update_password))
}

/// Create uniqueness validation routes
pub fn validation_routes() -> Router<AccountsServer> {
    Router::new()
        .route(paths::validation::USERNAME, get(availability::unique_username))
        .route(paths::validation::EMAIL, get(availability::unique_email))
}

/// Create catalogue routes
pub fn meta_routes() -> Router<AccountsServer> {
    Router::new()
        .route(paths::meta::SECURITY_QUESTIONS, get(meta::security_questions))
        .route(paths::meta::RESEARCH_INTERESTS, get(meta::research_interests))
}

/// Assemble every route group plus the OpenAPI UI.
pub fn create_routes() -> Router<AccountsServer> {
    Router::new()
        .merge(health_routes())
        .merge(auth_routes())
        .merge(user_routes())
        .merge(validation_routes())
        .merge(meta_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi::api_doc()))
}
