//! OpenAPI document for the accounts API.

use utoipa::OpenApi;

use crate::handlers::{auth, availability, health, meta, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Accounts Engine API",
        description = "User account REST backend: registration, authentication, \
                       password reset via security question, profile management, \
                       event-based role lookup and uniqueness validation.",
    ),
    paths(
        health::health_check,
        health::version_info,
        auth::register,
        auth::login,
        auth::whoami,
        auth::validate_token,
        auth::security_question,
        auth::security_answer,
        users::list_users,
        users::get_user_by_id,
        users::user_role,
        users::research_interests,
        users::query_users,
        users::update_user,
        users::update_password,
        users::delete_user,
        availability::unique_username,
        availability::unique_email,
        meta::security_questions,
        meta::research_interests,
    ),
    components(schemas(
        account_core::NewUser,
        account_core::PublicUser,
        account_core::Role,
        account_core::EventRole,
        account_core::SearchAttribute,
        account_core::UserUpdate,
        account_core::SecurityQuestionInfo,
        auth::TokenResponse,
        auth::LoginRequest,
        auth::SecurityQuestionRequest,
        auth::SecurityAnswerRequest,
        users::RoleResponse,
        users::QueryUsersRequest,
        users::UpdatePasswordRequest,
        users::DeleteUserRequest,
        health::HealthResponse,
        health::VersionResponse,
        crate::error::ApiErrorBody,
    )),
    tags(
        (name = "health", description = "Liveness and version"),
        (name = "auth", description = "Registration, login and tokens"),
        (name = "users", description = "User management"),
        (name = "validation", description = "Uniqueness probes"),
        (name = "meta", description = "Predefined catalogues"),
    )
)]
pub struct ApiDoc;

/// The assembled OpenAPI document.
pub fn api_doc() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
