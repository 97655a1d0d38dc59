//! Registration, login, token verification and the security-question
//! password-reset flow.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{api_success, ApiError, ApiResponse};
use crate::middleware::{AuthUser, BearerToken};
use crate::server::AccountsServer;
use crate::validation::RequestValidation;
use crate::{validate_email, validate_field, validate_length, validate_required};
use account_core::{NewUser, PublicUser, SecurityQuestionInfo};

/// Bearer token issued after registration, login, a successful security
/// answer, or a profile update.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// Signed bearer token embedding the user identifier.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOiIuLi4ifQ.sig")]
    pub token: String,
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Username to authenticate as
    #[schema(example = "alice")]
    pub username: String,
    /// User password
    pub password: String,
}

impl RequestValidation for LoginRequest {
    fn validate(&self) -> Result<(), ApiError> {
        validate_required!(self.username, "Username is required");
        validate_required!(self.password, "Password is required");
        Ok(())
    }
}

impl RequestValidation for NewUser {
    fn validate(&self) -> Result<(), ApiError> {
        validate_required!(self.username, "Username is required");
        validate_length!(self.username, 1, 200, "Username must be at most 200 characters");
        validate_required!(self.email, "Email is required");
        validate_email!(self.email, "Invalid email format");
        validate_required!(self.password, "Password is required");
        validate_required!(self.firstname, "Firstname is required");
        validate_required!(self.lastname, "Lastname is required");
        validate_required!(self.field_of_activity, "Field of activity is required");
        validate_required!(self.security_question, "Security question is required");
        validate_required!(self.security_answer, "Security answer is required");
        Ok(())
    }
}

/// Email lookup for the password-reset flow.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SecurityQuestionRequest {
    #[schema(example = "a@x.com")]
    pub email: String,
}

/// Security answer check for the password-reset flow.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecurityAnswerRequest {
    /// Identifier returned by the security-question lookup.
    pub id: Uuid,
    /// Answer to compare; case and surrounding whitespace are ignored.
    pub security_answer: String,
}

/// Register a new user and issue a token for it.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = NewUser,
    responses(
        (status = 200, description = "User registered, token issued", body = TokenResponse),
        (status = 400, description = "Missing fields or username/email already taken")
    )
)]
pub async fn register(
    State(server): State<AccountsServer>,
    Json(request): Json<NewUser>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    request.validate()?;
    let user = server.service.create_user(request).await?;
    let token = server.service.issue_token(user.id)?;
    Ok(Json(api_success(TokenResponse { token })))
}

/// Log a user in by username and password.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated, token issued", body = TokenResponse),
        (status = 401, description = "Wrong password"),
        (status = 404, description = "No user with this username")
    )
)]
pub async fn login(
    State(server): State<AccountsServer>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    request.validate()?;
    let user = server
        .service
        .authenticate_user(&request.username, &request.password)
        .await?;
    let token = server.service.issue_token(user.id)?;
    Ok(Json(api_success(TokenResponse { token })))
}

/// Resolve the user behind the request's bearer token.
#[utoipa::path(
    get,
    path = "/auth/token",
    tag = "auth",
    responses(
        (status = 200, description = "Token subject resolved", body = PublicUser),
        (status = 401, description = "Missing, invalid or expired token")
    )
)]
pub async fn whoami(AuthUser(user): AuthUser) -> Json<ApiResponse<PublicUser>> {
    Json(api_success(user))
}

/// Verify a bearer token without resolving the user. Lets the other
/// services of the platform check tokens against the shared secret.
#[utoipa::path(
    get,
    path = "/auth/validate",
    tag = "auth",
    responses(
        (status = 204, description = "Token is valid"),
        (status = 401, description = "Missing, invalid or expired token")
    )
)]
pub async fn validate_token(
    State(server): State<AccountsServer>,
    BearerToken(token): BearerToken,
) -> Result<StatusCode, ApiError> {
    server.service.verify_token(&token)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Fetch a user's security question by email (password-reset step 1).
#[utoipa::path(
    post,
    path = "/auth/security-question",
    tag = "auth",
    request_body = SecurityQuestionRequest,
    responses(
        (status = 200, description = "Identifier and question", body = SecurityQuestionInfo),
        (status = 404, description = "No user with this email")
    )
)]
pub async fn security_question(
    State(server): State<AccountsServer>,
    Json(request): Json<SecurityQuestionRequest>,
) -> Result<Json<ApiResponse<SecurityQuestionInfo>>, ApiError> {
    let info = server.service.security_question(&request.email).await?;
    Ok(Json(api_success(info)))
}

/// Check a security answer and issue a token on match (password-reset
/// step 2; the token authorizes the subsequent password update).
#[utoipa::path(
    post,
    path = "/auth/security-answer",
    tag = "auth",
    request_body = SecurityAnswerRequest,
    responses(
        (status = 200, description = "Answer matched, token issued", body = TokenResponse),
        (status = 401, description = "Wrong security answer"),
        (status = 404, description = "No user with this identifier")
    )
)]
pub async fn security_answer(
    State(server): State<AccountsServer>,
    Json(request): Json<SecurityAnswerRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    let user = server
        .service
        .check_security_answer(request.id, &request.security_answer)
        .await?;
    let token = server.service.issue_token(user.id)?;
    Ok(Json(api_success(TokenResponse { token })))
}
