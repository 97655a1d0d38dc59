//! User listing, lookup, search, profile update, password update and
//! deletion. Every route here requires a valid bearer token.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{api_success, ApiError, ApiResponse};
use crate::handlers::auth::TokenResponse;
use crate::middleware::AuthUser;
use crate::server::AccountsServer;
use account_core::{PublicUser, SearchAttribute, UserQuery, UserUpdate};

/// Event identifier for the role lookup.
#[derive(Debug, Deserialize)]
pub struct RoleParams {
    pub event: i64,
}

/// A user's role within the queried event.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoleResponse {
    #[schema(example = "presenter")]
    pub role: String,
}

/// User search request. When no attribute list is given the search runs
/// over firstname, lastname, username and email.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueryUsersRequest {
    /// Whitespace-separated tokens; any token matching any attribute
    /// (case-insensitive substring) selects a user.
    #[schema(example = "ali")]
    pub search_term: String,
    /// Attributes to search in.
    #[serde(default)]
    pub attributes: Option<Vec<SearchAttribute>>,
}

/// Password update request.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub new_password: String,
}

/// Account deletion request; deleting requires re-authentication.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteUserRequest {
    pub username: String,
    pub password: String,
}

/// List all users, reduced. The result set is unbounded.
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "All users", body = [PublicUser]),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_users(
    _auth: AuthUser,
    State(server): State<AccountsServer>,
) -> Result<Json<ApiResponse<Vec<PublicUser>>>, ApiError> {
    let users = server.service.get_users().await?;
    Ok(Json(api_success(users)))
}

/// Fetch one user by identifier, reduced.
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 200, description = "The user", body = PublicUser),
        (status = 404, description = "No user with this identifier")
    )
)]
pub async fn get_user_by_id(
    _auth: AuthUser,
    State(server): State<AccountsServer>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PublicUser>>, ApiError> {
    let user = server.service.get_user(&UserQuery::by_id(id)).await?;
    Ok(Json(api_success(user)))
}

/// Look up a user's role within one external event.
#[utoipa::path(
    get,
    path = "/users/{id}/role",
    tag = "users",
    params(
        ("id" = Uuid, Path, description = "User identifier"),
        ("event" = i64, Query, description = "Event identifier"),
    ),
    responses(
        (status = 200, description = "The event-based role", body = RoleResponse),
        (status = 404, description = "User or event entry not found")
    )
)]
pub async fn user_role(
    _auth: AuthUser,
    State(server): State<AccountsServer>,
    Path(id): Path<Uuid>,
    Query(params): Query<RoleParams>,
) -> Result<Json<ApiResponse<RoleResponse>>, ApiError> {
    let role = server.service.check_role(id, params.event).await?;
    Ok(Json(api_success(RoleResponse { role })))
}

/// Fetch one user's research-interest tags.
#[utoipa::path(
    get,
    path = "/users/{id}/research-interests",
    tag = "users",
    params(("id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 200, description = "The user's tags", body = [String]),
        (status = 404, description = "No user with this identifier")
    )
)]
pub async fn research_interests(
    _auth: AuthUser,
    State(server): State<AccountsServer>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let user = server.service.get_user(&UserQuery::by_id(id)).await?;
    Ok(Json(api_success(user.research_interest)))
}

/// Search users. A blank search term short-circuits to an empty result
/// here at the boundary; the core search itself would degenerate to a
/// match-everything pattern.
#[utoipa::path(
    post,
    path = "/users/query",
    tag = "users",
    request_body = QueryUsersRequest,
    responses(
        (status = 200, description = "Matching users, reduced", body = [PublicUser]),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn query_users(
    _auth: AuthUser,
    State(server): State<AccountsServer>,
    Json(request): Json<QueryUsersRequest>,
) -> Result<Json<ApiResponse<Vec<PublicUser>>>, ApiError> {
    if request.search_term.trim().is_empty() {
        return Ok(Json(api_success(Vec::new())));
    }
    let users = server
        .service
        .query_users(&request.search_term, request.attributes)
        .await?;
    Ok(Json(api_success(users)))
}

/// Apply a partial profile update and issue a fresh token.
#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "users",
    params(("id" = Uuid, Path, description = "User identifier")),
    request_body = UserUpdate,
    responses(
        (status = 200, description = "User updated, fresh token issued", body = TokenResponse),
        (status = 400, description = "Username or email already taken"),
        (status = 404, description = "No user with this identifier")
    )
)]
pub async fn update_user(
    _auth: AuthUser,
    State(server): State<AccountsServer>,
    Path(id): Path<Uuid>,
    Json(update): Json<UserUpdate>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    let user = server.service.update_user(id, update).await?;
    let token = server.service.issue_token(user.id)?;
    Ok(Json(api_success(TokenResponse { token })))
}

/// Replace a user's password.
#[utoipa::path(
    patch,
    path = "/users/{id}/password",
    tag = "users",
    params(("id" = Uuid, Path, description = "User identifier")),
    request_body = UpdatePasswordRequest,
    responses(
        (status = 204, description = "Password updated"),
        (status = 400, description = "No password entered"),
        (status = 404, description = "No user with this identifier")
    )
)]
pub async fn update_password(
    _auth: AuthUser,
    State(server): State<AccountsServer>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    server
        .service
        .update_password(id, &request.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete an account. The caller must re-authenticate with username and
/// password; the bearer token alone is not enough.
#[utoipa::path(
    post,
    path = "/users/delete",
    tag = "users",
    request_body = DeleteUserRequest,
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Wrong password"),
        (status = 404, description = "No user with this username")
    )
)]
pub async fn delete_user(
    _auth: AuthUser,
    State(server): State<AccountsServer>,
    Json(request): Json<DeleteUserRequest>,
) -> Result<StatusCode, ApiError> {
    server
        .service
        .authenticate_user(&request.username, &request.password)
        .await?;
    server.service.delete_user(&request.username).await?;
    Ok(StatusCode::NO_CONTENT)
}
