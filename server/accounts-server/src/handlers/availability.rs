//! Uniqueness probes used by registration forms.
//!
//! Open endpoints: registration happens before a token exists.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::error::{api_success, ApiError, ApiResponse};
use crate::server::AccountsServer;
use account_core::{AccountError, UserQuery};

#[derive(Debug, Deserialize)]
pub struct UsernameParams {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailParams {
    pub email: String,
}

/// `true` when no user exists for `query`.
async fn is_available(server: &AccountsServer, query: UserQuery) -> Result<bool, ApiError> {
    match server.service.get_user(&query).await {
        Ok(_) => Ok(false),
        Err(AccountError::UserNotFound) => Ok(true),
        Err(err) => Err(err.into()),
    }
}

/// Check whether a username is still available.
#[utoipa::path(
    get,
    path = "/validation/username",
    tag = "validation",
    params(("username" = String, Query, description = "Username to probe")),
    responses(
        (status = 200, description = "true when the username is free", body = bool)
    )
)]
pub async fn unique_username(
    State(server): State<AccountsServer>,
    Query(params): Query<UsernameParams>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    let available = is_available(&server, UserQuery::by_username(params.username)).await?;
    Ok(Json(api_success(available)))
}

/// Check whether an email is still available.
#[utoipa::path(
    get,
    path = "/validation/email",
    tag = "validation",
    params(("email" = String, Query, description = "Email to probe")),
    responses(
        (status = 200, description = "true when the email is free", body = bool)
    )
)]
pub async fn unique_email(
    State(server): State<AccountsServer>,
    Query(params): Query<EmailParams>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    let available = is_available(&server, UserQuery::by_email(params.email)).await?;
    Ok(Json(api_success(available)))
}
