//! Token extraction and verification for protected routes.
//!
//! Protected handlers take an [`AuthUser`] argument; extraction verifies
//! the bearer token and resolves the user it was issued for, so handlers
//! never parse tokens themselves. Tokens arrive in the `Authorization`
//! header; a `?token=` query parameter is accepted as a fallback for older
//! clients.

use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::server::AccountsServer;
use account_core::PublicUser;

/// The raw bearer token of a request.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

fn token_from_header(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_owned())
}

fn token_from_query(parts: &Parts) -> Option<String> {
    parts.uri.query()?.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key != "token" {
            return None;
        }
        Some(match urlencoding::decode(value) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => value.to_owned(),
        })
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        token_from_header(parts)
            .or_else(|| token_from_query(parts))
            .map(BearerToken)
            .ok_or_else(ApiError::unauthorized)
    }
}

/// The authenticated user behind a request's bearer token.
///
/// Verification failures yield 401; a valid token whose subject no longer
/// exists yields the user-not-found error.
#[derive(Debug, Clone)]
pub struct AuthUser(pub PublicUser);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    AccountsServer: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;
        let server = AccountsServer::from_ref(state);
        let user = server
            .service
            .authenticate_user_by_token(&token)
            .await
            .map_err(ApiError::from)?;
        Ok(AuthUser(user))
    }
}
