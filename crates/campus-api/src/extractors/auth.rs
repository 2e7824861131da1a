//! Authentication extractors
//!
//! Validate the access token from the `Authorization: Bearer` header, or for
//! event streams from the `token` query parameter.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Query},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use campus_core::Snowflake;
use campus_service::dto::StreamQuery;

use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated caller extracted from an access token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Snowflake,
    /// Refresh session the token was issued with
    pub session_id: Option<String>,
}

impl AuthUser {
    /// Validate a raw access token
    pub fn from_token(state: &AppState, token: &str) -> Result<Self, ApiError> {
        let claims = state.jwt_service().validate_access_token(token).map_err(|e| {
            tracing::warn!(error = %e, "Invalid access token");
            ApiError::App(e)
        })?;

        let user_id = claims.user_id()?;
        Ok(Self {
            user_id,
            session_id: claims.session_id,
        })
    }
}

async fn bearer_token<S: Send + Sync>(parts: &mut Parts, state: &S) -> Option<String> {
    TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
        .await
        .ok()
        .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string())
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts, state).await.ok_or(ApiError::MissingAuth)?;
        AuthUser::from_token(&AppState::from_ref(state), &token)
    }
}

/// Caller of an event stream endpoint.
///
/// Browsers' `EventSource` cannot set headers, so `?token=` is accepted when the
/// header is absent.
#[derive(Debug, Clone)]
pub struct StreamAuthUser(pub AuthUser);

#[async_trait]
impl<S> FromRequestParts<S> for StreamAuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = match bearer_token(parts, state).await {
            Some(token) => token,
            None => {
                let Query(query) = Query::<StreamQuery>::from_request_parts(parts, state)
                    .await
                    .map_err(|e| ApiError::invalid_query(e.body_text()))?;
                query.token.ok_or(ApiError::MissingAuth)?
            }
        };

        AuthUser::from_token(&AppState::from_ref(state), &token).map(StreamAuthUser)
    }
}
