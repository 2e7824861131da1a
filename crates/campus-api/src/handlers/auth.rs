//! Authentication handlers

use axum::extract::State;
use campus_service::dto::{AuthResponse, LoginRequest, LogoutRequest, RefreshTokenRequest, RegisterRequest};
use campus_service::services::AuthService;

use crate::extractors::{AuthUser, OptionalValidatedJson, ValidatedJson};
use crate::response::{ApiJson, ApiResult, Created, NoContent};
use crate::state::AppState;

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Created<ApiJson<AuthResponse>>> {
    let service = AuthService::new(state.service_context());
    let response = service.register(request).await?;
    Ok(Created(ApiJson(response)))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<ApiJson<AuthResponse>> {
    let service = AuthService::new(state.service_context());
    Ok(ApiJson(service.login(request).await?))
}

/// POST /auth/refresh
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RefreshTokenRequest>,
) -> ApiResult<ApiJson<AuthResponse>> {
    let service = AuthService::new(state.service_context());
    Ok(ApiJson(service.refresh(request).await?))
}

/// POST /auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    OptionalValidatedJson(body): OptionalValidatedJson<LogoutRequest>,
) -> ApiResult<NoContent> {
    let service = AuthService::new(state.service_context());
    let refresh_token = body.and_then(|b| b.refresh_token);
    service
        .logout(auth.user_id, auth.session_id.as_deref(), refresh_token.as_deref())
        .await?;
    Ok(NoContent)
}
