//! Current user handlers

use axum::extract::State;
use campus_service::dto::{UpdatePreferencesRequest, UserResponse};
use campus_service::services::UserService;

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiJson, ApiResult};
use crate::state::AppState;

/// GET /users/@me
pub async fn get_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<ApiJson<UserResponse>> {
    let service = UserService::new(state.service_context());
    Ok(ApiJson(service.get_current_user(auth.user_id).await?))
}

/// PATCH /users/@me/preferences
pub async fn update_preferences(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdatePreferencesRequest>,
) -> ApiResult<ApiJson<UserResponse>> {
    let service = UserService::new(state.service_context());
    Ok(ApiJson(service.update_preferences(auth.user_id, request).await?))
}
