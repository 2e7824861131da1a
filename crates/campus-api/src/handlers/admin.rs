//! Admin handlers: users, agents, queues and tags
//!
//! Role checks happen in the services.

use axum::extract::State;
use campus_service::dto::{
    AgentResponse, CreateAgentRequest, CreateTagRequest, CreateUserRequest, PaginatedResponse,
    QueueRequest, QueueResponse, TagResponse, UpdateAgentRequest, UpdateUserRequest, UserListQuery,
    UserResponse,
};
use campus_service::services::{AgentService, CatalogService, QueueService, UserService};

use crate::extractors::{AuthUser, IdPath, ValidatedJson, ValidatedQuery};
use crate::response::{ApiJson, ApiResult, Created, NoContent};
use crate::state::AppState;

// === Users ===

/// GET /admin/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(query): ValidatedQuery<UserListQuery>,
) -> ApiResult<ApiJson<PaginatedResponse<UserResponse>>> {
    let service = UserService::new(state.service_context());
    Ok(ApiJson(service.list_users(auth.user_id, query).await?))
}

/// POST /admin/users
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> ApiResult<Created<ApiJson<UserResponse>>> {
    let service = UserService::new(state.service_context());
    let user = service.create_user(auth.user_id, request).await?;
    Ok(Created(ApiJson(user)))
}

/// GET /admin/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(user_id): IdPath,
) -> ApiResult<ApiJson<UserResponse>> {
    let service = UserService::new(state.service_context());
    Ok(ApiJson(service.get_user(auth.user_id, user_id).await?))
}

/// PATCH /admin/users/:id
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(user_id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<ApiJson<UserResponse>> {
    let service = UserService::new(state.service_context());
    Ok(ApiJson(service.update_user(auth.user_id, user_id, request).await?))
}

/// DELETE /admin/users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(user_id): IdPath,
) -> ApiResult<NoContent> {
    let service = UserService::new(state.service_context());
    service.delete_user(auth.user_id, user_id).await?;
    Ok(NoContent)
}

// === Agents ===

/// GET /admin/agents
pub async fn list_agents(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<ApiJson<Vec<AgentResponse>>> {
    let service = AgentService::new(state.service_context());
    Ok(ApiJson(service.list(auth.user_id).await?))
}

/// POST /admin/agents
pub async fn create_agent(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateAgentRequest>,
) -> ApiResult<Created<ApiJson<AgentResponse>>> {
    let service = AgentService::new(state.service_context());
    let agent = service.create(auth.user_id, request).await?;
    Ok(Created(ApiJson(agent)))
}

/// GET /admin/agents/:id
pub async fn get_agent(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(agent_id): IdPath,
) -> ApiResult<ApiJson<AgentResponse>> {
    let service = AgentService::new(state.service_context());
    Ok(ApiJson(service.get(auth.user_id, agent_id).await?))
}

/// PATCH /admin/agents/:id
pub async fn update_agent(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(agent_id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateAgentRequest>,
) -> ApiResult<ApiJson<AgentResponse>> {
    let service = AgentService::new(state.service_context());
    Ok(ApiJson(service.update(auth.user_id, agent_id, request).await?))
}

/// DELETE /admin/agents/:id
pub async fn delete_agent(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(agent_id): IdPath,
) -> ApiResult<NoContent> {
    let service = AgentService::new(state.service_context());
    service.delete(auth.user_id, agent_id).await?;
    Ok(NoContent)
}

// === Queues ===

/// GET /admin/queues
pub async fn list_queues(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<ApiJson<Vec<QueueResponse>>> {
    let service = QueueService::new(state.service_context());
    Ok(ApiJson(service.list_for_admin(auth.user_id).await?))
}

/// POST /admin/queues
pub async fn create_queue(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<QueueRequest>,
) -> ApiResult<Created<ApiJson<QueueResponse>>> {
    let service = QueueService::new(state.service_context());
    let queue = service.create(auth.user_id, request).await?;
    Ok(Created(ApiJson(queue)))
}

/// PATCH /admin/queues/:id
pub async fn update_queue(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(queue_id): IdPath,
    ValidatedJson(request): ValidatedJson<QueueRequest>,
) -> ApiResult<ApiJson<QueueResponse>> {
    let service = QueueService::new(state.service_context());
    Ok(ApiJson(service.update(auth.user_id, queue_id, request).await?))
}

/// DELETE /admin/queues/:id
pub async fn delete_queue(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(queue_id): IdPath,
) -> ApiResult<NoContent> {
    let service = QueueService::new(state.service_context());
    service.delete(auth.user_id, queue_id).await?;
    Ok(NoContent)
}

// === Tags ===

/// POST /admin/tags
pub async fn create_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateTagRequest>,
) -> ApiResult<Created<ApiJson<TagResponse>>> {
    let service = CatalogService::new(state.service_context());
    let tag = service.create_tag(auth.user_id, request).await?;
    Ok(Created(ApiJson(tag)))
}
