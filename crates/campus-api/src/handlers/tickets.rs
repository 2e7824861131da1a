//! Helpdesk handlers: queues, agent desk, user tickets, conversations and the
//! live ticket stream

use std::convert::Infallible;

use axum::{
    body::Body,
    extract::State,
    http::header,
    response::Response,
};
use futures::stream;
use campus_service::dto::{
    AgentDashboardResponse, CreateRatingRequest, CreateTicketRequest, PostMessageRequest,
    QueueResponse, RatingResponse, TicketDetailResponse, TicketMessageResponse, TicketResponse,
};
use campus_service::services::{AgentService, QueueService, RatingService, TicketService};

use crate::extractors::{AuthUser, IdPath, StreamAuthUser, ValidatedJson};
use crate::response::{ApiError, ApiJson, ApiResult, Created};
use crate::state::AppState;

/// GET /queues
pub async fn list_queues(State(state): State<AppState>) -> ApiResult<ApiJson<Vec<QueueResponse>>> {
    let service = QueueService::new(state.service_context());
    Ok(ApiJson(service.list().await?))
}

// === Agent desk ===

/// GET /agent
pub async fn agent_dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<ApiJson<AgentDashboardResponse>> {
    let service = AgentService::new(state.service_context());
    Ok(ApiJson(service.dashboard(auth.user_id).await?))
}

/// GET /agent/tickets
pub async fn agent_tickets(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<ApiJson<Vec<TicketResponse>>> {
    let service = TicketService::new(state.service_context());
    Ok(ApiJson(service.list_for_agent(auth.user_id).await?))
}

/// POST /agent/tickets/:id/claim
pub async fn claim_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(ticket_id): IdPath,
) -> ApiResult<ApiJson<TicketResponse>> {
    let service = TicketService::new(state.service_context());
    Ok(ApiJson(service.claim(auth.user_id, ticket_id).await?))
}

/// POST /agent/tickets/:id/close
pub async fn close_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(ticket_id): IdPath,
) -> ApiResult<ApiJson<TicketResponse>> {
    let service = TicketService::new(state.service_context());
    Ok(ApiJson(service.close(auth.user_id, ticket_id).await?))
}

// === Ticket owners ===

/// GET /user/tickets
pub async fn user_tickets(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<ApiJson<Vec<TicketResponse>>> {
    let service = TicketService::new(state.service_context());
    Ok(ApiJson(service.list_for_user(auth.user_id).await?))
}

/// POST /user/tickets
pub async fn create_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateTicketRequest>,
) -> ApiResult<Created<ApiJson<TicketDetailResponse>>> {
    let service = TicketService::new(state.service_context());
    let ticket = service.create(auth.user_id, request).await?;
    Ok(Created(ApiJson(ticket)))
}

/// POST /ratings
pub async fn rate_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateRatingRequest>,
) -> ApiResult<Created<ApiJson<RatingResponse>>> {
    let service = RatingService::new(state.service_context());
    let rating = service.create(auth.user_id, request).await?;
    Ok(Created(ApiJson(rating)))
}

// === Shared ticket views ===

/// GET /tickets/:id
pub async fn get_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(ticket_id): IdPath,
) -> ApiResult<ApiJson<TicketDetailResponse>> {
    let service = TicketService::new(state.service_context());
    Ok(ApiJson(service.get(auth.user_id, ticket_id).await?))
}

/// POST /tickets/:id/messages
pub async fn post_message(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(ticket_id): IdPath,
    ValidatedJson(request): ValidatedJson<PostMessageRequest>,
) -> ApiResult<Created<ApiJson<TicketMessageResponse>>> {
    let service = TicketService::new(state.service_context());
    let message = service.post_message(auth.user_id, ticket_id, request).await?;
    Ok(Created(ApiJson(message)))
}

/// GET /tickets/:id/rating
pub async fn get_rating(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(ticket_id): IdPath,
) -> ApiResult<ApiJson<Option<RatingResponse>>> {
    let service = TicketService::new(state.service_context());
    Ok(ApiJson(service.rating(auth.user_id, ticket_id).await?))
}

/// GET /tickets/:id/stream
///
/// Server-Sent Events: an initial `ping`, then `message`, `claim` and `close`
/// events with periodic pings. The subscription ends when the client disconnects.
pub async fn stream_ticket(
    State(state): State<AppState>,
    StreamAuthUser(auth): StreamAuthUser,
    IdPath(ticket_id): IdPath,
) -> ApiResult<Response> {
    let service = TicketService::new(state.service_context());
    let subscription = service.subscribe(auth.user_id, ticket_id).await?;

    let frames = stream::unfold(subscription, |mut subscription| async move {
        let frame = subscription.next_frame().await?;
        Some((Ok::<_, Infallible>(frame.to_string()), subscription))
    });

    Response::builder()
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache, no-transform")
        .header(header::CONNECTION, "keep-alive")
        .body(Body::from_stream(frames))
        .map_err(ApiError::internal)
}
