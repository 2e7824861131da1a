//! Ticket service
//!
//! Ticket lifecycle: open, converse, claim, close. Every state change is pushed to
//! the ticket's live subscribers after it is committed.

use campus_core::{
    DomainError, MessageSender, Role, Snowflake, Ticket, TicketMessage, User,
};
use tracing::{info, instrument};

use crate::dto::{
    ClaimEvent, CloseEvent, CreateTicketRequest, MessageEvent, PostMessageRequest, RatingResponse,
    TicketDetailResponse, TicketMessageResponse, TicketResponse,
};
use crate::realtime::TicketSubscription;

use super::access::{load_agent, load_caller};
use super::agent::agent_response;
use super::context::ServiceContext;
use super::error::ServiceResult;

pub const EVENT_MESSAGE: &str = "message";
pub const EVENT_CLAIM: &str = "claim";
pub const EVENT_CLOSE: &str = "close";

pub struct TicketService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TicketService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    // ------------------------------------------------------------------------
    // Ticket owners
    // ------------------------------------------------------------------------

    /// The caller's own tickets, newest first
    #[instrument(skip(self))]
    pub async fn list_for_user(&self, caller_id: Snowflake) -> ServiceResult<Vec<TicketResponse>> {
        let caller = load_caller(self.ctx, caller_id).await?;
        require_user_role(&caller)?;

        let tickets = self.ctx.ticket_repo().list_by_user(caller.id).await?;
        Ok(tickets.into_iter().map(TicketResponse::from).collect())
    }

    /// Open a ticket with its first message
    #[instrument(skip(self, request), fields(queue_id = %request.queue_id))]
    pub async fn create(
        &self,
        caller_id: Snowflake,
        request: CreateTicketRequest,
    ) -> ServiceResult<TicketDetailResponse> {
        let caller = load_caller(self.ctx, caller_id).await?;
        require_user_role(&caller)?;

        self.ctx
            .queue_repo()
            .find_by_id(request.queue_id)
            .await?
            .ok_or(DomainError::QueueNotFound(request.queue_id))?;

        let ticket = Ticket::new(
            self.ctx.generate_id(),
            request.queue_id,
            caller.id,
            request.title.trim().to_string(),
        );
        let message = TicketMessage::new(
            self.ctx.generate_id(),
            ticket.id,
            MessageSender::User,
            &request.message,
        )?;
        self.ctx.ticket_repo().create(&ticket, &message).await?;

        info!(ticket_id = %ticket.id, user_id = %caller.id, "Ticket opened");
        Ok(TicketDetailResponse {
            ticket: ticket.into(),
            messages: vec![message.into()],
            agent_rating: None,
        })
    }

    // ------------------------------------------------------------------------
    // Shared ticket views
    // ------------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn get(&self, caller_id: Snowflake, ticket_id: Snowflake) -> ServiceResult<TicketDetailResponse> {
        let caller = load_caller(self.ctx, caller_id).await?;
        let ticket = self.visible_ticket(&caller, ticket_id).await?;

        let messages = self.ctx.ticket_repo().messages(ticket.id).await?;
        let agent_rating = match ticket.agent_id {
            Some(agent_id) => Some(self.ctx.agent_repo().rating_summary(agent_id).await?),
            None => None,
        };

        Ok(TicketDetailResponse {
            ticket: ticket.into(),
            messages: messages.into_iter().map(TicketMessageResponse::from).collect(),
            agent_rating,
        })
    }

    /// Post to the conversation as the caller's role; admins may only read
    #[instrument(skip(self, request))]
    pub async fn post_message(
        &self,
        caller_id: Snowflake,
        ticket_id: Snowflake,
        request: PostMessageRequest,
    ) -> ServiceResult<TicketMessageResponse> {
        let caller = load_caller(self.ctx, caller_id).await?;
        let ticket = self.visible_ticket(&caller, ticket_id).await?;
        let sender = MessageSender::for_role(caller.role)?;
        if ticket.is_closed {
            return Err(DomainError::TicketClosed.into());
        }

        let message = TicketMessage::new(self.ctx.generate_id(), ticket.id, sender, &request.text)?;
        self.ctx.ticket_repo().add_message(&message).await?;

        let response = TicketMessageResponse::from(message);
        self.ctx.ticket_events().publish(
            ticket.id,
            EVENT_MESSAGE,
            &MessageEvent {
                ticket_id: ticket.id,
                kind: EVENT_MESSAGE,
                message: &response,
            },
        );

        Ok(response)
    }

    #[instrument(skip(self))]
    pub async fn rating(&self, caller_id: Snowflake, ticket_id: Snowflake) -> ServiceResult<Option<RatingResponse>> {
        let caller = load_caller(self.ctx, caller_id).await?;
        let ticket = self.visible_ticket(&caller, ticket_id).await?;

        let rating = self.ctx.rating_repo().find_by_ticket(ticket.id).await?;
        Ok(rating.map(RatingResponse::from))
    }

    /// Open a live event stream for a ticket the caller can see
    #[instrument(skip(self))]
    pub async fn subscribe(&self, caller_id: Snowflake, ticket_id: Snowflake) -> ServiceResult<TicketSubscription> {
        let caller = load_caller(self.ctx, caller_id).await?;
        let ticket = self.visible_ticket(&caller, ticket_id).await?;
        Ok(self.ctx.ticket_events().subscribe(ticket.id))
    }

    // ------------------------------------------------------------------------
    // Agents
    // ------------------------------------------------------------------------

    /// Every ticket, newest first
    #[instrument(skip(self))]
    pub async fn list_for_agent(&self, caller_id: Snowflake) -> ServiceResult<Vec<TicketResponse>> {
        let caller = load_caller(self.ctx, caller_id).await?;
        load_agent(self.ctx, &caller).await?;

        let tickets = self.ctx.ticket_repo().list_all().await?;
        Ok(tickets.into_iter().map(TicketResponse::from).collect())
    }

    /// Assign an unclaimed open ticket to the calling agent
    #[instrument(skip(self))]
    pub async fn claim(&self, caller_id: Snowflake, ticket_id: Snowflake) -> ServiceResult<TicketResponse> {
        let caller = load_caller(self.ctx, caller_id).await?;
        let agent = load_agent(self.ctx, &caller).await?;

        let workload = self.ctx.agent_repo().workload(agent.id).await?;
        if !agent.has_room(workload) {
            return Err(DomainError::CapacityReached {
                capacity: agent.capacity,
            }
            .into());
        }

        let mut ticket = self.find(ticket_id).await?;
        if ticket.is_closed {
            return Err(DomainError::TicketClosed.into());
        }
        if !self.ctx.ticket_repo().claim(ticket.id, agent.id).await? {
            return Err(DomainError::TicketAlreadyClaimed.into());
        }
        ticket.agent_id = Some(agent.id);
        ticket.updated_at = chrono::Utc::now();

        info!(ticket_id = %ticket.id, agent_id = %agent.id, "Ticket claimed");

        let agent_view = agent_response(self.ctx, &agent).await?;
        let agent_rating = self.ctx.agent_repo().rating_summary(agent.id).await?;
        self.ctx.ticket_events().publish(
            ticket.id,
            EVENT_CLAIM,
            &ClaimEvent {
                agent: &agent_view,
                agent_rating,
            },
        );

        Ok(ticket.into())
    }

    /// Close an open ticket; any agent may close
    #[instrument(skip(self))]
    pub async fn close(&self, caller_id: Snowflake, ticket_id: Snowflake) -> ServiceResult<TicketResponse> {
        let caller = load_caller(self.ctx, caller_id).await?;
        let agent = load_agent(self.ctx, &caller).await?;

        let mut ticket = self.find(ticket_id).await?;
        if ticket.is_closed || !self.ctx.ticket_repo().close(ticket.id).await? {
            return Err(DomainError::TicketAlreadyClosed.into());
        }
        ticket.is_closed = true;
        ticket.updated_at = chrono::Utc::now();

        info!(ticket_id = %ticket.id, agent_id = %agent.id, "Ticket closed");

        let agent_view = agent_response(self.ctx, &agent).await?;
        self.ctx
            .ticket_events()
            .publish(ticket.id, EVENT_CLOSE, &CloseEvent { agent: &agent_view });

        Ok(ticket.into())
    }

    async fn find(&self, ticket_id: Snowflake) -> ServiceResult<Ticket> {
        Ok(self
            .ctx
            .ticket_repo()
            .find_by_id(ticket_id)
            .await?
            .ok_or(DomainError::TicketNotFound(ticket_id))?)
    }

    /// The ticket if the caller may see it; otherwise it does not exist for them
    async fn visible_ticket(&self, caller: &User, ticket_id: Snowflake) -> ServiceResult<Ticket> {
        let ticket = self.find(ticket_id).await?;

        let viewer_agent_id = if caller.is_agent() {
            self.ctx
                .agent_repo()
                .find_by_user_id(caller.id)
                .await?
                .map(|agent| agent.id)
        } else {
            None
        };

        if ticket.is_visible_to(caller, viewer_agent_id) {
            Ok(ticket)
        } else {
            Err(DomainError::TicketNotFound(ticket_id).into())
        }
    }
}

fn require_user_role(caller: &User) -> ServiceResult<()> {
    if caller.role == Role::User {
        Ok(())
    } else {
        Err(DomainError::RoleRequired(Role::User).into())
    }
}
