//! Rating service

use campus_core::{DomainError, Rating, Snowflake};
use tracing::{info, instrument};

use crate::dto::{CreateRatingRequest, RatingResponse};

use super::access::load_caller;
use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct RatingService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RatingService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Rate the agent of a closed ticket; owner only, once per ticket
    #[instrument(skip(self, request), fields(ticket_id = %request.ticket_id))]
    pub async fn create(
        &self,
        caller_id: Snowflake,
        request: CreateRatingRequest,
    ) -> ServiceResult<RatingResponse> {
        let caller = load_caller(self.ctx, caller_id).await?;

        let ticket = self
            .ctx
            .ticket_repo()
            .find_by_id(request.ticket_id)
            .await?
            .ok_or(DomainError::TicketNotFound(request.ticket_id))?;

        if ticket.user_id != caller.id {
            return Err(DomainError::NotTicketOwner.into());
        }
        if !ticket.is_closed {
            return Err(DomainError::TicketNotClosed.into());
        }
        let agent_id = ticket.agent_id.ok_or(DomainError::TicketUnassigned)?;

        let rating = Rating::new(
            self.ctx.generate_id(),
            ticket.id,
            agent_id,
            caller.id,
            request.score,
            request.comment,
        )?;
        self.ctx.rating_repo().create(&rating).await?;

        info!(ticket_id = %ticket.id, agent_id = %agent_id, score = rating.score, "Ticket rated");
        Ok(rating.into())
    }
}
