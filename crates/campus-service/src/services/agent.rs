//! Agent service
//!
//! Admin management of agent accounts and the agent's own dashboard.

use campus_common::{hash_password, validate_password_strength};
use campus_core::{Agent, DomainError, Role, Snowflake, User};
use tracing::{info, instrument};

use crate::dto::{AgentDashboardResponse, AgentResponse, CreateAgentRequest, TicketResponse, UpdateAgentRequest};

use super::access::{load_agent, load_caller, normalize_email, require_admin};
use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct AgentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AgentService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, caller_id: Snowflake) -> ServiceResult<Vec<AgentResponse>> {
        let caller = load_caller(self.ctx, caller_id).await?;
        require_admin(&caller)?;

        let agents = self.ctx.agent_repo().list().await?;
        Ok(agents.into_iter().map(AgentResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, caller_id: Snowflake, agent_id: Snowflake) -> ServiceResult<AgentResponse> {
        let caller = load_caller(self.ctx, caller_id).await?;
        require_admin(&caller)?;

        let agent = self.find(agent_id).await?;
        agent_response(self.ctx, &agent).await
    }

    /// Create the user (role `agent`) and its agent record together
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn create(
        &self,
        caller_id: Snowflake,
        request: CreateAgentRequest,
    ) -> ServiceResult<AgentResponse> {
        let caller = load_caller(self.ctx, caller_id).await?;
        require_admin(&caller)?;
        validate_password_strength(&request.password)?;
        let capacity =
            Agent::validate_capacity(request.capacity.unwrap_or(Agent::DEFAULT_CAPACITY))?;

        let email = normalize_email(&request.email);
        if self.ctx.user_repo().email_exists(&email).await? {
            return Err(DomainError::EmailAlreadyExists.into());
        }

        let password_hash = hash_password(&request.password)?;
        let user = User::new(
            self.ctx.generate_id(),
            request.first_name.trim().to_string(),
            request.last_name.trim().to_string(),
            email,
            Role::Agent,
        );
        let agent = Agent::new(
            self.ctx.generate_id(),
            user.id,
            request.level.unwrap_or_default(),
            capacity,
        );
        self.ctx
            .agent_repo()
            .create_with_user(&user, &password_hash, &agent)
            .await?;

        info!(agent_id = %agent.id, user_id = %user.id, "Agent created");
        Ok(AgentResponse::new(&agent, &user))
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        caller_id: Snowflake,
        agent_id: Snowflake,
        request: UpdateAgentRequest,
    ) -> ServiceResult<AgentResponse> {
        let caller = load_caller(self.ctx, caller_id).await?;
        require_admin(&caller)?;

        let mut agent = self.find(agent_id).await?;
        if let Some(level) = request.level {
            agent.level = level;
        }
        if let Some(capacity) = request.capacity {
            agent.capacity = Agent::validate_capacity(capacity)?;
        }
        agent.updated_at = chrono::Utc::now();
        self.ctx.agent_repo().update(&agent).await?;

        agent_response(self.ctx, &agent).await
    }

    /// Delete the agent together with its user account
    #[instrument(skip(self))]
    pub async fn delete(&self, caller_id: Snowflake, agent_id: Snowflake) -> ServiceResult<()> {
        let caller = load_caller(self.ctx, caller_id).await?;
        require_admin(&caller)?;

        let agent = self.find(agent_id).await?;
        if agent.user_id == caller.id {
            return Err(DomainError::CannotDeleteSelf.into());
        }
        self.ctx.agent_repo().delete(agent_id).await?;
        self.ctx
            .refresh_token_store()
            .revoke_all_for_user(agent.user_id)
            .await?;

        info!(agent_id = %agent_id, "Agent deleted");
        Ok(())
    }

    /// The calling agent's profile, open tickets, workload and rating
    #[instrument(skip(self))]
    pub async fn dashboard(&self, caller_id: Snowflake) -> ServiceResult<AgentDashboardResponse> {
        let caller = load_caller(self.ctx, caller_id).await?;
        let agent = load_agent(self.ctx, &caller).await?;

        let tickets = self.ctx.ticket_repo().list_open_by_agent(agent.id).await?;
        let workload = self.ctx.agent_repo().workload(agent.id).await?;
        let rating = self.ctx.agent_repo().rating_summary(agent.id).await?;

        Ok(AgentDashboardResponse {
            agent: AgentResponse::new(&agent, &caller),
            tickets: tickets.into_iter().map(TicketResponse::from).collect(),
            workload,
            rating,
        })
    }

    async fn find(&self, agent_id: Snowflake) -> ServiceResult<Agent> {
        Ok(self
            .ctx
            .agent_repo()
            .find_by_id(agent_id)
            .await?
            .ok_or(DomainError::AgentNotFound(agent_id))?)
    }
}

/// Agent joined with its user account
pub(crate) async fn agent_response(ctx: &ServiceContext, agent: &Agent) -> ServiceResult<AgentResponse> {
    let user = ctx
        .user_repo()
        .find_by_id(agent.user_id)
        .await?
        .ok_or(DomainError::UserNotFound(agent.user_id))?;
    Ok(AgentResponse::new(agent, &user))
}
