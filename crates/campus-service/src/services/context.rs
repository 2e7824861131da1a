//! Service context - dependency container for services

use std::sync::Arc;

use campus_cache::{RedisPool, RefreshTokenStore};
use campus_common::JwtService;
use campus_core::traits::{
    AgentRepository, IngredientRepository, MealPlanRepository, QueueRepository, RatingRepository,
    RecipeRepository, TagRepository, TicketRepository, UserRepository,
};
use campus_core::{Snowflake, SnowflakeGenerator};
use campus_db::PgPool;

use crate::realtime::TicketEventHub;

use super::error::{ServiceError, ServiceResult};

/// Shared dependencies handed to every service: pools, repositories, the refresh
/// session store, the JWT service, the id generator and the ticket event hub.
#[derive(Clone)]
pub struct ServiceContext {
    pool: PgPool,
    redis_pool: RedisPool,

    user_repo: Arc<dyn UserRepository>,
    queue_repo: Arc<dyn QueueRepository>,
    agent_repo: Arc<dyn AgentRepository>,
    ticket_repo: Arc<dyn TicketRepository>,
    rating_repo: Arc<dyn RatingRepository>,
    ingredient_repo: Arc<dyn IngredientRepository>,
    tag_repo: Arc<dyn TagRepository>,
    recipe_repo: Arc<dyn RecipeRepository>,
    meal_plan_repo: Arc<dyn MealPlanRepository>,

    refresh_token_store: RefreshTokenStore,
    jwt_service: Arc<JwtService>,
    snowflake_generator: Arc<SnowflakeGenerator>,
    ticket_events: TicketEventHub,
}

impl ServiceContext {
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn redis_pool(&self) -> &RedisPool {
        &self.redis_pool
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn queue_repo(&self) -> &dyn QueueRepository {
        self.queue_repo.as_ref()
    }

    pub fn agent_repo(&self) -> &dyn AgentRepository {
        self.agent_repo.as_ref()
    }

    pub fn ticket_repo(&self) -> &dyn TicketRepository {
        self.ticket_repo.as_ref()
    }

    pub fn rating_repo(&self) -> &dyn RatingRepository {
        self.rating_repo.as_ref()
    }

    pub fn ingredient_repo(&self) -> &dyn IngredientRepository {
        self.ingredient_repo.as_ref()
    }

    pub fn tag_repo(&self) -> &dyn TagRepository {
        self.tag_repo.as_ref()
    }

    pub fn recipe_repo(&self) -> &dyn RecipeRepository {
        self.recipe_repo.as_ref()
    }

    pub fn meal_plan_repo(&self) -> &dyn MealPlanRepository {
        self.meal_plan_repo.as_ref()
    }

    // === Sessions, tokens, ids, events ===

    pub fn refresh_token_store(&self) -> &RefreshTokenStore {
        &self.refresh_token_store
    }

    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }

    pub fn ticket_events(&self) -> &TicketEventHub {
        &self.ticket_events
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &"PgPool")
            .field("redis_pool", &self.redis_pool)
            .field("repositories", &"...")
            .field("ticket_events", &self.ticket_events)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ServiceContext`]
#[derive(Default)]
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    redis_pool: Option<RedisPool>,
    user_repo: Option<Arc<dyn UserRepository>>,
    queue_repo: Option<Arc<dyn QueueRepository>>,
    agent_repo: Option<Arc<dyn AgentRepository>>,
    ticket_repo: Option<Arc<dyn TicketRepository>>,
    rating_repo: Option<Arc<dyn RatingRepository>>,
    ingredient_repo: Option<Arc<dyn IngredientRepository>>,
    tag_repo: Option<Arc<dyn TagRepository>>,
    recipe_repo: Option<Arc<dyn RecipeRepository>>,
    meal_plan_repo: Option<Arc<dyn MealPlanRepository>>,
    jwt_service: Option<Arc<JwtService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    ticket_events: Option<TicketEventHub>,
}

fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
    value.ok_or_else(|| ServiceError::internal(format!("{name} is required")))
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn redis_pool(mut self, redis_pool: RedisPool) -> Self {
        self.redis_pool = Some(redis_pool);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn queue_repo(mut self, repo: Arc<dyn QueueRepository>) -> Self {
        self.queue_repo = Some(repo);
        self
    }

    pub fn agent_repo(mut self, repo: Arc<dyn AgentRepository>) -> Self {
        self.agent_repo = Some(repo);
        self
    }

    pub fn ticket_repo(mut self, repo: Arc<dyn TicketRepository>) -> Self {
        self.ticket_repo = Some(repo);
        self
    }

    pub fn rating_repo(mut self, repo: Arc<dyn RatingRepository>) -> Self {
        self.rating_repo = Some(repo);
        self
    }

    pub fn ingredient_repo(mut self, repo: Arc<dyn IngredientRepository>) -> Self {
        self.ingredient_repo = Some(repo);
        self
    }

    pub fn tag_repo(mut self, repo: Arc<dyn TagRepository>) -> Self {
        self.tag_repo = Some(repo);
        self
    }

    pub fn recipe_repo(mut self, repo: Arc<dyn RecipeRepository>) -> Self {
        self.recipe_repo = Some(repo);
        self
    }

    pub fn meal_plan_repo(mut self, repo: Arc<dyn MealPlanRepository>) -> Self {
        self.meal_plan_repo = Some(repo);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    /// Defaults to a hub with the standard keep-alive
    pub fn ticket_events(mut self, hub: TicketEventHub) -> Self {
        self.ticket_events = Some(hub);
        self
    }

    /// Build the context
    ///
    /// # Errors
    /// Returns `ServiceError::Internal` naming the first missing dependency
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let redis_pool = required(self.redis_pool, "redis_pool")?;
        let jwt_service = required(self.jwt_service, "jwt_service")?;
        let ttl = u64::try_from(jwt_service.refresh_token_expiry()).unwrap_or(1);
        let refresh_token_store = RefreshTokenStore::with_ttl(redis_pool.clone(), ttl);

        Ok(ServiceContext {
            pool: required(self.pool, "pool")?,
            redis_pool,
            user_repo: required(self.user_repo, "user_repo")?,
            queue_repo: required(self.queue_repo, "queue_repo")?,
            agent_repo: required(self.agent_repo, "agent_repo")?,
            ticket_repo: required(self.ticket_repo, "ticket_repo")?,
            rating_repo: required(self.rating_repo, "rating_repo")?,
            ingredient_repo: required(self.ingredient_repo, "ingredient_repo")?,
            tag_repo: required(self.tag_repo, "tag_repo")?,
            recipe_repo: required(self.recipe_repo, "recipe_repo")?,
            meal_plan_repo: required(self.meal_plan_repo, "meal_plan_repo")?,
            refresh_token_store,
            jwt_service,
            snowflake_generator: required(self.snowflake_generator, "snowflake_generator")?,
            ticket_events: self.ticket_events.unwrap_or_default(),
        })
    }
}
