//! Server setup and initialization

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use campus_cache::RedisPool;
use campus_common::{AppConfig, AppError, JwtService};
use campus_core::SnowflakeGenerator;
use campus_db::{
    create_pool, run_migrations, PgAgentRepository, PgIngredientRepository, PgMealPlanRepository,
    PgQueueRepository, PgRatingRepository, PgRecipeRepository, PgTagRepository,
    PgTicketRepository, PgUserRepository, PoolConfig,
};
use campus_service::{ServiceContextBuilder, TicketEventHub};
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::{apply_middleware, apply_middleware_with_config};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the application: rate limited API routes plus unthrottled health routes
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    );
    let health = apply_middleware(health_routes());

    api.merge(health).with_state(state)
}

/// Connect to PostgreSQL and Redis, apply migrations and wire the services
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool_config = PoolConfig::new(
        config.database.url.clone(),
        config.database.max_connections,
        config.database.min_connections,
    );
    let pool = create_pool(&pool_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    run_migrations(&pool)
        .await
        .map_err(|e| AppError::Database(format!("Migration failed: {e}")))?;

    info!("Connecting to Redis...");
    let redis_pool = RedisPool::from_config(&config.redis).map_err(|e| AppError::Cache(e.to_string()))?;
    info!("Redis pool created");

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
        config.jwt.refresh_token_expiry,
    ));
    let snowflake_generator = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));
    let ticket_events = TicketEventHub::with_keep_alive(config.sse.keep_alive());

    let service_context = ServiceContextBuilder::new()
        .pool(pool.clone())
        .redis_pool(redis_pool)
        .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
        .queue_repo(Arc::new(PgQueueRepository::new(pool.clone())))
        .agent_repo(Arc::new(PgAgentRepository::new(pool.clone())))
        .ticket_repo(Arc::new(PgTicketRepository::new(pool.clone())))
        .rating_repo(Arc::new(PgRatingRepository::new(pool.clone())))
        .ingredient_repo(Arc::new(PgIngredientRepository::new(pool.clone())))
        .tag_repo(Arc::new(PgTagRepository::new(pool.clone())))
        .recipe_repo(Arc::new(PgRecipeRepository::new(pool.clone())))
        .meal_plan_repo(Arc::new(PgMealPlanRepository::new(pool)))
        .jwt_service(jwt_service)
        .snowflake_generator(snowflake_generator)
        .ticket_events(ticket_events)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Serve `app` on an already bound listener until the process stops
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), AppError> {
    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);
    serve(listener, app).await
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid API_HOST/API_PORT: {e}")))?;

    let state = create_app_state(config).await?;
    run_server(create_app(state), addr).await
}
