//! # campus-db
//!
//! Database layer implementing the `campus-core` repository traits with PostgreSQL via SQLx.
//!
//! - Connection pool management and schema migrations
//! - Row models with SQLx `FromRow` derives
//! - Model -> entity mappers
//! - Repository implementations
//!
//! ```rust,ignore
//! use campus_db::{create_pool, run_migrations, PgTicketRepository, PoolConfig};
//!
//! let pool = create_pool(&PoolConfig::from_env()).await?;
//! run_migrations(&pool).await?;
//! let tickets = PgTicketRepository::new(pool);
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, PgPool, PoolConfig};
pub use repositories::{
    PgAgentRepository, PgIngredientRepository, PgMealPlanRepository, PgQueueRepository,
    PgRatingRepository, PgRecipeRepository, PgTagRepository, PgTicketRepository,
    PgUserRepository,
};
