//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in campus-core.

mod agent;
mod error;
mod ingredient;
mod meal_plan;
mod queue;
mod rating;
mod recipe;
mod tag;
mod ticket;
mod user;

pub use agent::PgAgentRepository;
pub use ingredient::PgIngredientRepository;
pub use meal_plan::PgMealPlanRepository;
pub use queue::PgQueueRepository;
pub use rating::PgRatingRepository;
pub use recipe::PgRecipeRepository;
pub use tag::PgTagRepository;
pub use ticket::PgTicketRepository;
pub use user::PgUserRepository;
