//! Business logic services
//!
//! Each service borrows the shared [`ServiceContext`] and takes the caller's id;
//! role checks re-read the caller from the database.

mod access;

pub mod agent;
pub mod auth;
pub mod catalog;
pub mod context;
pub mod error;
pub mod meal_plan;
pub mod queue;
pub mod rating;
pub mod recipe;
pub mod ticket;
pub mod user;

pub use agent::AgentService;
pub use auth::AuthService;
pub use catalog::CatalogService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use meal_plan::MealPlanService;
pub use queue::QueueService;
pub use rating::RatingService;
pub use recipe::RecipeService;
pub use ticket::TicketService;
pub use user::UserService;
