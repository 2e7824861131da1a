//! Database models - SQLx-compatible structs for PostgreSQL tables

mod agent;
mod kitchen;
mod meal_plan;
mod queue;
mod rating;
mod ticket;
mod user;

pub use agent::{AgentModel, AgentRatingModel, AgentWithUserModel};
pub use kitchen::{IngredientModel, RecipeIngredientModel, RecipeModel, RecipeTagModel, TagModel};
pub use meal_plan::MealPlanModel;
pub use queue::QueueModel;
pub use rating::RatingModel;
pub use ticket::{TicketMessageModel, TicketModel};
pub use user::UserModel;
