//! Domain entities - core business objects

mod agent;
mod ingredient;
mod meal_plan;
mod queue;
mod rating;
mod recipe;
mod tag;
mod ticket;
mod user;

pub use agent::{Agent, AgentRating};
pub use ingredient::Ingredient;
pub use meal_plan::{MealPlanEntry, PlannedMeal};
pub use queue::Queue;
pub use rating::Rating;
pub use recipe::{Recipe, RecipeIngredient};
pub use tag::Tag;
pub use ticket::{MessageSender, Ticket, TicketMessage};
pub use user::User;
