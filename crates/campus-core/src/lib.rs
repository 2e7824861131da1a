//! # campus-core
//!
//! Domain layer for the helpdesk and kitchen applications: entities, value objects,
//! repository traits, and the meal-plan ingredient aggregation.
//! This crate has no dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod kitchen;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Agent, AgentRating, Ingredient, MealPlanEntry, MessageSender, PlannedMeal, Queue, Rating,
    Recipe, RecipeIngredient, Tag, Ticket, TicketMessage, User,
};
pub use error::DomainError;
pub use kitchen::{aggregate_ingredients, shopping_list, IngredientTotal, ShoppingItem};
pub use traits::{
    AgentRepository, IngredientRef, IngredientRepository, MealPlanRepository, NewRecipeLine,
    Page, PageRequest, QueueRepository, RatingRepository, RecipeFilter, RecipeRepository,
    RepoResult, TagRepository, TicketRepository, UserFilter, UserRepository,
};
pub use value_objects::{
    AgentLevel, MealType, Role, Snowflake, SnowflakeGenerator, SnowflakeParseError,
    UnknownVariant,
};
