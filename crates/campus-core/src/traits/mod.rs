//! Repository traits (ports)

mod repositories;

pub use repositories::{
    AgentRepository, IngredientRef, IngredientRepository, MealPlanRepository, NewRecipeLine,
    Page, PageRequest, QueueRepository, RatingRepository, RecipeFilter, RecipeRepository,
    RepoResult, TagRepository, TicketRepository, UserFilter, UserRepository,
};
