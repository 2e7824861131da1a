//! Entity to DTO mappers

use std::collections::HashMap;

use campus_core::{
    Agent, Ingredient, Page, PlannedMeal, Queue, Rating, Recipe, RecipeIngredient, Snowflake, Tag,
    Ticket, TicketMessage, User,
};

use super::responses::{
    AgentResponse, IngredientResponse, MealPlanEntryResponse, PaginatedResponse, QueueResponse, RatingResponse,
    RecipeLineResponse, RecipeResponse, TagResponse, TicketMessageResponse, TicketResponse,
    UserResponse,
};

impl<T> From<Page<T>> for PaginatedResponse<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            total_pages: page.total_pages(),
            items: page.items,
            total: page.total,
            page: page.page,
            limit: page.limit,
        }
    }
}

// ============================================================================
// Accounts
// ============================================================================

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            role: user.role,
            preferences: user.preferences.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

// ============================================================================
// Helpdesk
// ============================================================================

impl From<Queue> for QueueResponse {
    fn from(queue: Queue) -> Self {
        Self {
            id: queue.id,
            title: queue.title,
            created_at: queue.created_at,
            updated_at: queue.updated_at,
        }
    }
}

impl AgentResponse {
    pub fn new(agent: &Agent, user: &User) -> Self {
        Self {
            id: agent.id,
            level: agent.level,
            capacity: agent.capacity,
            user: UserResponse::from(user),
            created_at: agent.created_at,
            updated_at: agent.updated_at,
        }
    }
}

impl From<(Agent, User)> for AgentResponse {
    fn from((agent, user): (Agent, User)) -> Self {
        Self::new(&agent, &user)
    }
}

impl From<&Ticket> for TicketResponse {
    fn from(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id,
            queue_id: ticket.queue_id,
            user_id: ticket.user_id,
            agent_id: ticket.agent_id,
            title: ticket.title.clone(),
            is_closed: ticket.is_closed,
            created_at: ticket.created_at,
            updated_at: ticket.updated_at,
        }
    }
}

impl From<Ticket> for TicketResponse {
    fn from(ticket: Ticket) -> Self {
        Self::from(&ticket)
    }
}

impl From<TicketMessage> for TicketMessageResponse {
    fn from(message: TicketMessage) -> Self {
        Self {
            id: message.id,
            ticket_id: message.ticket_id,
            sender: message.sender,
            text: message.text,
            created_at: message.created_at,
        }
    }
}

impl From<Rating> for RatingResponse {
    fn from(rating: Rating) -> Self {
        Self {
            id: rating.id,
            ticket_id: rating.ticket_id,
            agent_id: rating.agent_id,
            user_id: rating.user_id,
            score: rating.score,
            comment: rating.comment,
            created_at: rating.created_at,
        }
    }
}

// ============================================================================
// Kitchen
// ============================================================================

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
            unit: ingredient.unit,
            calories: ingredient.calories,
            is_allergen: ingredient.is_allergen,
        }
    }
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            kind: tag.kind,
        }
    }
}

impl From<RecipeIngredient> for RecipeLineResponse {
    fn from(line: RecipeIngredient) -> Self {
        Self {
            ingredient: line.ingredient.into(),
            amount: line.amount,
            unit: line.unit,
        }
    }
}

impl RecipeResponse {
    pub fn new(recipe: Recipe, lines: Vec<RecipeIngredient>, tags: Vec<Tag>) -> Self {
        Self {
            id: recipe.id,
            author_id: recipe.author_id,
            title: recipe.title,
            description: recipe.description,
            instructions: recipe.instructions,
            prep_time: recipe.prep_time,
            servings: recipe.servings,
            ingredients: lines.into_iter().map(Into::into).collect(),
            tags: tags.into_iter().map(Into::into).collect(),
            created_at: recipe.created_at,
            updated_at: recipe.updated_at,
        }
    }

    /// Attach lines and tags loaded in bulk for several recipes
    pub fn assemble(
        recipes: Vec<Recipe>,
        lines: Vec<RecipeIngredient>,
        tags: Vec<(Snowflake, Tag)>,
    ) -> Vec<Self> {
        let mut lines_by_recipe: HashMap<Snowflake, Vec<RecipeIngredient>> = HashMap::new();
        for line in lines {
            lines_by_recipe.entry(line.recipe_id).or_default().push(line);
        }
        let mut tags_by_recipe: HashMap<Snowflake, Vec<Tag>> = HashMap::new();
        for (recipe_id, tag) in tags {
            tags_by_recipe.entry(recipe_id).or_default().push(tag);
        }

        recipes
            .into_iter()
            .map(|recipe| {
                let lines = lines_by_recipe.remove(&recipe.id).unwrap_or_default();
                let tags = tags_by_recipe.remove(&recipe.id).unwrap_or_default();
                Self::new(recipe, lines, tags)
            })
            .collect()
    }
}

impl From<PlannedMeal> for MealPlanEntryResponse {
    fn from(meal: PlannedMeal) -> Self {
        Self {
            id: meal.entry.id,
            date: meal.entry.date,
            meal_type: meal.entry.meal_type,
            created_at: meal.entry.created_at,
            recipe: RecipeResponse::new(meal.recipe, meal.ingredients, Vec::new()),
        }
    }
}
