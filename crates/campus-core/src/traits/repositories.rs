//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::entities::{
    Agent, AgentRating, Ingredient, MealPlanEntry, PlannedMeal, Queue, Rating, Recipe,
    RecipeIngredient, Tag, Ticket, TicketMessage, User,
};
use crate::error::DomainError;
use crate::value_objects::{Role, Snowflake};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Pagination
// ============================================================================

/// 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Rows to skip
    #[inline]
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }
}

/// One page of results plus the total number of matching rows
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            limit: request.limit,
        }
    }

    /// Number of pages needed for `total` rows (0 when empty)
    pub fn total_pages(&self) -> i64 {
        let limit = i64::from(self.limit.max(1));
        (self.total + limit - 1) / limit
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
        }
    }
}

// ============================================================================
// User Repository
// ============================================================================

/// Admin user search
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Case-insensitive substring of first name, last name or email
    pub query: Option<String>,
    pub role: Option<Role>,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Check if email is already taken
    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Create a new user
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()>;

    /// Update names, email, role and preferences
    async fn update(&self, user: &User) -> RepoResult<()>;

    /// Delete a user and everything they own
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>>;

    /// Update password hash
    async fn update_password(&self, id: Snowflake, password_hash: &str) -> RepoResult<()>;

    /// Search users, newest first
    async fn list(&self, filter: &UserFilter, page: PageRequest) -> RepoResult<Page<User>>;
}

// ============================================================================
// Queue Repository
// ============================================================================

#[async_trait]
pub trait QueueRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Queue>>;

    /// All queues ordered by title
    async fn list(&self) -> RepoResult<Vec<Queue>>;

    async fn create(&self, queue: &Queue) -> RepoResult<()>;

    async fn update(&self, queue: &Queue) -> RepoResult<()>;

    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Agent Repository
// ============================================================================

#[async_trait]
pub trait AgentRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Agent>>;

    /// Agent profile of a user, if any
    async fn find_by_user_id(&self, user_id: Snowflake) -> RepoResult<Option<Agent>>;

    /// All agents with their accounts
    async fn list(&self) -> RepoResult<Vec<(Agent, User)>>;

    /// Create the account and the agent profile atomically
    async fn create_with_user(&self, user: &User, password_hash: &str, agent: &Agent)
        -> RepoResult<()>;

    /// Update level and capacity
    async fn update(&self, agent: &Agent) -> RepoResult<()>;

    /// Delete the agent together with its account
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Number of open tickets assigned to the agent
    async fn workload(&self, id: Snowflake) -> RepoResult<i64>;

    /// Average score and rating count
    async fn rating_summary(&self, id: Snowflake) -> RepoResult<AgentRating>;
}

// ============================================================================
// Ticket Repository
// ============================================================================

#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Ticket>>;

    /// Every ticket, newest first
    async fn list_all(&self) -> RepoResult<Vec<Ticket>>;

    /// Tickets owned by a user, newest first
    async fn list_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<Ticket>>;

    /// Open tickets assigned to an agent, newest first
    async fn list_open_by_agent(&self, agent_id: Snowflake) -> RepoResult<Vec<Ticket>>;

    /// Insert a ticket with its first message
    async fn create(&self, ticket: &Ticket, first_message: &TicketMessage) -> RepoResult<()>;

    /// Assign an unclaimed open ticket; `false` when it was already taken, closed or missing
    async fn claim(&self, id: Snowflake, agent_id: Snowflake) -> RepoResult<bool>;

    /// Close an open ticket; `false` when it was already closed or missing
    async fn close(&self, id: Snowflake) -> RepoResult<bool>;

    async fn add_message(&self, message: &TicketMessage) -> RepoResult<()>;

    /// Conversation in chronological order
    async fn messages(&self, ticket_id: Snowflake) -> RepoResult<Vec<TicketMessage>>;
}

// ============================================================================
// Rating Repository
// ============================================================================

#[async_trait]
pub trait RatingRepository: Send + Sync {
    async fn find_by_ticket(&self, ticket_id: Snowflake) -> RepoResult<Option<Rating>>;

    /// Insert a rating; a second rating for the same ticket is a conflict
    async fn create(&self, rating: &Rating) -> RepoResult<()>;
}

// ============================================================================
// Ingredient / Tag Repositories
// ============================================================================

#[async_trait]
pub trait IngredientRepository: Send + Sync {
    /// All ingredients ordered by name
    async fn list(&self) -> RepoResult<Vec<Ingredient>>;

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Ingredient>>;
}

#[async_trait]
pub trait TagRepository: Send + Sync {
    /// All tags ordered by kind, then name
    async fn list(&self) -> RepoResult<Vec<Tag>>;

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Tag>>;

    async fn create(&self, tag: &Tag) -> RepoResult<()>;
}

// ============================================================================
// Recipe Repository
// ============================================================================

/// Recipe search
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    /// Recipe must contain every one of these ingredients
    pub ingredient_ids: Vec<Snowflake>,
    pub tag_id: Option<Snowflake>,
}

/// Ingredient reference on a new recipe line
#[derive(Debug, Clone, PartialEq)]
pub enum IngredientRef {
    /// Catalogue ingredient
    Existing(Snowflake),
    /// Ingredient looked up by name and created with `id` when absent
    Named { id: Snowflake, name: String },
}

/// Ingredient line of a recipe being written
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecipeLine {
    pub ingredient: IngredientRef,
    pub amount: f64,
    pub unit: String,
}

#[async_trait]
pub trait RecipeRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Recipe>>;

    /// Filtered recipes, newest first
    async fn list(&self, filter: &RecipeFilter, page: PageRequest) -> RepoResult<Page<Recipe>>;

    /// Ingredient lines of the given recipes
    async fn ingredients_for(&self, recipe_ids: &[Snowflake]) -> RepoResult<Vec<RecipeIngredient>>;

    /// `(recipe_id, tag)` pairs of the given recipes
    async fn tags_for(&self, recipe_ids: &[Snowflake]) -> RepoResult<Vec<(Snowflake, Tag)>>;

    /// Insert the recipe, its lines and tags in one transaction
    async fn create(
        &self,
        recipe: &Recipe,
        lines: &[NewRecipeLine],
        tag_ids: &[Snowflake],
    ) -> RepoResult<()>;

    /// Update the descriptive fields
    async fn update(&self, recipe: &Recipe) -> RepoResult<()>;

    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Meal Plan Repository
// ============================================================================

#[async_trait]
pub trait MealPlanRepository: Send + Sync {
    /// Insert an entry; an occupied `(user, date, meal_type)` slot is a conflict
    async fn create(&self, entry: &MealPlanEntry) -> RepoResult<()>;

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<MealPlanEntry>>;

    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    /// A user's entries for one day with recipes and ingredient lines, by meal slot
    async fn list_for_day(&self, user_id: Snowflake, date: NaiveDate) -> RepoResult<Vec<PlannedMeal>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_offset() {
        assert_eq!(PageRequest::new(1, 20).offset(), 0);
        assert_eq!(PageRequest::new(3, 10).offset(), 20);
        // page 0 is treated as the first page
        assert_eq!(PageRequest::new(0, 10).offset(), 0);
    }

    #[test]
    fn test_total_pages() {
        let page = |total| Page::<()>::new(Vec::new(), total, PageRequest::new(1, 10));
        assert_eq!(page(0).total_pages(), 0);
        assert_eq!(page(10).total_pages(), 1);
        assert_eq!(page(11).total_pages(), 2);
    }

    #[test]
    fn test_page_map_keeps_metadata() {
        let page = Page::new(vec![1, 2], 7, PageRequest::new(2, 2)).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!((page.total, page.page, page.limit), (7, 2, 2));
    }
}
