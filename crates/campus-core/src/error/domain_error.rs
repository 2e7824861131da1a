//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{Role, Snowflake};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    #[error("Queue not found: {0}")]
    QueueNotFound(Snowflake),

    #[error("Agent not found: {0}")]
    AgentNotFound(Snowflake),

    #[error("Ticket not found: {0}")]
    TicketNotFound(Snowflake),

    #[error("Ingredient not found: {0}")]
    IngredientNotFound(Snowflake),

    #[error("Tag not found: {0}")]
    TagNotFound(Snowflake),

    #[error("Not found")]
    RecipeNotFound(Snowflake),

    #[error("Meal plan entry not found: {0}")]
    MealPlanEntryNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("Message text must not be empty")]
    EmptyMessage,

    #[error("Capacity out of range!")]
    CapacityOutOfRange,

    #[error("Score must be between 1 and 5")]
    InvalidScore,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("This action requires the {0} role")]
    RoleRequired(Role),

    #[error("Only ticket owner can rate")]
    NotTicketOwner,

    #[error("Only the author can modify this recipe")]
    NotRecipeAuthor,

    #[error("Meal plan entry belongs to another user")]
    NotMealPlanOwner,

    #[error("Admins cannot post ticket messages")]
    AdminCannotPost,

    #[error("You cannot delete yourself")]
    CannotDeleteSelf,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("User with this email already exists")]
    EmailAlreadyExists,

    #[error("This queue already exist!")]
    QueueAlreadyExists,

    #[error("Queue still has tickets")]
    QueueInUse,

    #[error("Tag already exists")]
    TagAlreadyExists,

    #[error("Ticket not found or already claimed")]
    TicketAlreadyClaimed,

    #[error("Ticket already rated")]
    TicketAlreadyRated,

    #[error("Meal already planned for this slot")]
    MealAlreadyPlanned,

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("You cannot take more than {capacity} tickets.")]
    CapacityReached { capacity: i32 },

    #[error("Ticket closed!")]
    TicketClosed,

    #[error("Ticket already closed!")]
    TicketAlreadyClosed,

    #[error("Ticket must be closed before rating")]
    TicketNotClosed,

    #[error("Ticket has no assigned agent")]
    TicketUnassigned,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::QueueNotFound(_) => "UNKNOWN_QUEUE",
            Self::AgentNotFound(_) => "UNKNOWN_AGENT",
            Self::TicketNotFound(_) => "UNKNOWN_TICKET",
            Self::IngredientNotFound(_) => "UNKNOWN_INGREDIENT",
            Self::TagNotFound(_) => "UNKNOWN_TAG",
            Self::RecipeNotFound(_) => "UNKNOWN_RECIPE",
            Self::MealPlanEntryNotFound(_) => "UNKNOWN_MEAL_PLAN_ENTRY",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::WeakPassword(_) => "WEAK_PASSWORD",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::EmptyMessage => "EMPTY_MESSAGE",
            Self::CapacityOutOfRange => "CAPACITY_OUT_OF_RANGE",
            Self::InvalidScore => "INVALID_SCORE",

            // Authorization
            Self::RoleRequired(_) => "ROLE_REQUIRED",
            Self::NotTicketOwner => "NOT_TICKET_OWNER",
            Self::NotRecipeAuthor => "NOT_RECIPE_AUTHOR",
            Self::NotMealPlanOwner => "NOT_MEAL_PLAN_OWNER",
            Self::AdminCannotPost => "ADMIN_CANNOT_POST",
            Self::CannotDeleteSelf => "CANNOT_DELETE_SELF",

            // Conflict
            Self::EmailAlreadyExists => "USER_ALREADY_EXISTS",
            Self::QueueAlreadyExists => "QUEUE_ALREADY_EXISTS",
            Self::QueueInUse => "QUEUE_IN_USE",
            Self::TagAlreadyExists => "TAG_ALREADY_EXISTS",
            Self::TicketAlreadyClaimed => "TICKET_ALREADY_CLAIMED",
            Self::TicketAlreadyRated => "TICKET_ALREADY_RATED",
            Self::MealAlreadyPlanned => "MEAL_ALREADY_EXISTS",

            // Business Rules
            Self::CapacityReached { .. } => "CAPACITY_REACHED",
            Self::TicketClosed => "TICKET_CLOSED",
            Self::TicketAlreadyClosed => "TICKET_ALREADY_CLOSED",
            Self::TicketNotClosed => "TICKET_NOT_CLOSED",
            Self::TicketUnassigned => "TICKET_UNASSIGNED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::QueueNotFound(_)
                | Self::AgentNotFound(_)
                | Self::TicketNotFound(_)
                | Self::IngredientNotFound(_)
                | Self::TagNotFound(_)
                | Self::RecipeNotFound(_)
                | Self::MealPlanEntryNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::WeakPassword(_)
                | Self::ContentTooLong { .. }
                | Self::EmptyMessage
                | Self::CapacityOutOfRange
                | Self::InvalidScore
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::RoleRequired(_)
                | Self::NotTicketOwner
                | Self::NotRecipeAuthor
                | Self::NotMealPlanOwner
                | Self::AdminCannotPost
                | Self::CannotDeleteSelf
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::EmailAlreadyExists
                | Self::QueueAlreadyExists
                | Self::QueueInUse
                | Self::TagAlreadyExists
                | Self::TicketAlreadyClaimed
                | Self::TicketAlreadyRated
                | Self::MealAlreadyPlanned
        )
    }

    /// Check if this is a violated business rule (rendered as 400)
    pub fn is_business_rule(&self) -> bool {
        matches!(
            self,
            Self::CapacityReached { .. }
                | Self::TicketClosed
                | Self::TicketAlreadyClosed
                | Self::TicketNotClosed
                | Self::TicketUnassigned
        )
    }

    /// HTTP status this error maps to
    pub fn status_code(&self) -> u16 {
        if self.is_not_found() {
            404
        } else if self.is_authorization() {
            403
        } else if self.is_validation() || self.is_business_rule() {
            400
        } else if self.is_conflict() {
            409
        } else {
            500
        }
    }
}
