//! Response DTOs for API endpoints
//!
//! Snowflake ids serialize as strings for JavaScript compatibility.

use campus_core::{AgentLevel, AgentRating, MealType, MessageSender, Role, Snowflake};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// Common Response Types
// ============================================================================

/// Offset pagination with `total_pages`
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: i64,
}

/// Recipe listing; same shape as [`PaginatedResponse`] with `pages`
#[derive(Debug, Serialize)]
pub struct RecipePageResponse {
    pub items: Vec<RecipeResponse>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub pages: i64,
}

// ============================================================================
// Auth / User Responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

/// User without credentials
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Snowflake,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub preferences: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Helpdesk Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct QueueResponse {
    pub id: Snowflake,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentResponse {
    pub id: Snowflake,
    pub level: AgentLevel,
    pub capacity: i32,
    pub user: UserResponse,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketResponse {
    pub id: Snowflake,
    pub queue_id: Snowflake,
    pub user_id: Snowflake,
    pub agent_id: Option<Snowflake>,
    pub title: String,
    pub is_closed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketMessageResponse {
    pub id: Snowflake,
    pub ticket_id: Snowflake,
    pub sender: MessageSender,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Ticket with its conversation and the assigned agent's rating
#[derive(Debug, Serialize)]
pub struct TicketDetailResponse {
    #[serde(flatten)]
    pub ticket: TicketResponse,
    pub messages: Vec<TicketMessageResponse>,
    pub agent_rating: Option<AgentRating>,
}

/// Agent's own view: profile, open assigned tickets, load and rating
#[derive(Debug, Serialize)]
pub struct AgentDashboardResponse {
    pub agent: AgentResponse,
    pub tickets: Vec<TicketResponse>,
    pub workload: i64,
    pub rating: AgentRating,
}

#[derive(Debug, Clone, Serialize)]
pub struct RatingResponse {
    pub id: Snowflake,
    pub ticket_id: Snowflake,
    pub agent_id: Snowflake,
    pub user_id: Snowflake,
    pub score: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Live ticket event payloads
// ============================================================================

#[derive(Debug, Serialize)]
pub struct MessageEvent<'a> {
    pub ticket_id: Snowflake,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub message: &'a TicketMessageResponse,
}

#[derive(Debug, Serialize)]
pub struct ClaimEvent<'a> {
    pub agent: &'a AgentResponse,
    pub agent_rating: AgentRating,
}

#[derive(Debug, Serialize)]
pub struct CloseEvent<'a> {
    pub agent: &'a AgentResponse,
}

// ============================================================================
// Kitchen Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct IngredientResponse {
    pub id: Snowflake,
    pub name: String,
    pub unit: String,
    pub calories: Option<i32>,
    pub is_allergen: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagResponse {
    pub id: Snowflake,
    pub name: String,
    pub kind: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeLineResponse {
    pub ingredient: IngredientResponse,
    pub amount: f64,
    pub unit: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeResponse {
    pub id: Snowflake,
    pub author_id: Snowflake,
    pub title: String,
    pub description: Option<String>,
    pub instructions: String,
    pub prep_time: i32,
    pub servings: i32,
    pub ingredients: Vec<RecipeLineResponse>,
    pub tags: Vec<TagResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MealPlanEntryResponse {
    pub id: Snowflake,
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub recipe: RecipeResponse,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Health Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    pub redis: String,
}

fn health_label(healthy: bool) -> String {
    if healthy { "healthy" } else { "unhealthy" }.to_string()
}

impl ReadinessResponse {
    pub fn new(database_healthy: bool, redis_healthy: bool) -> Self {
        Self {
            status: if database_healthy && redis_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: health_label(database_healthy),
                redis: health_label(redis_healthy),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
