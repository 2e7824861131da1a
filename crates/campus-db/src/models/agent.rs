//! Agent database models

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;

/// Database model for agents table
#[derive(Debug, Clone, FromRow)]
pub struct AgentModel {
    pub id: i64,
    pub user_id: i64,
    pub level: String,
    pub capacity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Agent joined with its account; columns are aliased to avoid clashes
#[derive(Debug, Clone, FromRow)]
pub struct AgentWithUserModel {
    pub agent_id: i64,
    pub level: String,
    pub capacity: i32,
    pub agent_created_at: DateTime<Utc>,
    pub agent_updated_at: DateTime<Utc>,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub preferences: Value,
    pub user_created_at: DateTime<Utc>,
    pub user_updated_at: DateTime<Utc>,
}

/// Aggregate over an agent's ratings
#[derive(Debug, Clone, FromRow)]
pub struct AgentRatingModel {
    /// `NULL` when the agent has no ratings
    pub avg: Option<f64>,
    pub count: i64,
}
