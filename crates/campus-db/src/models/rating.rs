//! Rating database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct RatingModel {
    pub id: i64,
    pub ticket_id: i64,
    pub agent_id: i64,
    pub user_id: i64,
    pub score: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}
