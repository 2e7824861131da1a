//! Ticket and ticket message database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct TicketModel {
    pub id: i64,
    pub queue_id: i64,
    pub user_id: i64,
    pub agent_id: Option<i64>,
    pub title: String,
    pub is_closed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct TicketMessageModel {
    pub id: i64,
    pub ticket_id: i64,
    pub sender: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}
