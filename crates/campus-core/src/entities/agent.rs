//! Agent entity - the support profile of a user with the agent role

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::DomainError;
use crate::value_objects::{AgentLevel, Snowflake};

/// Support agent profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    pub id: Snowflake,
    pub user_id: Snowflake,
    pub level: AgentLevel,
    /// Maximum number of open tickets the agent may hold
    pub capacity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Agent {
    pub const MIN_CAPACITY: i32 = 3;
    pub const MAX_CAPACITY: i32 = 10;
    pub const DEFAULT_CAPACITY: i32 = 5;

    pub fn new(id: Snowflake, user_id: Snowflake, level: AgentLevel, capacity: i32) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id,
            level,
            capacity,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check that a capacity lies within the allowed range
    pub fn validate_capacity(capacity: i32) -> Result<i32, DomainError> {
        if (Self::MIN_CAPACITY..=Self::MAX_CAPACITY).contains(&capacity) {
            Ok(capacity)
        } else {
            Err(DomainError::CapacityOutOfRange)
        }
    }

    /// Whether another ticket fits next to `workload` open ones
    #[inline]
    pub fn has_room(&self, workload: i64) -> bool {
        workload < i64::from(self.capacity)
    }
}

/// Average score and number of ratings an agent received
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AgentRating {
    pub avg: f64,
    pub count: i64,
}

impl AgentRating {
    /// Build from a raw average, rounded to one decimal (0 when there are no ratings)
    pub fn new(avg: Option<f64>, count: i64) -> Self {
        let avg = match avg {
            Some(avg) if count > 0 => (avg * 10.0).round() / 10.0,
            _ => 0.0,
        };
        Self { avg, count }
    }
}
