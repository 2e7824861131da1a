//! Rating entity - the owner's score for the agent of a closed ticket

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rating {
    pub id: Snowflake,
    pub ticket_id: Snowflake,
    pub agent_id: Snowflake,
    pub user_id: Snowflake,
    pub score: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl Rating {
    pub const MAX_COMMENT_LENGTH: usize = 500;

    pub fn new(
        id: Snowflake,
        ticket_id: Snowflake,
        agent_id: Snowflake,
        user_id: Snowflake,
        score: i16,
        comment: Option<String>,
    ) -> Result<Self, DomainError> {
        if !(1..=5).contains(&score) {
            return Err(DomainError::InvalidScore);
        }
        let comment = comment.map(|c| c.trim().to_string()).unwrap_or_default();
        if comment.chars().count() > Self::MAX_COMMENT_LENGTH {
            return Err(DomainError::ContentTooLong {
                max: Self::MAX_COMMENT_LENGTH,
            });
        }

        Ok(Self {
            id,
            ticket_id,
            agent_id,
            user_id,
            score,
            comment,
            created_at: Utc::now(),
        })
    }
}
