//! Ticket entity and its conversation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::entities::User;
use crate::error::DomainError;
use crate::value_objects::{Role, Snowflake, UnknownVariant};

/// Support request filed by a user in a queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: Snowflake,
    pub queue_id: Snowflake,
    /// Owner of the ticket
    pub user_id: Snowflake,
    /// Assigned agent, `None` until claimed
    pub agent_id: Option<Snowflake>,
    pub title: String,
    pub is_closed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    pub fn new(id: Snowflake, queue_id: Snowflake, user_id: Snowflake, title: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            queue_id,
            user_id,
            agent_id: None,
            title,
            is_closed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Owner, assigned agent and admins may see a ticket
    pub fn is_visible_to(&self, viewer: &User, viewer_agent_id: Option<Snowflake>) -> bool {
        if viewer.is_admin() || self.user_id == viewer.id {
            return true;
        }
        matches!((self.agent_id, viewer_agent_id), (Some(a), Some(b)) if a == b)
    }

    #[inline]
    pub fn is_claimed(&self) -> bool {
        self.agent_id.is_some()
    }
}

/// Side of the conversation a message came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageSender {
    User,
    Agent,
}

impl MessageSender {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Agent => "agent",
        }
    }

    /// Sender for a caller of the given role; admins only read
    pub fn for_role(role: Role) -> Result<Self, DomainError> {
        match role {
            Role::User => Ok(Self::User),
            Role::Agent => Ok(Self::Agent),
            Role::Admin => Err(DomainError::AdminCannotPost),
        }
    }
}

impl fmt::Display for MessageSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageSender {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "agent" => Ok(Self::Agent),
            _ => Err(UnknownVariant::new("message sender", s)),
        }
    }
}

/// One message in a ticket conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketMessage {
    pub id: Snowflake,
    pub ticket_id: Snowflake,
    pub sender: MessageSender,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl TicketMessage {
    pub const MAX_LENGTH: usize = 5000;

    /// Create a message from raw input; the text is trimmed
    pub fn new(
        id: Snowflake,
        ticket_id: Snowflake,
        sender: MessageSender,
        text: &str,
    ) -> Result<Self, DomainError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::EmptyMessage);
        }
        if text.chars().count() > Self::MAX_LENGTH {
            return Err(DomainError::ContentTooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self {
            id,
            ticket_id,
            sender,
            text: text.to_string(),
            created_at: Utc::now(),
        })
    }
}
