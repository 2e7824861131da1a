//! Queue, agent, ticket and rating mappers

use campus_core::{
    Agent, AgentLevel, AgentRating, MessageSender, Queue, Rating, Role, Snowflake, Ticket,
    TicketMessage, User,
};

use super::parse_column;
use crate::models::{
    AgentModel, AgentRatingModel, AgentWithUserModel, QueueModel, RatingModel, TicketMessageModel,
    TicketModel,
};

impl From<QueueModel> for Queue {
    fn from(model: QueueModel) -> Self {
        Queue {
            id: Snowflake::new(model.id),
            title: model.title,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<AgentModel> for Agent {
    fn from(model: AgentModel) -> Self {
        Agent {
            id: Snowflake::new(model.id),
            user_id: Snowflake::new(model.user_id),
            level: parse_column(&model.level, AgentLevel::Junior),
            capacity: model.capacity,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<AgentWithUserModel> for (Agent, User) {
    fn from(model: AgentWithUserModel) -> Self {
        let agent = Agent {
            id: Snowflake::new(model.agent_id),
            user_id: Snowflake::new(model.user_id),
            level: parse_column(&model.level, AgentLevel::Junior),
            capacity: model.capacity,
            created_at: model.agent_created_at,
            updated_at: model.agent_updated_at,
        };
        let user = User {
            id: Snowflake::new(model.user_id),
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            role: parse_column(&model.role, Role::Agent),
            preferences: model.preferences,
            created_at: model.user_created_at,
            updated_at: model.user_updated_at,
        };
        (agent, user)
    }
}

impl From<AgentRatingModel> for AgentRating {
    fn from(model: AgentRatingModel) -> Self {
        AgentRating::new(model.avg, model.count)
    }
}

impl From<TicketModel> for Ticket {
    fn from(model: TicketModel) -> Self {
        Ticket {
            id: Snowflake::new(model.id),
            queue_id: Snowflake::new(model.queue_id),
            user_id: Snowflake::new(model.user_id),
            agent_id: model.agent_id.map(Snowflake::new),
            title: model.title,
            is_closed: model.is_closed,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<TicketMessageModel> for TicketMessage {
    fn from(model: TicketMessageModel) -> Self {
        TicketMessage {
            id: Snowflake::new(model.id),
            ticket_id: Snowflake::new(model.ticket_id),
            sender: parse_column(&model.sender, MessageSender::User),
            text: model.text,
            created_at: model.created_at,
        }
    }
}

impl From<RatingModel> for Rating {
    fn from(model: RatingModel) -> Self {
        Rating {
            id: Snowflake::new(model.id),
            ticket_id: Snowflake::new(model.ticket_id),
            agent_id: Snowflake::new(model.agent_id),
            user_id: Snowflake::new(model.user_id),
            score: model.score,
            comment: model.comment,
            created_at: model.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_agent_with_user_splits_columns() {
        let now = Utc::now();
        let (agent, user): (Agent, User) = AgentWithUserModel {
            agent_id: 7,
            level: "senior".to_string(),
            capacity: 8,
            agent_created_at: now,
            agent_updated_at: now,
            user_id: 3,
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: "grace@example.com".to_string(),
            role: "agent".to_string(),
            preferences: serde_json::json!({}),
            user_created_at: now,
            user_updated_at: now,
        }
        .into();

        assert_eq!(agent.id, Snowflake::new(7));
        assert_eq!(agent.user_id, user.id);
        assert_eq!(agent.level, AgentLevel::Senior);
        assert_eq!(user.role, Role::Agent);
    }

    #[test]
    fn test_rating_summary_without_ratings() {
        let rating = AgentRating::from(AgentRatingModel { avg: None, count: 0 });
        assert_eq!(rating, AgentRating::default());
    }

    #[test]
    fn test_unknown_sender_falls_back_to_user() {
        let message = TicketMessage::from(TicketMessageModel {
            id: 1,
            ticket_id: 2,
            sender: "robot".to_string(),
            text: "beep".to_string(),
            created_at: Utc::now(),
        });
        assert_eq!(message.sender, MessageSender::User);
    }
}
