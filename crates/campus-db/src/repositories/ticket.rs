//! PostgreSQL implementation of TicketRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use campus_core::{
    DomainError, RepoResult, Snowflake, Ticket, TicketMessage, TicketRepository,
};

use crate::models::{TicketMessageModel, TicketModel};

use super::error::{map_db_error, map_foreign_key_violation};

const TICKET_COLUMNS: &str =
    "id, queue_id, user_id, agent_id, title, is_closed, created_at, updated_at";

#[derive(Clone)]
pub struct PgTicketRepository {
    pool: PgPool,
}

impl PgTicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_tickets(&self, sql: &str, bind: Option<i64>) -> RepoResult<Vec<Ticket>> {
        let mut query = sqlx::query_as::<_, TicketModel>(sql);
        if let Some(id) = bind {
            query = query.bind(id);
        }
        let rows = query.fetch_all(&self.pool).await.map_err(map_db_error)?;
        Ok(rows.into_iter().map(Ticket::from).collect())
    }
}

#[async_trait]
impl TicketRepository for PgTicketRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Ticket>> {
        let result = sqlx::query_as::<_, TicketModel>(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Ticket::from))
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> RepoResult<Vec<Ticket>> {
        self.fetch_tickets(
            &format!("SELECT {TICKET_COLUMNS} FROM tickets ORDER BY created_at DESC, id DESC"),
            None,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn list_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<Ticket>> {
        self.fetch_tickets(
            &format!(
                "SELECT {TICKET_COLUMNS} FROM tickets WHERE user_id = $1 \
                 ORDER BY created_at DESC, id DESC"
            ),
            Some(user_id.into_inner()),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn list_open_by_agent(&self, agent_id: Snowflake) -> RepoResult<Vec<Ticket>> {
        self.fetch_tickets(
            &format!(
                "SELECT {TICKET_COLUMNS} FROM tickets WHERE agent_id = $1 AND NOT is_closed \
                 ORDER BY created_at DESC, id DESC"
            ),
            Some(agent_id.into_inner()),
        )
        .await
    }

    #[instrument(skip(self, ticket, first_message), fields(ticket_id = %ticket.id))]
    async fn create(&self, ticket: &Ticket, first_message: &TicketMessage) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO tickets (id, queue_id, user_id, agent_id, title, is_closed,
                                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(ticket.id.into_inner())
        .bind(ticket.queue_id.into_inner())
        .bind(ticket.user_id.into_inner())
        .bind(ticket.agent_id.map(Snowflake::into_inner))
        .bind(&ticket.title)
        .bind(ticket.is_closed)
        .bind(ticket.created_at)
        .bind(ticket.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_foreign_key_violation(e, || DomainError::QueueNotFound(ticket.queue_id)))?;

        sqlx::query(
            r"
            INSERT INTO ticket_messages (id, ticket_id, sender, text, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(first_message.id.into_inner())
        .bind(first_message.ticket_id.into_inner())
        .bind(first_message.sender.as_str())
        .bind(&first_message.text)
        .bind(first_message.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn claim(&self, id: Snowflake, agent_id: Snowflake) -> RepoResult<bool> {
        // single conditional update so concurrent claims cannot both win
        let result = sqlx::query(
            r"
            UPDATE tickets
            SET agent_id = $2, updated_at = NOW()
            WHERE id = $1 AND agent_id IS NULL AND NOT is_closed
            ",
        )
        .bind(id.into_inner())
        .bind(agent_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn close(&self, id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE tickets
            SET is_closed = TRUE, updated_at = NOW()
            WHERE id = $1 AND NOT is_closed
            ",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self, message), fields(ticket_id = %message.ticket_id))]
    async fn add_message(&self, message: &TicketMessage) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO ticket_messages (id, ticket_id, sender, text, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(message.id.into_inner())
        .bind(message.ticket_id.into_inner())
        .bind(message.sender.as_str())
        .bind(&message.text)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_foreign_key_violation(e, || DomainError::TicketNotFound(message.ticket_id)))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn messages(&self, ticket_id: Snowflake) -> RepoResult<Vec<TicketMessage>> {
        let rows = sqlx::query_as::<_, TicketMessageModel>(
            r"
            SELECT id, ticket_id, sender, text, created_at
            FROM ticket_messages
            WHERE ticket_id = $1
            ORDER BY created_at, id
            ",
        )
        .bind(ticket_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(TicketMessage::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgTicketRepository>();
    }
}
