//! PostgreSQL implementation of AgentRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use campus_core::{
    Agent, AgentRating, AgentRepository, DomainError, RepoResult, Snowflake, User,
};

use crate::models::{AgentModel, AgentRatingModel, AgentWithUserModel};

use super::error::{map_db_error, map_unique_violation};

#[derive(Clone)]
pub struct PgAgentRepository {
    pool: PgPool,
}

impl PgAgentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AgentRepository for PgAgentRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Agent>> {
        let result = sqlx::query_as::<_, AgentModel>(
            r"
            SELECT id, user_id, level, capacity, created_at, updated_at
            FROM agents
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Agent::from))
    }

    #[instrument(skip(self))]
    async fn find_by_user_id(&self, user_id: Snowflake) -> RepoResult<Option<Agent>> {
        let result = sqlx::query_as::<_, AgentModel>(
            r"
            SELECT id, user_id, level, capacity, created_at, updated_at
            FROM agents
            WHERE user_id = $1
            ",
        )
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Agent::from))
    }

    #[instrument(skip(self))]
    async fn list(&self) -> RepoResult<Vec<(Agent, User)>> {
        let rows = sqlx::query_as::<_, AgentWithUserModel>(
            r"
            SELECT a.id AS agent_id, a.level, a.capacity,
                   a.created_at AS agent_created_at, a.updated_at AS agent_updated_at,
                   u.id AS user_id, u.first_name, u.last_name, u.email, u.role, u.preferences,
                   u.created_at AS user_created_at, u.updated_at AS user_updated_at
            FROM agents a
            JOIN users u ON u.id = a.user_id
            ORDER BY a.created_at, a.id
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(<(Agent, User)>::from).collect())
    }

    #[instrument(skip(self, user, password_hash, agent), fields(agent_id = %agent.id))]
    async fn create_with_user(
        &self,
        user: &User,
        password_hash: &str,
        agent: &Agent,
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO users (id, first_name, last_name, email, password_hash, role, preferences,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(user.id.into_inner())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(password_hash)
        .bind(user.role.as_str())
        .bind(&user.preferences)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::EmailAlreadyExists))?;

        sqlx::query(
            r"
            INSERT INTO agents (id, user_id, level, capacity, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(agent.id.into_inner())
        .bind(agent.user_id.into_inner())
        .bind(agent.level.as_str())
        .bind(agent.capacity)
        .bind(agent.created_at)
        .bind(agent.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self, agent), fields(agent_id = %agent.id))]
    async fn update(&self, agent: &Agent) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE agents
            SET level = $2, capacity = $3, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(agent.id.into_inner())
        .bind(agent.level.as_str())
        .bind(agent.capacity)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::AgentNotFound(agent.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        // the agent row goes with its account through ON DELETE CASCADE
        let result = sqlx::query(
            r"
            DELETE FROM users
            WHERE id = (SELECT user_id FROM agents WHERE id = $1)
            ",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::AgentNotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn workload(&self, id: Snowflake) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tickets WHERE agent_id = $1 AND NOT is_closed",
        )
        .bind(id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn rating_summary(&self, id: Snowflake) -> RepoResult<AgentRating> {
        let model = sqlx::query_as::<_, AgentRatingModel>(
            r"
            SELECT AVG(score)::FLOAT8 AS avg, COUNT(*) AS count
            FROM ratings
            WHERE agent_id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(model.into())
    }
}
