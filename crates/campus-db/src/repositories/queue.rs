//! PostgreSQL implementation of QueueRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use campus_core::{DomainError, Queue, QueueRepository, RepoResult, Snowflake};

use crate::models::QueueModel;

use super::error::{map_db_error, map_foreign_key_violation, map_unique_violation};

#[derive(Clone)]
pub struct PgQueueRepository {
    pool: PgPool,
}

impl PgQueueRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueueRepository for PgQueueRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Queue>> {
        let result = sqlx::query_as::<_, QueueModel>(
            "SELECT id, title, created_at, updated_at FROM queues WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Queue::from))
    }

    #[instrument(skip(self))]
    async fn list(&self) -> RepoResult<Vec<Queue>> {
        let rows = sqlx::query_as::<_, QueueModel>(
            "SELECT id, title, created_at, updated_at FROM queues ORDER BY title",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Queue::from).collect())
    }

    #[instrument(skip(self, queue), fields(queue_id = %queue.id))]
    async fn create(&self, queue: &Queue) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO queues (id, title, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(queue.id.into_inner())
        .bind(&queue.title)
        .bind(queue.created_at)
        .bind(queue.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::QueueAlreadyExists))?;

        Ok(())
    }

    #[instrument(skip(self, queue), fields(queue_id = %queue.id))]
    async fn update(&self, queue: &Queue) -> RepoResult<()> {
        let result = sqlx::query("UPDATE queues SET title = $2, updated_at = NOW() WHERE id = $1")
            .bind(queue.id.into_inner())
            .bind(&queue.title)
            .execute(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, || DomainError::QueueAlreadyExists))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::QueueNotFound(queue.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM queues WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(|e| map_foreign_key_violation(e, || DomainError::QueueInUse))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::QueueNotFound(id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgQueueRepository>();
    }
}
