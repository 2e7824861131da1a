//! PostgreSQL implementation of RatingRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use campus_core::{DomainError, Rating, RatingRepository, RepoResult, Snowflake};

use crate::models::RatingModel;

use super::error::{map_db_error, map_unique_violation};

#[derive(Clone)]
pub struct PgRatingRepository {
    pool: PgPool,
}

impl PgRatingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RatingRepository for PgRatingRepository {
    #[instrument(skip(self))]
    async fn find_by_ticket(&self, ticket_id: Snowflake) -> RepoResult<Option<Rating>> {
        let result = sqlx::query_as::<_, RatingModel>(
            r"
            SELECT id, ticket_id, agent_id, user_id, score, comment, created_at
            FROM ratings
            WHERE ticket_id = $1
            ",
        )
        .bind(ticket_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Rating::from))
    }

    #[instrument(skip(self, rating), fields(ticket_id = %rating.ticket_id))]
    async fn create(&self, rating: &Rating) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO ratings (id, ticket_id, agent_id, user_id, score, comment, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(rating.id.into_inner())
        .bind(rating.ticket_id.into_inner())
        .bind(rating.agent_id.into_inner())
        .bind(rating.user_id.into_inner())
        .bind(rating.score)
        .bind(&rating.comment)
        .bind(rating.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::TicketAlreadyRated))?;

        Ok(())
    }
}
