//! PostgreSQL implementation of TagRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use campus_core::{DomainError, RepoResult, Snowflake, Tag, TagRepository};

use crate::models::TagModel;

use super::error::{map_db_error, map_unique_violation};

#[derive(Clone)]
pub struct PgTagRepository {
    pool: PgPool,
}

impl PgTagRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagRepository for PgTagRepository {
    #[instrument(skip(self))]
    async fn list(&self) -> RepoResult<Vec<Tag>> {
        let rows = sqlx::query_as::<_, TagModel>("SELECT id, name, kind FROM tags ORDER BY kind, name")
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Tag::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Tag>> {
        let result = sqlx::query_as::<_, TagModel>("SELECT id, name, kind FROM tags WHERE id = $1")
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(Tag::from))
    }

    #[instrument(skip(self, tag), fields(tag = %tag.name))]
    async fn create(&self, tag: &Tag) -> RepoResult<()> {
        sqlx::query("INSERT INTO tags (id, name, kind) VALUES ($1, $2, $3)")
            .bind(tag.id.into_inner())
            .bind(&tag.name)
            .bind(&tag.kind)
            .execute(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, || DomainError::TagAlreadyExists))?;

        Ok(())
    }
}
