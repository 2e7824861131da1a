//! PostgreSQL implementation of IngredientRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use campus_core::{Ingredient, IngredientRepository, RepoResult, Snowflake};

use crate::models::IngredientModel;

use super::error::map_db_error;

#[derive(Clone)]
pub struct PgIngredientRepository {
    pool: PgPool,
}

impl PgIngredientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IngredientRepository for PgIngredientRepository {
    #[instrument(skip(self))]
    async fn list(&self) -> RepoResult<Vec<Ingredient>> {
        let rows = sqlx::query_as::<_, IngredientModel>(
            "SELECT id, name, unit, calories, is_allergen FROM ingredients ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Ingredient::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Ingredient>> {
        let result = sqlx::query_as::<_, IngredientModel>(
            "SELECT id, name, unit, calories, is_allergen FROM ingredients WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Ingredient::from))
    }
}
