//! PostgreSQL implementation of MealPlanRepository

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::instrument;

use campus_core::{
    DomainError, MealPlanEntry, MealPlanRepository, PlannedMeal, Recipe, RepoResult, Snowflake,
};

use crate::models::{MealPlanModel, RecipeModel};

use super::error::{is_foreign_key_violation, map_db_error, map_unique_violation};
use super::recipe::fetch_lines;

#[derive(Clone)]
pub struct PgMealPlanRepository {
    pool: PgPool,
}

impl PgMealPlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MealPlanRepository for PgMealPlanRepository {
    #[instrument(skip(self, entry), fields(user_id = %entry.user_id, date = %entry.date))]
    async fn create(&self, entry: &MealPlanEntry) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO meal_plans (id, user_id, recipe_id, date, meal_type, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(entry.id.into_inner())
        .bind(entry.user_id.into_inner())
        .bind(entry.recipe_id.into_inner())
        .bind(entry.date)
        .bind(entry.meal_type.as_str())
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                DomainError::RecipeNotFound(entry.recipe_id)
            } else {
                map_unique_violation(e, || DomainError::MealAlreadyPlanned)
            }
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<MealPlanEntry>> {
        let result = sqlx::query_as::<_, MealPlanModel>(
            "SELECT id, user_id, recipe_id, date, meal_type, created_at FROM meal_plans WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(MealPlanEntry::from))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM meal_plans WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::MealPlanEntryNotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_for_day(&self, user_id: Snowflake, date: NaiveDate) -> RepoResult<Vec<PlannedMeal>> {
        let entries = sqlx::query_as::<_, MealPlanModel>(
            r"
            SELECT id, user_id, recipe_id, date, meal_type, created_at
            FROM meal_plans
            WHERE user_id = $1 AND date = $2
            ORDER BY CASE meal_type
                         WHEN 'breakfast' THEN 0
                         WHEN 'lunch' THEN 1
                         ELSE 2
                     END,
                     created_at
            ",
        )
        .bind(user_id.into_inner())
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let mut recipe_ids: Vec<i64> = entries.iter().map(|e| e.recipe_id).collect();
        recipe_ids.sort_unstable();
        recipe_ids.dedup();

        let recipes: HashMap<Snowflake, Recipe> = sqlx::query_as::<_, RecipeModel>(
            r"
            SELECT id, author_id, title, description, instructions,
                   prep_time, servings, created_at, updated_at
            FROM recipes
            WHERE id = ANY($1)
            ",
        )
        .bind(&recipe_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?
        .into_iter()
        .map(|model| {
            let recipe = Recipe::from(model);
            (recipe.id, recipe)
        })
        .collect();

        let mut lines: HashMap<Snowflake, Vec<_>> = HashMap::new();
        for line in fetch_lines(&self.pool, &recipe_ids).await? {
            lines.entry(line.recipe_id).or_default().push(line);
        }

        // recipes cascade to entries, so every entry has its recipe
        Ok(entries
            .into_iter()
            .filter_map(|model| {
                let entry = MealPlanEntry::from(model);
                let recipe = recipes.get(&entry.recipe_id)?.clone();
                let ingredients = lines.get(&entry.recipe_id).cloned().unwrap_or_default();
                Some(PlannedMeal {
                    entry,
                    recipe,
                    ingredients,
                })
            })
            .collect())
    }
}
