//! PostgreSQL implementation of RecipeRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use campus_core::{
    DomainError, IngredientRef, NewRecipeLine, Page, PageRequest, Recipe, RecipeFilter,
    RecipeIngredient, RecipeRepository, RepoResult, Snowflake, Tag,
};

use crate::models::{RecipeIngredientModel, RecipeModel, RecipeTagModel};

use super::error::{
    is_foreign_key_violation, map_db_error, map_foreign_key_violation, map_unique_violation,
};

const RECIPE_COLUMNS: &str = "r.id, r.author_id, r.title, r.description, r.instructions, \
                              r.prep_time, r.servings, r.created_at, r.updated_at";

// Recipe passes when it has every requested ingredient and, if given, the tag
const RECIPE_FILTER: &str = r"
    (cardinality($1::BIGINT[]) = 0 OR (
        SELECT COUNT(DISTINCT ri.ingredient_id)
        FROM recipe_ingredients ri
        WHERE ri.recipe_id = r.id AND ri.ingredient_id = ANY($1)
    ) = cardinality($1::BIGINT[]))
    AND ($2::BIGINT IS NULL OR EXISTS (
        SELECT 1 FROM recipe_tags rt WHERE rt.recipe_id = r.id AND rt.tag_id = $2
    ))
";

/// Ingredient lines of the given recipes in recipe then line order
pub(super) async fn fetch_lines(
    pool: &PgPool,
    recipe_ids: &[i64],
) -> RepoResult<Vec<RecipeIngredient>> {
    if recipe_ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = sqlx::query_as::<_, RecipeIngredientModel>(
        r"
        SELECT ri.recipe_id, ri.amount, ri.unit,
               i.id AS ingredient_id, i.name, i.unit AS ingredient_unit,
               i.calories, i.is_allergen
        FROM recipe_ingredients ri
        INNER JOIN ingredients i ON i.id = ri.ingredient_id
        WHERE ri.recipe_id = ANY($1)
        ORDER BY ri.recipe_id, ri.position
        ",
    )
    .bind(recipe_ids)
    .fetch_all(pool)
    .await
    .map_err(map_db_error)?;

    Ok(rows.into_iter().map(RecipeIngredient::from).collect())
}

#[derive(Clone)]
pub struct PgRecipeRepository {
    pool: PgPool,
}

impl PgRecipeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn dedup_ids(ids: &[Snowflake]) -> Vec<i64> {
    let mut raw: Vec<i64> = ids.iter().map(|id| id.into_inner()).collect();
    raw.sort_unstable();
    raw.dedup();
    raw
}

#[async_trait]
impl RecipeRepository for PgRecipeRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Recipe>> {
        let result = sqlx::query_as::<_, RecipeModel>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes r WHERE r.id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Recipe::from))
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: &RecipeFilter, page: PageRequest) -> RepoResult<Page<Recipe>> {
        let ingredient_ids = dedup_ids(&filter.ingredient_ids);
        let tag_id = filter.tag_id.map(Snowflake::into_inner);

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM recipes r WHERE {RECIPE_FILTER}"
        ))
        .bind(&ingredient_ids)
        .bind(tag_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        let rows = sqlx::query_as::<_, RecipeModel>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes r WHERE {RECIPE_FILTER} \
             ORDER BY r.created_at DESC, r.id DESC LIMIT $3 OFFSET $4"
        ))
        .bind(&ingredient_ids)
        .bind(tag_id)
        .bind(i64::from(page.limit))
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Page::new(
            rows.into_iter().map(Recipe::from).collect(),
            total,
            page,
        ))
    }

    #[instrument(skip(self, recipe_ids), fields(count = recipe_ids.len()))]
    async fn ingredients_for(&self, recipe_ids: &[Snowflake]) -> RepoResult<Vec<RecipeIngredient>> {
        fetch_lines(&self.pool, &dedup_ids(recipe_ids)).await
    }

    #[instrument(skip(self, recipe_ids), fields(count = recipe_ids.len()))]
    async fn tags_for(&self, recipe_ids: &[Snowflake]) -> RepoResult<Vec<(Snowflake, Tag)>> {
        if recipe_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, RecipeTagModel>(
            r"
            SELECT rt.recipe_id, t.id, t.name, t.kind
            FROM recipe_tags rt
            INNER JOIN tags t ON t.id = rt.tag_id
            WHERE rt.recipe_id = ANY($1)
            ORDER BY rt.recipe_id, t.name
            ",
        )
        .bind(dedup_ids(recipe_ids))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(<(Snowflake, Tag)>::from).collect())
    }

    #[instrument(skip(self, recipe, lines, tag_ids), fields(recipe_id = %recipe.id))]
    async fn create(
        &self,
        recipe: &Recipe,
        lines: &[NewRecipeLine],
        tag_ids: &[Snowflake],
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO recipes (id, author_id, title, description, instructions,
                                 prep_time, servings, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(recipe.id.into_inner())
        .bind(recipe.author_id.into_inner())
        .bind(&recipe.title)
        .bind(&recipe.description)
        .bind(&recipe.instructions)
        .bind(recipe.prep_time)
        .bind(recipe.servings)
        .bind(recipe.created_at)
        .bind(recipe.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_foreign_key_violation(e, || DomainError::UserNotFound(recipe.author_id)))?;

        for (position, line) in lines.iter().enumerate() {
            let ingredient_id = match &line.ingredient {
                IngredientRef::Existing(id) => id.into_inner(),
                IngredientRef::Named { id, name } => {
                    // no-op update so RETURNING yields the existing row's id
                    sqlx::query_scalar::<_, i64>(
                        r"
                        INSERT INTO ingredients (id, name, unit)
                        VALUES ($1, $2, $3)
                        ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
                        RETURNING id
                        ",
                    )
                    .bind(id.into_inner())
                    .bind(name)
                    .bind(&line.unit)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(map_db_error)?
                }
            };

            sqlx::query(
                r"
                INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount, unit, position)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(recipe.id.into_inner())
            .bind(ingredient_id)
            .bind(line.amount)
            .bind(&line.unit)
            .bind(position as i32)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    DomainError::IngredientNotFound(Snowflake::new(ingredient_id))
                } else {
                    map_unique_violation(e, || {
                        DomainError::ValidationError("duplicate ingredient".to_string())
                    })
                }
            })?;
        }

        for tag_id in tag_ids {
            sqlx::query(
                r"
                INSERT INTO recipe_tags (recipe_id, tag_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                ",
            )
            .bind(recipe.id.into_inner())
            .bind(tag_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_foreign_key_violation(e, || DomainError::TagNotFound(*tag_id)))?;
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self, recipe), fields(recipe_id = %recipe.id))]
    async fn update(&self, recipe: &Recipe) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE recipes
            SET title = $2, description = $3, instructions = $4,
                prep_time = $5, servings = $6, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(recipe.id.into_inner())
        .bind(&recipe.title)
        .bind(&recipe.description)
        .bind(&recipe.instructions)
        .bind(recipe.prep_time)
        .bind(recipe.servings)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::RecipeNotFound(recipe.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::RecipeNotFound(id));
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
        assert_send_sync::<PgRecipeRepository>();
    }

    #[test]
    fn test_dedup_ids() {
        let ids = [Snowflake::new(3), Snowflake::new(1), Snowflake::new(3)];
        assert_eq!(dedup_ids(&ids), vec![1, 3]);
        assert!(dedup_ids(&[]).is_empty());
    }
}
