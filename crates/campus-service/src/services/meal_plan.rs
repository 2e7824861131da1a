//! Meal planning and the per-day ingredient views

use campus_core::{
    aggregate_ingredients, shopping_list, DomainError, IngredientTotal, MealPlanEntry, PlannedMeal,
    ShoppingItem, Snowflake,
};
use chrono::NaiveDate;
use tracing::{info, instrument};

use crate::dto::{CreateMealPlanRequest, MealPlanEntryResponse, RecipeResponse};

use super::access::load_caller;
use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct MealPlanService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MealPlanService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Plan a recipe into one of the caller's meal slots
    #[instrument(skip(self, request), fields(date = %request.date, meal_type = ?request.meal_type))]
    pub async fn create(
        &self,
        caller_id: Snowflake,
        request: CreateMealPlanRequest,
    ) -> ServiceResult<MealPlanEntryResponse> {
        let caller = load_caller(self.ctx, caller_id).await?;

        let recipe = self
            .ctx
            .recipe_repo()
            .find_by_id(request.recipe_id)
            .await?
            .ok_or(DomainError::RecipeNotFound(request.recipe_id))?;

        let entry = MealPlanEntry::new(
            self.ctx.generate_id(),
            caller.id,
            recipe.id,
            request.date,
            request.meal_type,
        );
        self.ctx.meal_plan_repo().create(&entry).await?;
        info!(entry_id = %entry.id, recipe_id = %recipe.id, "Meal planned");

        let lines = self.ctx.recipe_repo().ingredients_for(&[recipe.id]).await?;
        Ok(MealPlanEntryResponse {
            id: entry.id,
            date: entry.date,
            meal_type: entry.meal_type,
            created_at: entry.created_at,
            recipe: RecipeResponse::new(recipe, lines, Vec::new()),
        })
    }

    #[instrument(skip(self))]
    pub async fn list_for_day(
        &self,
        caller_id: Snowflake,
        date: NaiveDate,
    ) -> ServiceResult<Vec<MealPlanEntryResponse>> {
        let meals = self.day(caller_id, date).await?;
        Ok(meals.into_iter().map(MealPlanEntryResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, caller_id: Snowflake, entry_id: Snowflake) -> ServiceResult<()> {
        let entry = self
            .ctx
            .meal_plan_repo()
            .find_by_id(entry_id)
            .await?
            .ok_or(DomainError::MealPlanEntryNotFound(entry_id))?;
        if entry.user_id != caller_id {
            return Err(DomainError::NotMealPlanOwner.into());
        }

        self.ctx.meal_plan_repo().delete(entry.id).await?;
        Ok(())
    }

    /// Ingredient totals over the day's planned meals
    #[instrument(skip(self))]
    pub async fn summary(&self, caller_id: Snowflake, date: NaiveDate) -> ServiceResult<Vec<IngredientTotal>> {
        let meals = self.day(caller_id, date).await?;
        Ok(aggregate_ingredients(&meals))
    }

    #[instrument(skip(self))]
    pub async fn shopping(&self, caller_id: Snowflake, date: NaiveDate) -> ServiceResult<Vec<ShoppingItem>> {
        let meals = self.day(caller_id, date).await?;
        Ok(shopping_list(&meals))
    }

    async fn day(&self, caller_id: Snowflake, date: NaiveDate) -> ServiceResult<Vec<PlannedMeal>> {
        let caller = load_caller(self.ctx, caller_id).await?;
        Ok(self.ctx.meal_plan_repo().list_for_day(caller.id, date).await?)
    }
}
