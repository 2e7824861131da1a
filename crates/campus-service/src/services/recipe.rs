//! Recipe service

use campus_core::{
    DomainError, IngredientRef, NewRecipeLine, PageRequest, Recipe, RecipeFilter, Snowflake,
};
use chrono::Utc;
use tracing::{info, instrument};

use crate::dto::{
    CreateRecipeRequest, RecipeLineRequest, RecipeListQuery, RecipePageResponse, RecipeResponse,
    UpdateRecipeRequest,
};

use super::access::load_caller;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

pub const DEFAULT_RECIPE_LIMIT: u32 = 10;
pub const MAX_RECIPE_LIMIT: u32 = 100;

pub struct RecipeService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RecipeService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Recipes containing every listed ingredient, newest first
    #[instrument(skip(self))]
    pub async fn list(&self, query: RecipeListQuery) -> ServiceResult<RecipePageResponse> {
        let filter = RecipeFilter {
            ingredient_ids: query.ingredient_ids().map_err(ServiceError::validation)?,
            tag_id: query.tag_id,
        };
        let page = PageRequest::new(
            query.page.unwrap_or(1),
            query.limit.unwrap_or(DEFAULT_RECIPE_LIMIT).min(MAX_RECIPE_LIMIT),
        );

        let result = self.ctx.recipe_repo().list(&filter, page).await?;
        let pages = result.total_pages();
        let ids: Vec<Snowflake> = result.items.iter().map(|recipe| recipe.id).collect();
        let lines = self.ctx.recipe_repo().ingredients_for(&ids).await?;
        let tags = self.ctx.recipe_repo().tags_for(&ids).await?;

        Ok(RecipePageResponse {
            items: RecipeResponse::assemble(result.items, lines, tags),
            total: result.total,
            page: result.page,
            limit: result.limit,
            pages,
        })
    }

    #[instrument(skip(self))]
    pub async fn get(&self, recipe_id: Snowflake) -> ServiceResult<RecipeResponse> {
        let recipe = self.find(recipe_id).await?;
        self.load(recipe).await
    }

    /// Create a recipe authored by the caller; unknown ingredient names are added to the catalogue
    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn create(
        &self,
        caller_id: Snowflake,
        request: CreateRecipeRequest,
    ) -> ServiceResult<RecipeResponse> {
        let caller = load_caller(self.ctx, caller_id).await?;

        let lines = request
            .ingredients
            .into_iter()
            .map(|line| self.recipe_line(line))
            .collect::<ServiceResult<Vec<_>>>()?;

        let now = Utc::now();
        let recipe = Recipe {
            id: self.ctx.generate_id(),
            author_id: caller.id,
            title: request.title.trim().to_string(),
            description: request.description,
            instructions: request.instructions,
            prep_time: request.prep_time,
            servings: request.servings,
            created_at: now,
            updated_at: now,
        };
        self.ctx
            .recipe_repo()
            .create(&recipe, &lines, &request.tag_ids)
            .await?;

        info!(recipe_id = %recipe.id, author_id = %caller.id, "Recipe created");
        self.load(recipe).await
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        caller_id: Snowflake,
        recipe_id: Snowflake,
        request: UpdateRecipeRequest,
    ) -> ServiceResult<RecipeResponse> {
        let mut recipe = self.find(recipe_id).await?;
        if !recipe.is_authored_by(caller_id) {
            return Err(DomainError::NotRecipeAuthor.into());
        }

        recipe.title = request.title.trim().to_string();
        recipe.description = request.description;
        recipe.instructions = request.instructions;
        recipe.prep_time = request.prep_time;
        recipe.servings = request.servings;
        recipe.updated_at = Utc::now();
        self.ctx.recipe_repo().update(&recipe).await?;

        self.load(recipe).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, caller_id: Snowflake, recipe_id: Snowflake) -> ServiceResult<()> {
        let recipe = self.find(recipe_id).await?;
        if !recipe.is_authored_by(caller_id) {
            return Err(DomainError::NotRecipeAuthor.into());
        }

        self.ctx.recipe_repo().delete(recipe.id).await?;
        info!(recipe_id = %recipe.id, "Recipe deleted");
        Ok(())
    }

    fn recipe_line(&self, line: RecipeLineRequest) -> ServiceResult<NewRecipeLine> {
        let ingredient = match (line.ingredient_id, line.custom_name) {
            (Some(id), _) => IngredientRef::Existing(id),
            (None, Some(name)) if !name.trim().is_empty() => IngredientRef::Named {
                id: self.ctx.generate_id(),
                name: name.trim().to_string(),
            },
            _ => {
                return Err(ServiceError::validation(
                    "Each ingredient needs an ingredient_id or a custom_name",
                ))
            }
        };

        Ok(NewRecipeLine {
            ingredient,
            amount: line.amount,
            unit: line.unit.trim().to_string(),
        })
    }

    async fn find(&self, recipe_id: Snowflake) -> ServiceResult<Recipe> {
        Ok(self
            .ctx
            .recipe_repo()
            .find_by_id(recipe_id)
            .await?
            .ok_or(DomainError::RecipeNotFound(recipe_id))?)
    }

    async fn load(&self, recipe: Recipe) -> ServiceResult<RecipeResponse> {
        let ids = [recipe.id];
        let lines = self.ctx.recipe_repo().ingredients_for(&ids).await?;
        let tags = self
            .ctx
            .recipe_repo()
            .tags_for(&ids)
            .await?
            .into_iter()
            .map(|(_, tag)| tag)
            .collect();
        Ok(RecipeResponse::new(recipe, lines, tags))
    }
}
