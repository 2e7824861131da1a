//! Kitchen handlers: catalogue, recipes, meal plan and shopping list

use axum::extract::State;
use campus_core::{IngredientTotal, ShoppingItem};
use campus_service::dto::{
    CreateMealPlanRequest, CreateRecipeRequest, DateQuery, IngredientResponse,
    MealPlanEntryResponse, RecipeListQuery, RecipePageResponse, RecipeResponse, TagResponse,
    UpdateRecipeRequest,
};
use campus_service::services::{CatalogService, MealPlanService, RecipeService};

use crate::extractors::{AuthUser, IdPath, ValidatedJson, ValidatedQuery};
use crate::response::{ApiJson, ApiResult, Created, NoContent};
use crate::state::AppState;

/// GET /ingredients
pub async fn list_ingredients(
    State(state): State<AppState>,
) -> ApiResult<ApiJson<Vec<IngredientResponse>>> {
    let service = CatalogService::new(state.service_context());
    Ok(ApiJson(service.list_ingredients().await?))
}

/// GET /tags
pub async fn list_tags(State(state): State<AppState>) -> ApiResult<ApiJson<Vec<TagResponse>>> {
    let service = CatalogService::new(state.service_context());
    Ok(ApiJson(service.list_tags().await?))
}

// === Recipes ===

/// GET /recipes
pub async fn list_recipes(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<RecipeListQuery>,
) -> ApiResult<ApiJson<RecipePageResponse>> {
    let service = RecipeService::new(state.service_context());
    Ok(ApiJson(service.list(query).await?))
}

/// POST /recipes
pub async fn create_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateRecipeRequest>,
) -> ApiResult<Created<ApiJson<RecipeResponse>>> {
    let service = RecipeService::new(state.service_context());
    let recipe = service.create(auth.user_id, request).await?;
    Ok(Created(ApiJson(recipe)))
}

/// GET /recipes/:id
pub async fn get_recipe(
    State(state): State<AppState>,
    IdPath(recipe_id): IdPath,
) -> ApiResult<ApiJson<RecipeResponse>> {
    let service = RecipeService::new(state.service_context());
    Ok(ApiJson(service.get(recipe_id).await?))
}

/// PUT /recipes/:id
pub async fn update_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(recipe_id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateRecipeRequest>,
) -> ApiResult<ApiJson<RecipeResponse>> {
    let service = RecipeService::new(state.service_context());
    Ok(ApiJson(service.update(auth.user_id, recipe_id, request).await?))
}

/// DELETE /recipes/:id
pub async fn delete_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(recipe_id): IdPath,
) -> ApiResult<NoContent> {
    let service = RecipeService::new(state.service_context());
    service.delete(auth.user_id, recipe_id).await?;
    Ok(NoContent)
}

// === Meal plan ===

/// POST /mealplan
pub async fn plan_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateMealPlanRequest>,
) -> ApiResult<Created<ApiJson<MealPlanEntryResponse>>> {
    let service = MealPlanService::new(state.service_context());
    let entry = service.create(auth.user_id, request).await?;
    Ok(Created(ApiJson(entry)))
}

/// GET /mealplan?date=
pub async fn meal_plan_for_day(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(query): ValidatedQuery<DateQuery>,
) -> ApiResult<ApiJson<Vec<MealPlanEntryResponse>>> {
    let service = MealPlanService::new(state.service_context());
    Ok(ApiJson(service.list_for_day(auth.user_id, query.date).await?))
}

/// DELETE /mealplan/:id
pub async fn delete_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(entry_id): IdPath,
) -> ApiResult<NoContent> {
    let service = MealPlanService::new(state.service_context());
    service.delete(auth.user_id, entry_id).await?;
    Ok(NoContent)
}

/// GET /mealplan/summary?date=
pub async fn meal_plan_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(query): ValidatedQuery<DateQuery>,
) -> ApiResult<ApiJson<Vec<IngredientTotal>>> {
    let service = MealPlanService::new(state.service_context());
    Ok(ApiJson(service.summary(auth.user_id, query.date).await?))
}

/// GET /shopping?date=
pub async fn shopping_list(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(query): ValidatedQuery<DateQuery>,
) -> ApiResult<ApiJson<Vec<ShoppingItem>>> {
    let service = MealPlanService::new(state.service_context());
    Ok(ApiJson(service.shopping(auth.user_id, query.date).await?))
}
