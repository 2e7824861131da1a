//! Recipe, ingredient and tag database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct IngredientModel {
    pub id: i64,
    pub name: String,
    pub unit: String,
    pub calories: Option<i32>,
    pub is_allergen: bool,
}

#[derive(Debug, Clone, FromRow)]
pub struct TagModel {
    pub id: i64,
    pub name: String,
    pub kind: String,
}

/// Tag row joined through recipe_tags
#[derive(Debug, Clone, FromRow)]
pub struct RecipeTagModel {
    pub recipe_id: i64,
    pub id: i64,
    pub name: String,
    pub kind: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct RecipeModel {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub instructions: String,
    pub prep_time: i32,
    pub servings: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// recipe_ingredients row joined with its ingredient
#[derive(Debug, Clone, FromRow)]
pub struct RecipeIngredientModel {
    pub recipe_id: i64,
    pub amount: f64,
    pub unit: String,
    pub ingredient_id: i64,
    pub name: String,
    pub ingredient_unit: String,
    pub calories: Option<i32>,
    pub is_allergen: bool,
}
