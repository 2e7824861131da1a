//! Meal plan entries

use chrono::{DateTime, NaiveDate, Utc};

use crate::entities::{Recipe, RecipeIngredient};
use crate::value_objects::{MealType, Snowflake};

/// A recipe planned into one meal slot of one day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealPlanEntry {
    pub id: Snowflake,
    pub user_id: Snowflake,
    pub recipe_id: Snowflake,
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub created_at: DateTime<Utc>,
}

impl MealPlanEntry {
    pub fn new(
        id: Snowflake,
        user_id: Snowflake,
        recipe_id: Snowflake,
        date: NaiveDate,
        meal_type: MealType,
    ) -> Self {
        Self {
            id,
            user_id,
            recipe_id,
            date,
            meal_type,
            created_at: Utc::now(),
        }
    }
}

/// Entry loaded together with its recipe and ingredient lines
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedMeal {
    pub entry: MealPlanEntry,
    pub recipe: Recipe,
    pub ingredients: Vec<RecipeIngredient>,
}
