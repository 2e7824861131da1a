//! Recipe entity and its ingredient lines

use chrono::{DateTime, Utc};

use crate::entities::Ingredient;
use crate::value_objects::Snowflake;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: Snowflake,
    pub author_id: Snowflake,
    pub title: String,
    pub description: Option<String>,
    pub instructions: String,
    /// Minutes
    pub prep_time: i32,
    pub servings: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    #[inline]
    pub fn is_authored_by(&self, user_id: Snowflake) -> bool {
        self.author_id == user_id
    }
}

/// Amount of one ingredient used by a recipe
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeIngredient {
    pub recipe_id: Snowflake,
    pub ingredient: Ingredient,
    pub amount: f64,
    /// Unit as written on the recipe line; may differ from `ingredient.unit`
    pub unit: String,
}
