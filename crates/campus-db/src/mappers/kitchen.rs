//! Recipe, ingredient, tag and meal plan mappers

use campus_core::{
    Ingredient, MealPlanEntry, MealType, Recipe, RecipeIngredient, Snowflake, Tag,
};

use super::parse_column;
use crate::models::{
    IngredientModel, MealPlanModel, RecipeIngredientModel, RecipeModel, RecipeTagModel, TagModel,
};

impl From<IngredientModel> for Ingredient {
    fn from(model: IngredientModel) -> Self {
        Ingredient {
            id: Snowflake::new(model.id),
            name: model.name,
            unit: model.unit,
            calories: model.calories,
            is_allergen: model.is_allergen,
        }
    }
}

impl From<TagModel> for Tag {
    fn from(model: TagModel) -> Self {
        Tag {
            id: Snowflake::new(model.id),
            name: model.name,
            kind: model.kind,
        }
    }
}

impl From<RecipeTagModel> for (Snowflake, Tag) {
    fn from(model: RecipeTagModel) -> Self {
        (
            Snowflake::new(model.recipe_id),
            Tag {
                id: Snowflake::new(model.id),
                name: model.name,
                kind: model.kind,
            },
        )
    }
}

impl From<RecipeModel> for Recipe {
    fn from(model: RecipeModel) -> Self {
        Recipe {
            id: Snowflake::new(model.id),
            author_id: Snowflake::new(model.author_id),
            title: model.title,
            description: model.description,
            instructions: model.instructions,
            prep_time: model.prep_time,
            servings: model.servings,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<RecipeIngredientModel> for RecipeIngredient {
    fn from(model: RecipeIngredientModel) -> Self {
        RecipeIngredient {
            recipe_id: Snowflake::new(model.recipe_id),
            ingredient: Ingredient {
                id: Snowflake::new(model.ingredient_id),
                name: model.name,
                unit: model.ingredient_unit,
                calories: model.calories,
                is_allergen: model.is_allergen,
            },
            amount: model.amount,
            unit: model.unit,
        }
    }
}

impl From<MealPlanModel> for MealPlanEntry {
    fn from(model: MealPlanModel) -> Self {
        MealPlanEntry {
            id: Snowflake::new(model.id),
            user_id: Snowflake::new(model.user_id),
            recipe_id: Snowflake::new(model.recipe_id),
            date: model.date,
            meal_type: parse_column(&model.meal_type, MealType::Lunch),
            created_at: model.created_at,
        }
    }
}
