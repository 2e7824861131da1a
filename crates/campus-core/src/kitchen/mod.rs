//! Meal-plan arithmetic: per-day ingredient totals and shopping lists

mod aggregate;

pub use aggregate::{aggregate_ingredients, shopping_list, IngredientTotal, ShoppingItem};
