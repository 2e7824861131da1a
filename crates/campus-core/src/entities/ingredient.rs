//! Ingredient entity

use crate::value_objects::Snowflake;

/// Catalogue ingredient, unique by name
#[derive(Debug, Clone, PartialEq)]
pub struct Ingredient {
    pub id: Snowflake,
    pub name: String,
    /// Default unit the ingredient is measured in
    pub unit: String,
    pub calories: Option<i32>,
    pub is_allergen: bool,
}

impl Ingredient {
    pub fn new(id: Snowflake, name: String, unit: String) -> Self {
        Self {
            id,
            name,
            unit,
            calories: None,
            is_allergen: false,
        }
    }
}
