//! Ingredient aggregation over planned meals
//!
//! Both functions make a single forward pass with a key -> position index into
//! the output vector, so the output keeps first-seen order. Amounts are summed
//! as given: no unit conversion and no rounding.

use serde::Serialize;
use std::collections::HashMap;

use crate::entities::PlannedMeal;
use crate::value_objects::Snowflake;

/// Summed amount of one ingredient across a day's meals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientTotal {
    pub ingredient_id: Snowflake,
    pub name: String,
    pub unit: String,
    pub amount: f64,
}

/// One line of a shopping list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingItem {
    pub ingredient_id: Snowflake,
    pub name: String,
    pub unit: String,
    pub amount: f64,
    pub is_bought: bool,
}

/// Sum ingredient amounts per ingredient id.
///
/// The first occurrence fixes the display name and unit (the ingredient's
/// catalogue unit). Lines written in another unit are still added to the same
/// total; units are not reconciled.
pub fn aggregate_ingredients(meals: &[PlannedMeal]) -> Vec<IngredientTotal> {
    let mut index: HashMap<Snowflake, usize> = HashMap::new();
    let mut totals: Vec<IngredientTotal> = Vec::new();

    for line in meals.iter().flat_map(|meal| &meal.ingredients) {
        let ingredient = &line.ingredient;
        match index.get(&ingredient.id) {
            Some(&pos) => totals[pos].amount += line.amount,
            None => {
                index.insert(ingredient.id, totals.len());
                totals.push(IngredientTotal {
                    ingredient_id: ingredient.id,
                    name: ingredient.name.clone(),
                    unit: ingredient.unit.clone(),
                    amount: line.amount,
                });
            }
        }
    }

    totals
}

/// Build the shopping list for a day's meals.
///
/// Keyed by ingredient id and the unit written on the recipe line, so one
/// ingredient used in two units yields two items. Nothing is bought yet.
pub fn shopping_list(meals: &[PlannedMeal]) -> Vec<ShoppingItem> {
    let mut index: HashMap<(Snowflake, &str), usize> = HashMap::new();
    let mut items: Vec<ShoppingItem> = Vec::new();

    for line in meals.iter().flat_map(|meal| &meal.ingredients) {
        let key = (line.ingredient.id, line.unit.as_str());
        match index.get(&key) {
            Some(&pos) => items[pos].amount += line.amount,
            None => {
                index.insert(key, items.len());
                items.push(ShoppingItem {
                    ingredient_id: line.ingredient.id,
                    name: line.ingredient.name.clone(),
                    unit: line.unit.clone(),
                    amount: line.amount,
                    is_bought: false,
                });
            }
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Ingredient, MealPlanEntry, Recipe, RecipeIngredient};
    use crate::value_objects::MealType;
    use chrono::{NaiveDate, Utc};

    fn ingredient(id: i64, name: &str, unit: &str) -> Ingredient {
        Ingredient::new(Snowflake::new(id), name.to_string(), unit.to_string())
    }

    fn meal(recipe_id: i64, lines: &[(Ingredient, f64, &str)]) -> PlannedMeal {
        let now = Utc::now();
        let recipe_id = Snowflake::new(recipe_id);
        PlannedMeal {
            entry: MealPlanEntry::new(
                Snowflake::new(recipe_id.into_inner() + 1000),
                Snowflake::new(1),
                recipe_id,
                NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
                MealType::Lunch,
            ),
            recipe: Recipe {
                id: recipe_id,
                author_id: Snowflake::new(1),
                title: format!("Recipe {recipe_id}"),
                description: None,
                instructions: "Mix everything".to_string(),
                prep_time: 10,
                servings: 2,
                created_at: now,
                updated_at: now,
            },
            ingredients: lines
                .iter()
                .map(|(ingredient, amount, unit)| RecipeIngredient {
                    recipe_id,
                    ingredient: ingredient.clone(),
                    amount: *amount,
                    unit: (*unit).to_string(),
                })
                .collect(),
        }
    }

    fn sorted(mut totals: Vec<IngredientTotal>) -> Vec<IngredientTotal> {
        totals.sort_by_key(|t| t.ingredient_id);
        totals
    }

    #[test]
    fn test_empty_plan_yields_nothing() {
        assert!(aggregate_ingredients(&[]).is_empty());
        assert!(shopping_list(&[]).is_empty());
    }

    #[test]
    fn test_same_ingredient_is_summed() {
        let flour = ingredient(1, "Flour", "g");
        let meals = [meal(10, &[(flour.clone(), 2.0, "g")]), meal(11, &[(flour, 3.0, "g")])];

        let totals = aggregate_ingredients(&meals);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].ingredient_id, Snowflake::new(1));
        assert!((totals[0].amount - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_disjoint_ingredients_keep_first_seen_order() {
        let meals = [
            meal(10, &[(ingredient(3, "Salt", "g"), 1.5, "g")]),
            meal(11, &[(ingredient(1, "Milk", "ml"), 200.0, "ml"), (ingredient(2, "Egg", "pcs"), 2.0, "pcs")]),
        ];

        let totals = aggregate_ingredients(&meals);
        let ids: Vec<i64> = totals.iter().map(|t| t.ingredient_id.into_inner()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert!((totals[1].amount - 200.0).abs() < f64::EPSILON);
        assert_eq!(totals[2].unit, "pcs");
    }

    #[test]
    fn test_result_is_invariant_under_reordering() {
        let a = meal(10, &[(ingredient(1, "Rice", "g"), 100.0, "g")]);
        let b = meal(11, &[(ingredient(2, "Beans", "g"), 50.0, "g")]);
        let c = meal(12, &[(ingredient(3, "Corn", "g"), 25.0, "g")]);

        let forward = aggregate_ingredients(&[a.clone(), b.clone(), c.clone()]);
        let backward = aggregate_ingredients(&[c, b, a]);

        assert_ne!(forward, backward);
        assert_eq!(sorted(forward), sorted(backward));
    }

    #[test]
    fn test_shared_ingredient_position_follows_first_occurrence() {
        let oil = ingredient(7, "Oil", "ml");
        let meals = [
            meal(10, &[(ingredient(5, "Onion", "pcs"), 1.0, "pcs")]),
            meal(11, &[(oil.clone(), 10.0, "ml")]),
            meal(12, &[(ingredient(6, "Garlic", "pcs"), 2.0, "pcs"), (oil, 5.0, "ml")]),
        ];

        let totals = aggregate_ingredients(&meals);
        let names: Vec<&str> = totals.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Onion", "Oil", "Garlic"]);
        assert!((totals[1].amount - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mismatched_units_are_not_reconciled() {
        let sugar = ingredient(4, "Sugar", "g");
        let meals = [
            meal(10, &[(sugar.clone(), 100.0, "g")]),
            meal(11, &[(sugar, 2.0, "tbsp")]),
        ];

        let totals = aggregate_ingredients(&meals);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].unit, "g");
        assert!((totals[0].amount - 102.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shopping_list_splits_by_line_unit() {
        let sugar = ingredient(4, "Sugar", "g");
        let meals = [
            meal(10, &[(sugar.clone(), 100.0, "g")]),
            meal(11, &[(sugar.clone(), 2.0, "tbsp"), (ingredient(8, "Lemon", "pcs"), 1.0, "pcs")]),
            meal(12, &[(sugar, 50.0, "g")]),
        ];

        let items = shopping_list(&meals);
        assert_eq!(items.len(), 3);
        assert_eq!((items[0].unit.as_str(), items[0].amount), ("g", 150.0));
        assert_eq!((items[1].unit.as_str(), items[1].amount), ("tbsp", 2.0));
        assert_eq!(items[2].name, "Lemon");
        assert!(items.iter().all(|item| !item.is_bought));
    }

    #[test]
    fn test_totals_serialize_with_string_ids() {
        let totals = aggregate_ingredients(&[meal(10, &[(ingredient(1, "Rice", "g"), 1.0, "g")])]);
        let json = serde_json::to_value(&totals).unwrap();
        assert_eq!(json[0]["ingredient_id"], "1");
        assert_eq!(json[0]["unit"], "g");
    }
}
