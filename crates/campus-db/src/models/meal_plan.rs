//! Meal plan database model

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct MealPlanModel {
    pub id: i64,
    pub user_id: i64,
    pub recipe_id: i64,
    pub date: NaiveDate,
    pub meal_type: String,
    pub created_at: DateTime<Utc>,
}
