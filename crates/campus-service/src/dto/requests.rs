//! Request DTOs for API endpoints
//!
//! Bodies implement `Deserialize` and `Validate`; query strings only `Deserialize`
//! unless they carry bounds.

use campus_core::{AgentLevel, MealType, Role, Snowflake};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

// ============================================================================
// Auth Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub last_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, max = 72, message = "Password must be 6-72 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Logout body; without a token the caller's current session is revoked
#[derive(Debug, Clone, Deserialize, Default, Validate)]
pub struct LogoutRequest {
    pub refresh_token: Option<String>,
}

// ============================================================================
// User Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePreferencesRequest {
    pub preferences: Value,
}

/// Admin-side user creation
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub last_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, max = 72, message = "Password must be 6-72 characters"))]
    pub password: String,

    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub last_name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 6, max = 72, message = "Password must be 6-72 characters"))]
    pub password: Option<String>,

    pub role: Option<Role>,
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.role.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UserListQuery {
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: Option<u32>,

    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<u32>,

    pub q: Option<String>,

    pub role: Option<Role>,
}

// ============================================================================
// Helpdesk Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAgentRequest {
    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub last_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, max = 72, message = "Password must be 6-72 characters"))]
    pub password: String,

    pub level: Option<AgentLevel>,

    /// Checked against the agent capacity bounds by the service
    pub capacity: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAgentRequest {
    pub level: Option<AgentLevel>,
    pub capacity: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QueueRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTicketRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    pub queue_id: Snowflake,

    #[validate(length(min = 1, max = 5000, message = "Message must be 1-5000 characters"))]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PostMessageRequest {
    #[validate(length(min = 1, max = 5000, message = "Message must be 1-5000 characters"))]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRatingRequest {
    pub ticket_id: Snowflake,

    #[validate(range(min = 1, max = 5, message = "Score must be between 1 and 5"))]
    pub score: i16,

    #[validate(length(max = 500, message = "Comment must be at most 500 characters"))]
    pub comment: Option<String>,
}

/// `?token=` fallback for clients that cannot set headers
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamQuery {
    pub token: Option<String>,
}

// ============================================================================
// Kitchen Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTagRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 50, message = "Kind must be 1-50 characters"))]
    pub kind: String,
}

/// One ingredient line: a catalogue id or a name to connect-or-create
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecipeLineRequest {
    pub ingredient_id: Option<Snowflake>,

    #[validate(length(min = 1, max = 100, message = "Ingredient name must be 1-100 characters"))]
    pub custom_name: Option<String>,

    #[validate(range(exclusive_min = 0.0, message = "Amount must be positive"))]
    pub amount: f64,

    #[validate(length(min = 1, max = 20, message = "Unit is required"))]
    pub unit: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRecipeRequest {
    #[validate(length(min = 3, max = 200, message = "Title must be 3-200 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(length(min = 5, message = "Instructions must be at least 5 characters"))]
    pub instructions: String,

    #[validate(range(min = 1, message = "Preparation time must be positive"))]
    pub prep_time: i32,

    #[validate(range(min = 1, message = "Servings must be positive"))]
    pub servings: i32,

    #[validate(length(min = 1, message = "At least one ingredient is required"), nested)]
    pub ingredients: Vec<RecipeLineRequest>,

    #[serde(default)]
    pub tag_ids: Vec<Snowflake>,
}

/// Replacement of a recipe's descriptive fields
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateRecipeRequest {
    #[validate(length(min = 3, max = 200, message = "Title must be 3-200 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(length(min = 5, message = "Instructions must be at least 5 characters"))]
    pub instructions: String,

    #[validate(range(min = 1, message = "Preparation time must be positive"))]
    pub prep_time: i32,

    #[validate(range(min = 1, message = "Servings must be positive"))]
    pub servings: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RecipeListQuery {
    /// Comma separated ingredient ids
    pub ingredient_ids: Option<String>,

    pub tag_id: Option<Snowflake>,

    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: Option<u32>,

    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<u32>,
}

impl RecipeListQuery {
    /// Parse `ingredient_ids`, ignoring empty segments
    pub fn ingredient_ids(&self) -> Result<Vec<Snowflake>, String> {
        self.ingredient_ids
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Snowflake::parse(s).map_err(|_| format!("Invalid ingredient id: {s}")))
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMealPlanRequest {
    pub recipe_id: Snowflake,
    pub date: NaiveDate,
    pub meal_type: MealType,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DateQuery {
    pub date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_validation() {
        let request: RegisterRequest = serde_json::from_value(json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "not-an-email",
            "password": "abc"
        }))
        .unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_ticket_request_accepts_string_queue_id() {
        let request: CreateTicketRequest = serde_json::from_value(json!({
            "title": "VPN down",
            "queue_id": "123456789",
            "message": "Cannot connect"
        }))
        .unwrap();
        assert_eq!(request.queue_id, Snowflake::new(123_456_789));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_rating_score_range() {
        let request: CreateRatingRequest =
            serde_json::from_value(json!({"ticket_id": "1", "score": 6})).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_recipe_requires_lines() {
        let request: CreateRecipeRequest = serde_json::from_value(json!({
            "title": "Soup",
            "instructions": "Boil water",
            "prep_time": 10,
            "servings": 2,
            "ingredients": []
        }))
        .unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.errors().contains_key("ingredients"));
        assert!(request.tag_ids.is_empty());
    }

    #[test]
    fn test_recipe_line_amount_must_be_positive() {
        let request: CreateRecipeRequest = serde_json::from_value(json!({
            "title": "Soup",
            "instructions": "Boil water",
            "prep_time": 10,
            "servings": 2,
            "ingredients": [{"custom_name": "salt", "amount": 0.0, "unit": "g"}]
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_ingredient_id_list_parsing() {
        let query = RecipeListQuery {
            ingredient_ids: Some("3, 1,,2".to_string()),
            ..Default::default()
        };
        assert_eq!(
            query.ingredient_ids().unwrap(),
            vec![Snowflake::new(3), Snowflake::new(1), Snowflake::new(2)]
        );

        let query = RecipeListQuery::default();
        assert!(query.ingredient_ids().unwrap().is_empty());

        let query = RecipeListQuery {
            ingredient_ids: Some("abc".to_string()),
            ..Default::default()
        };
        assert!(query.ingredient_ids().is_err());
    }

    #[test]
    fn test_update_user_is_empty() {
        assert!(UpdateUserRequest::default().is_empty());
        let request = UpdateUserRequest {
            role: Some(Role::Agent),
            ..Default::default()
        };
        assert!(!request.is_empty());
    }

    #[test]
    fn test_meal_plan_request_parses_date_and_slot() {
        let request: CreateMealPlanRequest = serde_json::from_value(json!({
            "recipe_id": 42,
            "date": "2025-03-14",
            "meal_type": "lunch"
        }))
        .unwrap();
        assert_eq!(request.meal_type, MealType::Lunch);
        assert_eq!(request.date, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
    }
}
