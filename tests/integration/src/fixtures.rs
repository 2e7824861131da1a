//! Request bodies and unique test data

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

pub const TEST_PASSWORD: &str = "TestPass123";

static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per process run; combined with the start time so reruns against the
/// same database do not collide
pub fn unique_suffix() -> String {
    static START: std::sync::OnceLock<i64> = std::sync::OnceLock::new();
    let start = START.get_or_init(|| chrono::Utc::now().timestamp_millis());
    format!("{start}{}", COUNTER.fetch_add(1, Ordering::SeqCst))
}

/// Logged-in account
#[derive(Debug, Clone)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
    /// Agent record id for agent accounts
    pub agent_id: Option<String>,
}

impl Account {
    /// From the `data` of an auth response
    pub fn from_auth(data: &Value) -> Result<Self> {
        let field = |value: &Value, name: &str| -> Result<String> {
            value[name]
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| anyhow::anyhow!("auth response without {name}: {data}"))
        };

        Ok(Self {
            id: field(&data["user"], "id")?,
            email: field(&data["user"], "email")?,
            access_token: field(data, "access_token")?,
            refresh_token: field(data, "refresh_token")?,
            agent_id: None,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            first_name: "Test".to_string(),
            last_name: format!("User{suffix}"),
            email: format!("test{suffix}@example.com"),
            password: TEST_PASSWORD.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct QueueRequest {
    pub title: String,
}

impl QueueRequest {
    pub fn unique() -> Self {
        Self {
            title: format!("Queue {}", unique_suffix()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateTicketRequest {
    pub title: String,
    pub queue_id: String,
    pub message: String,
}

impl CreateTicketRequest {
    pub fn new(queue_id: &str) -> Self {
        Self {
            title: format!("Printer jam {}", unique_suffix()),
            queue_id: queue_id.to_string(),
            message: "The printer on floor 2 is jammed.".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostMessageRequest {
    pub text: String,
}

impl PostMessageRequest {
    pub fn new(text: &str) -> Self {
        Self { text: text.to_string() }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateRatingRequest {
    pub ticket_id: String,
    pub score: i16,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecipeLine {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredient_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
    pub amount: f64,
    pub unit: String,
}

impl RecipeLine {
    pub fn named(name: &str, amount: f64, unit: &str) -> Self {
        Self {
            ingredient_id: None,
            custom_name: Some(name.to_string()),
            amount,
            unit: unit.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateRecipeRequest {
    pub title: String,
    pub description: Option<String>,
    pub instructions: String,
    pub prep_time: i32,
    pub servings: i32,
    pub ingredients: Vec<RecipeLine>,
    pub tag_ids: Vec<String>,
}

impl CreateRecipeRequest {
    pub fn with_lines(ingredients: Vec<RecipeLine>) -> Self {
        Self {
            title: format!("Recipe {}", unique_suffix()),
            description: None,
            instructions: "Mix everything and serve.".to_string(),
            prep_time: 10,
            servings: 2,
            ingredients,
            tag_ids: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateMealPlanRequest {
    pub recipe_id: String,
    pub date: String,
    pub meal_type: String,
}
