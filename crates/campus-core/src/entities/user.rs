//! User entity - an account of any role

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::value_objects::{Role, Snowflake};

/// Account shared by the helpdesk and the kitchen
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Snowflake,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    /// Free-form client settings, always a JSON object
    pub preferences: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new User with empty preferences
    pub fn new(
        id: Snowflake,
        first_name: String,
        last_name: String,
        email: String,
        role: Role,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            first_name,
            last_name,
            email,
            role,
            preferences: Value::Object(serde_json::Map::new()),
            created_at: now,
            updated_at: now,
        }
    }

    /// "First Last", trimmed when either part is empty
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    #[inline]
    pub fn is_agent(&self) -> bool {
        self.role.is_agent()
    }

    /// Replace the stored preferences
    pub fn set_preferences(&mut self, preferences: Value) {
        self.preferences = preferences;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new(
            Snowflake::new(1),
            "Ada".to_string(),
            "Lovelace".to_string(),
            "ada@example.com".to_string(),
            Role::User,
        )
    }

    #[test]
    fn test_new_user_has_empty_preferences() {
        let user = user();
        assert!(user.preferences.as_object().is_some_and(serde_json::Map::is_empty));
        assert!(!user.is_admin());
    }

    #[test]
    fn test_full_name() {
        let mut user = user();
        assert_eq!(user.full_name(), "Ada Lovelace");
        user.last_name = String::new();
        assert_eq!(user.full_name(), "Ada");
    }

    #[test]
    fn test_set_preferences_touches_updated_at() {
        let mut user = user();
        let before = user.updated_at;
        user.set_preferences(serde_json::json!({"theme": "dark"}));
        assert_eq!(user.preferences["theme"], "dark");
        assert!(user.updated_at >= before);
    }
}
