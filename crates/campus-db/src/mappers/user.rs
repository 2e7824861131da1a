//! User model -> entity mapper

use campus_core::{Role, Snowflake, User};

use super::parse_column;
use crate::models::UserModel;

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: Snowflake::new(model.id),
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            role: parse_column(&model.role, Role::User),
            preferences: model.preferences,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
