//! Caller resolution and role checks.
//!
//! Tokens only carry the caller id; the role is re-read from the database on every
//! request so that role changes apply without logging in again.

use campus_common::AppError;
use campus_core::{Agent, DomainError, Role, Snowflake, User};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Load the authenticated caller; a deleted account invalidates its tokens
pub(crate) async fn load_caller(ctx: &ServiceContext, user_id: Snowflake) -> ServiceResult<User> {
    ctx.user_repo()
        .find_by_id(user_id)
        .await?
        .ok_or(ServiceError::App(AppError::InvalidToken))
}

pub(crate) fn require_admin(user: &User) -> ServiceResult<()> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(DomainError::RoleRequired(Role::Admin).into())
    }
}

/// Agent record of a caller with the agent role
pub(crate) async fn load_agent(ctx: &ServiceContext, user: &User) -> ServiceResult<Agent> {
    if !user.is_agent() {
        return Err(DomainError::RoleRequired(Role::Agent).into());
    }
    ctx.agent_repo()
        .find_by_user_id(user.id)
        .await?
        .ok_or_else(|| DomainError::RoleRequired(Role::Agent).into())
}

/// Emails are stored and compared lowercased
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        User::new(
            Snowflake::new(1),
            "A".to_string(),
            "B".to_string(),
            "a@b.c".to_string(),
            role,
        )
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&user(Role::Admin)).is_ok());
        let err = require_admin(&user(Role::Agent)).unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }
}
