//! User service
//!
//! The caller's own profile and the admin user directory.

use campus_common::{hash_password, validate_password_strength};
use campus_core::{DomainError, PageRequest, Role, Snowflake, User, UserFilter};
use tracing::{info, instrument};

use crate::dto::{
    CreateUserRequest, PaginatedResponse, UpdatePreferencesRequest, UpdateUserRequest,
    UserListQuery, UserResponse,
};

use super::access::{load_caller, normalize_email, require_admin};
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

pub const DEFAULT_PAGE_LIMIT: u32 = 20;
pub const MAX_PAGE_LIMIT: u32 = 100;

pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn get_current_user(&self, user_id: Snowflake) -> ServiceResult<UserResponse> {
        Ok(load_caller(self.ctx, user_id).await?.into())
    }

    /// Replace the caller's preferences object
    #[instrument(skip(self, request))]
    pub async fn update_preferences(
        &self,
        user_id: Snowflake,
        request: UpdatePreferencesRequest,
    ) -> ServiceResult<UserResponse> {
        if !request.preferences.is_object() {
            return Err(ServiceError::validation("preferences must be an object"));
        }

        let mut user = load_caller(self.ctx, user_id).await?;
        user.set_preferences(request.preferences);
        self.ctx.user_repo().update(&user).await?;
        Ok(user.into())
    }

    // ------------------------------------------------------------------------
    // Admin directory
    // ------------------------------------------------------------------------

    #[instrument(skip(self, query))]
    pub async fn list_users(
        &self,
        caller_id: Snowflake,
        query: UserListQuery,
    ) -> ServiceResult<PaginatedResponse<UserResponse>> {
        let caller = load_caller(self.ctx, caller_id).await?;
        require_admin(&caller)?;

        let page = PageRequest::new(
            query.page.unwrap_or(1),
            query.limit.unwrap_or(DEFAULT_PAGE_LIMIT).min(MAX_PAGE_LIMIT),
        );
        let filter = UserFilter {
            query: query
                .q
                .map(|q| q.trim().to_string())
                .filter(|q| !q.is_empty()),
            role: query.role,
        };

        let result = self.ctx.user_repo().list(&filter, page).await?;
        Ok(result.map(UserResponse::from).into())
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, caller_id: Snowflake, user_id: Snowflake) -> ServiceResult<UserResponse> {
        let caller = load_caller(self.ctx, caller_id).await?;
        if caller.id != user_id {
            require_admin(&caller)?;
        }
        Ok(self.find(user_id).await?.into())
    }

    #[instrument(skip(self, request), fields(email = %request.email, role = %request.role))]
    pub async fn create_user(
        &self,
        caller_id: Snowflake,
        request: CreateUserRequest,
    ) -> ServiceResult<UserResponse> {
        let caller = load_caller(self.ctx, caller_id).await?;
        require_admin(&caller)?;
        check_role_change(Role::User, request.role)?;
        validate_password_strength(&request.password)?;

        let email = normalize_email(&request.email);
        if self.ctx.user_repo().email_exists(&email).await? {
            return Err(DomainError::EmailAlreadyExists.into());
        }

        let password_hash = hash_password(&request.password)?;
        let user = User::new(
            self.ctx.generate_id(),
            request.first_name.trim().to_string(),
            request.last_name.trim().to_string(),
            email,
            request.role,
        );
        self.ctx.user_repo().create(&user, &password_hash).await?;

        info!(user_id = %user.id, created_by = %caller.id, "User created by admin");
        Ok(user.into())
    }

    /// Update a user. Allowed for the user themself or an admin; a `role` sent by
    /// anyone but an admin is ignored.
    #[instrument(skip(self, request))]
    pub async fn update_user(
        &self,
        caller_id: Snowflake,
        user_id: Snowflake,
        mut request: UpdateUserRequest,
    ) -> ServiceResult<UserResponse> {
        let caller = load_caller(self.ctx, caller_id).await?;
        if caller.id != user_id {
            require_admin(&caller)?;
        }
        if !caller.is_admin() {
            request.role = None;
        }
        if request.is_empty() {
            return Err(ServiceError::validation("No fields to update"));
        }
        if let Some(password) = &request.password {
            validate_password_strength(password)?;
        }

        let mut user = self.find(user_id).await?;

        if let Some(email) = request.email.as_deref().map(normalize_email) {
            if email != user.email {
                if self.ctx.user_repo().email_exists(&email).await? {
                    return Err(DomainError::EmailAlreadyExists.into());
                }
                user.email = email;
            }
        }
        if let Some(first_name) = request.first_name {
            user.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = request.last_name {
            user.last_name = last_name.trim().to_string();
        }
        if let Some(role) = request.role {
            check_role_change(user.role, role)?;
            user.role = role;
        }
        user.updated_at = chrono::Utc::now();
        self.ctx.user_repo().update(&user).await?;

        if let Some(password) = request.password {
            let hash = hash_password(&password)?;
            self.ctx.user_repo().update_password(user.id, &hash).await?;
            self.ctx
                .refresh_token_store()
                .revoke_all_for_user(user.id)
                .await?;
        }

        info!(user_id = %user.id, updated_by = %caller.id, "User updated");
        Ok(user.into())
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, caller_id: Snowflake, user_id: Snowflake) -> ServiceResult<()> {
        let caller = load_caller(self.ctx, caller_id).await?;
        require_admin(&caller)?;
        if caller.id == user_id {
            return Err(DomainError::CannotDeleteSelf.into());
        }

        self.ctx.user_repo().delete(user_id).await?;
        self.ctx
            .refresh_token_store()
            .revoke_all_for_user(user_id)
            .await?;

        info!(user_id = %user_id, deleted_by = %caller.id, "User deleted");
        Ok(())
    }

    async fn find(&self, user_id: Snowflake) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(user_id).into())
    }
}

/// Agent accounts own an `agents` row, so they are created and removed through
/// the agent endpoints only
fn check_role_change(from: Role, to: Role) -> ServiceResult<()> {
    if from != to && (from == Role::Agent || to == Role::Agent) {
        return Err(ServiceError::validation(
            "Agent accounts are managed through /admin/agents",
        ));
    }
    Ok(())
}
