//! Authentication service
//!
//! Registration, login, refresh-token rotation and logout. Every login opens a
//! session whose id is embedded in both tokens and tracked in Redis.

use campus_cache::RefreshTokenData;
use campus_common::{hash_password, validate_password_strength, verify_password, AppError};
use campus_core::{DomainError, Role, Snowflake, User};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::dto::{AuthResponse, LoginRequest, RefreshTokenRequest, RegisterRequest, UserResponse};

use super::access::normalize_email;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new account with the `user` role
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthResponse> {
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
            Role::User,
        );
        self.ctx.user_repo().create(&user, &password_hash).await?;

        info!(user_id = %user.id, "User registered");
        self.open_session(user).await
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let email = normalize_email(&request.email);
        let user = self
            .ctx
            .user_repo()
            .find_by_email(&email)
            .await?
            .ok_or_else(|| {
                warn!("Login failed: unknown email");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        let password_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or(ServiceError::App(AppError::InvalidCredentials))?;

        if !verify_password(&request.password, &password_hash)? {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AppError::InvalidCredentials.into());
        }

        info!(user_id = %user.id, "User logged in");
        self.open_session(user).await
    }

    /// Exchange a live refresh token for a new pair; the old session is revoked
    #[instrument(skip(self, request))]
    pub async fn refresh(&self, request: RefreshTokenRequest) -> ServiceResult<AuthResponse> {
        let claims = self
            .ctx
            .jwt_service()
            .validate_refresh_token(&request.refresh_token)?;
        let user_id = claims.user_id()?;
        let session_id = claims
            .session_id
            .ok_or(ServiceError::App(AppError::InvalidToken))?;

        let store = self.ctx.refresh_token_store();
        if store.validate(&session_id, user_id).await?.is_none() {
            warn!(user_id = %user_id, "Refresh with revoked or unknown session");
            return Err(AppError::InvalidToken.into());
        }

        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(ServiceError::App(AppError::InvalidToken))?;

        // DEL decides the race between two refreshes of the same token
        if !store.revoke(&session_id).await? {
            warn!(user_id = %user.id, "Refresh token already used");
            return Err(AppError::InvalidToken.into());
        }
        info!(user_id = %user.id, "Tokens refreshed");
        self.open_session(user).await
    }

    /// Revoke the session named by `refresh_token`, or else the caller's current session
    #[instrument(skip(self, refresh_token))]
    pub async fn logout(
        &self,
        user_id: Snowflake,
        current_session: Option<&str>,
        refresh_token: Option<&str>,
    ) -> ServiceResult<()> {
        let from_token = match refresh_token {
            Some(token) => {
                let claims = self.ctx.jwt_service().validate_refresh_token(token)?;
                if claims.user_id()? != user_id {
                    return Err(AppError::InvalidToken.into());
                }
                claims.session_id
            }
            None => None,
        };

        let store = self.ctx.refresh_token_store();
        match from_token.as_deref().or(current_session) {
            Some(session_id) => {
                store.revoke(session_id).await?;
            }
            None => {
                store.revoke_all_for_user(user_id).await?;
            }
        }

        info!(user_id = %user_id, "User logged out");
        Ok(())
    }

    async fn open_session(&self, user: User) -> ServiceResult<AuthResponse> {
        let session_id = Uuid::new_v4().to_string();
        let pair = self
            .ctx
            .jwt_service()
            .generate_token_pair(user.id, user.role, &session_id)?;

        self.ctx
            .refresh_token_store()
            .store(&RefreshTokenData::new(user.id, session_id))
            .await?;

        Ok(AuthResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: pair.token_type,
            expires_in: pair.expires_in,
            user: UserResponse::from(user),
        })
    }
}
