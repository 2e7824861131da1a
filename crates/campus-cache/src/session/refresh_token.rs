//! Refresh-token sessions in Redis.
//!
//! Each login creates a session id that is embedded in the refresh token. The session
//! lives under `refresh_session:{session_id}` with the refresh token's lifetime, and the
//! user's sessions are indexed in `user_sessions:{user_id}` so they can all be revoked.
//! A refresh token is only honoured while its session key exists.

use campus_core::Snowflake;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};

use crate::pool::{RedisPool, RedisResult};

const SESSION_PREFIX: &str = "refresh_session:";
const USER_SESSIONS_PREFIX: &str = "user_sessions:";

/// Default session TTL (7 days)
const DEFAULT_TTL_SECONDS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenData {
    pub user_id: Snowflake,
    pub session_id: String,
    /// Unix epoch seconds
    pub created_at: i64,
}

impl RefreshTokenData {
    #[must_use]
    pub fn new(user_id: Snowflake, session_id: impl Into<String>) -> Self {
        Self {
            user_id,
            session_id: session_id.into(),
            created_at: chrono::Utc::now().timestamp(),
        }
    }
}

#[derive(Clone)]
pub struct RefreshTokenStore {
    pool: RedisPool,
    ttl_seconds: u64,
}

impl RefreshTokenStore {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self::with_ttl(pool, DEFAULT_TTL_SECONDS)
    }

    #[must_use]
    pub fn with_ttl(pool: RedisPool, ttl_seconds: u64) -> Self {
        Self {
            pool,
            ttl_seconds: ttl_seconds.max(1),
        }
    }

    fn session_key(session_id: &str) -> String {
        format!("{SESSION_PREFIX}{session_id}")
    }

    fn user_key(user_id: Snowflake) -> String {
        format!("{USER_SESSIONS_PREFIX}{user_id}")
    }

    pub async fn store(&self, data: &RefreshTokenData) -> RedisResult<()> {
        self.pool
            .set_json(&Self::session_key(&data.session_id), data, self.ttl_seconds)
            .await?;

        let user_key = Self::user_key(data.user_id);
        let mut conn = self.pool.get().await?;
        conn.sadd::<_, _, ()>(&user_key, &data.session_id).await?;
        conn.expire::<_, ()>(&user_key, i64::try_from(self.ttl_seconds).unwrap_or(i64::MAX))
            .await?;

        tracing::debug!(
            user_id = %data.user_id,
            session_id = %data.session_id,
            "Stored refresh session"
        );
        Ok(())
    }

    /// Session data when the session is live and belongs to `user_id`
    pub async fn validate(
        &self,
        session_id: &str,
        user_id: Snowflake,
    ) -> RedisResult<Option<RefreshTokenData>> {
        let data: Option<RefreshTokenData> =
            self.pool.get_json(&Self::session_key(session_id)).await?;
        Ok(data.filter(|d| d.user_id == user_id))
    }

    /// Remove one session; returns whether it existed
    pub async fn revoke(&self, session_id: &str) -> RedisResult<bool> {
        let key = Self::session_key(session_id);
        if let Some(data) = self.pool.get_json::<RefreshTokenData>(&key).await? {
            let mut conn = self.pool.get().await?;
            conn.srem::<_, _, ()>(Self::user_key(data.user_id), session_id)
                .await?;
        }

        let revoked = self.pool.delete(&[key]).await? > 0;
        if revoked {
            tracing::debug!(session_id = %session_id, "Revoked refresh session");
        }
        Ok(revoked)
    }

    /// Remove every session of a user, returning how many were live
    pub async fn revoke_all_for_user(&self, user_id: Snowflake) -> RedisResult<u64> {
        let user_key = Self::user_key(user_id);
        let session_ids: Vec<String> = {
            let mut conn = self.pool.get().await?;
            conn.smembers(&user_key).await?
        };

        let mut keys: Vec<String> = session_ids.iter().map(|id| Self::session_key(id)).collect();
        let live = self.pool.delete(&keys).await?;
        keys.clear();
        keys.push(user_key);
        self.pool.delete(&keys).await?;

        tracing::info!(user_id = %user_id, count = live, "Revoked all refresh sessions");
        Ok(live)
    }
}
