//! # campus-cache
//!
//! Redis layer for login sessions.
//!
//! - **Connection Pool**: managed Redis connection pool with deadpool
//! - **Session Storage**: refresh-token sessions, revocable one at a time or per user
//!
//! ```ignore
//! use campus_cache::{RedisPool, RefreshTokenData, RefreshTokenStore};
//!
//! let pool = RedisPool::from_config(&config.redis)?;
//! let sessions = RefreshTokenStore::with_ttl(pool.clone(), 7 * 24 * 3600);
//! sessions.store(&RefreshTokenData::new(user_id, session_id)).await?;
//! ```

pub mod pool;
pub mod session;

pub use pool::{RedisPool, RedisPoolError, RedisResult};
pub use session::{RefreshTokenData, RefreshTokenStore};
