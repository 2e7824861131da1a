//! Redis connection pool using deadpool-redis.

mod redis_pool;

pub use redis_pool::{RedisPool, RedisPoolError, RedisResult};
