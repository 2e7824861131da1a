//! Value objects - immutable types that represent domain concepts

mod agent_level;
mod meal_type;
mod role;
mod snowflake;

pub use agent_level::AgentLevel;
pub use meal_type::MealType;
pub use role::Role;
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};

/// Error when a stored or submitted string does not name a known variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
