//! Model to entity mappers
//!
//! `From<Model> for Entity` conversions. Enum columns are stored as text; an
//! unknown value maps to a fallback variant and is logged.

mod helpdesk;
mod kitchen;
mod user;

use std::str::FromStr;

use campus_core::UnknownVariant;
use tracing::warn;

/// Parse an enum column, falling back when the stored text is unknown
pub(crate) fn parse_column<T>(value: &str, fallback: T) -> T
where
    T: FromStr<Err = UnknownVariant>,
{
    value.parse().unwrap_or_else(|e: UnknownVariant| {
        warn!(kind = e.kind, value = %e.value, "Unknown enum value in database row");
        fallback
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::{MealType, Role};

    #[test]
    fn test_parse_column() {
        assert_eq!(parse_column("agent", Role::User), Role::Agent);
        assert_eq!(parse_column("superuser", Role::User), Role::User);
        assert_eq!(parse_column("dinner", MealType::Lunch), MealType::Dinner);
    }
}
