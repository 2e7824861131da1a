//! Tag entity

use crate::value_objects::Snowflake;

/// Recipe label; `kind` groups tags (e.g. "diet", "cuisine")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: Snowflake,
    pub name: String,
    pub kind: String,
}
