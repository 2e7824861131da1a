//! Axum extractors for authentication, ids and validated input

mod auth;
mod path;
mod validated;

pub use auth::{AuthUser, StreamAuthUser};
pub use path::IdPath;
pub use validated::{OptionalValidatedJson, ValidatedJson, ValidatedQuery};
