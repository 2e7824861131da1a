//! Route handlers, organized by area

pub mod admin;
pub mod auth;
pub mod health;
pub mod kitchen;
pub mod tickets;
pub mod users;
