//! # campus-service
//!
//! Application layer: business services over the repositories, request/response
//! DTOs, and the in-process hub that fans ticket events out to live subscribers.

pub mod dto;
pub mod realtime;
pub mod services;

pub use realtime::{TicketEventHub, TicketSubscription, PING_FRAME};
pub use services::{ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult};
