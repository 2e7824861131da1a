//! Live ticket updates.
//!
//! The hub keeps, per ticket, the set of open event streams and pushes
//! pre-rendered Server-Sent Events frames to them.

mod hub;

pub use hub::{
    TicketEventHub, TicketSubscription, DEFAULT_KEEP_ALIVE, PING_FRAME, SUBSCRIBER_BUFFER,
};
