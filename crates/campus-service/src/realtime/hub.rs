//! Per-ticket event fan-out registry

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use campus_core::Snowflake;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{debug, warn};

/// Keep-alive frame, also sent as soon as a stream opens
pub const PING_FRAME: &str = "event: ping\ndata: ok\n\n";

pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(30);

/// Frames buffered per subscriber before new ones are dropped
pub const SUBSCRIBER_BUFFER: usize = 32;

type Frame = Arc<str>;

#[derive(Debug)]
struct Registry {
    tickets: DashMap<Snowflake, HashMap<u64, mpsc::Sender<Frame>>>,
    next_subscriber: AtomicU64,
    keep_alive: Duration,
}

/// Process-wide map from ticket id to its live subscribers.
///
/// Cloning is cheap and every clone shares the same registry. Delivery is best
/// effort: a subscriber whose buffer is full or whose stream has gone simply
/// misses the frame.
#[derive(Debug, Clone)]
pub struct TicketEventHub {
    registry: Arc<Registry>,
}

impl Default for TicketEventHub {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketEventHub {
    pub fn new() -> Self {
        Self::with_keep_alive(DEFAULT_KEEP_ALIVE)
    }

    pub fn with_keep_alive(keep_alive: Duration) -> Self {
        Self {
            registry: Arc::new(Registry {
                tickets: DashMap::new(),
                next_subscriber: AtomicU64::new(1),
                keep_alive: keep_alive.max(Duration::from_millis(1)),
            }),
        }
    }

    pub fn keep_alive(&self) -> Duration {
        self.registry.keep_alive
    }

    /// Register a new subscriber for `ticket_id`
    pub fn subscribe(&self, ticket_id: Snowflake) -> TicketSubscription {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_BUFFER);
        let id = self.registry.next_subscriber.fetch_add(1, Ordering::Relaxed);

        self.registry
            .tickets
            .entry(ticket_id)
            .or_default()
            .insert(id, tx);

        debug!(ticket_id = %ticket_id, subscriber = id, "Ticket stream opened");

        TicketSubscription {
            registry: Arc::clone(&self.registry),
            ticket_id,
            id,
            rx,
            ping: None,
        }
    }

    /// Send `event` with `payload` to every subscriber of `ticket_id`.
    ///
    /// Returns the number of subscribers the frame was handed to.
    pub fn publish<T: Serialize + ?Sized>(&self, ticket_id: Snowflake, event: &str, payload: &T) -> usize {
        if !self.registry.tickets.contains_key(&ticket_id) {
            return 0;
        }

        let frame = match render_frame(event, payload) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(ticket_id = %ticket_id, event, error = %e, "Failed to serialize ticket event");
                return 0;
            }
        };

        let Some(subscribers) = self.registry.tickets.get(&ticket_id) else {
            return 0;
        };

        let delivered = subscribers
            .values()
            .filter(|tx| tx.try_send(Arc::clone(&frame)).is_ok())
            .count();

        debug!(ticket_id = %ticket_id, event, delivered, "Ticket event published");
        delivered
    }

    pub fn subscriber_count(&self, ticket_id: Snowflake) -> usize {
        self.registry
            .tickets
            .get(&ticket_id)
            .map_or(0, |subscribers| subscribers.len())
    }

    /// Number of tickets with at least one subscriber
    pub fn ticket_count(&self) -> usize {
        self.registry.tickets.len()
    }
}

fn render_frame<T: Serialize + ?Sized>(event: &str, payload: &T) -> serde_json::Result<Frame> {
    let data = serde_json::to_string(payload)?;
    Ok(Arc::from(format!("event: {event}\ndata: {data}\n\n")))
}

/// One open event stream. Dropping it unregisters the subscriber.
#[derive(Debug)]
pub struct TicketSubscription {
    registry: Arc<Registry>,
    ticket_id: Snowflake,
    id: u64,
    rx: mpsc::Receiver<Frame>,
    ping: Option<Interval>,
}

impl TicketSubscription {
    pub fn ticket_id(&self) -> Snowflake {
        self.ticket_id
    }

    /// Wait for the next frame: a ping when the keep-alive interval elapses
    /// (immediately on the first call), otherwise the next published event.
    pub async fn next_frame(&mut self) -> Option<Frame> {
        let keep_alive = self.registry.keep_alive;
        let ping = self.ping.get_or_insert_with(|| {
            let mut ping = interval(keep_alive);
            ping.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ping
        });

        tokio::select! {
            biased;
            _ = ping.tick() => Some(Arc::from(PING_FRAME)),
            frame = self.rx.recv() => frame,
        }
    }
}

impl Drop for TicketSubscription {
    fn drop(&mut self) {
        if let Entry::Occupied(mut entry) = self.registry.tickets.entry(self.ticket_id) {
            entry.get_mut().remove(&self.id);
            if entry.get().is_empty() {
                entry.remove();
            }
        }
        debug!(ticket_id = %self.ticket_id, subscriber = self.id, "Ticket stream closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::time::timeout;

    const QUIET: Duration = Duration::from_millis(50);

    async fn skip_initial_ping(sub: &mut TicketSubscription) {
        let frame = sub.next_frame().await.unwrap();
        assert_eq!(&*frame, PING_FRAME);
    }

    #[tokio::test]
    async fn test_initial_ping() {
        let hub = TicketEventHub::new();
        let mut sub = hub.subscribe(Snowflake::new(1));

        let frame = timeout(QUIET, sub.next_frame()).await.unwrap().unwrap();
        assert_eq!(&*frame, "event: ping\ndata: ok\n\n");
    }

    #[tokio::test]
    async fn test_publish_reaches_only_that_ticket() {
        let hub = TicketEventHub::new();
        let ticket = Snowflake::new(1);
        let mut first = hub.subscribe(ticket);
        let mut second = hub.subscribe(ticket);
        let mut other = hub.subscribe(Snowflake::new(2));
        for sub in [&mut first, &mut second, &mut other] {
            skip_initial_ping(sub).await;
        }

        let delivered = hub.publish(ticket, "close", &json!({"agent": {"id": "7"}}));
        assert_eq!(delivered, 2);

        let expected = "event: close\ndata: {\"agent\":{\"id\":\"7\"}}\n\n";
        assert_eq!(&*first.next_frame().await.unwrap(), expected);
        assert_eq!(&*second.next_frame().await.unwrap(), expected);
        assert!(timeout(QUIET, other.next_frame()).await.is_err());
    }

    #[tokio::test]
    async fn test_frame_is_shared_between_subscribers() {
        let hub = TicketEventHub::new();
        let ticket = Snowflake::new(5);
        let mut first = hub.subscribe(ticket);
        let mut second = hub.subscribe(ticket);
        skip_initial_ping(&mut first).await;
        skip_initial_ping(&mut second).await;

        hub.publish(ticket, "message", &json!({"type": "message"}));
        let a = first.next_frame().await.unwrap();
        let b = second.next_frame().await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_publish_without_subscribers_is_noop() {
        let hub = TicketEventHub::new();
        assert_eq!(hub.publish(Snowflake::new(9), "message", &json!({})), 0);
        assert_eq!(hub.ticket_count(), 0);
    }

    #[tokio::test]
    async fn test_dropping_last_subscription_removes_ticket() {
        let hub = TicketEventHub::new();
        let ticket = Snowflake::new(3);
        let first = hub.subscribe(ticket);
        let second = hub.subscribe(ticket);
        assert_eq!(hub.subscriber_count(ticket), 2);

        drop(first);
        assert_eq!(hub.subscriber_count(ticket), 1);
        assert_eq!(hub.ticket_count(), 1);

        drop(second);
        assert_eq!(hub.subscriber_count(ticket), 0);
        assert_eq!(hub.ticket_count(), 0);
    }

    #[tokio::test]
    async fn test_keep_alive_repeats() {
        let hub = TicketEventHub::with_keep_alive(Duration::from_millis(10));
        let mut sub = hub.subscribe(Snowflake::new(4));

        for _ in 0..3 {
            let frame = timeout(Duration::from_secs(1), sub.next_frame())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(&*frame, PING_FRAME);
        }
    }

    #[tokio::test]
    async fn test_full_subscriber_drops_frames() {
        let hub = TicketEventHub::new();
        let ticket = Snowflake::new(6);
        let _sub = hub.subscribe(ticket);

        for _ in 0..SUBSCRIBER_BUFFER {
            assert_eq!(hub.publish(ticket, "message", &json!({})), 1);
        }
        assert_eq!(hub.publish(ticket, "message", &json!({})), 0);
    }

    #[test]
    fn test_zero_keep_alive_is_clamped() {
        let hub = TicketEventHub::with_keep_alive(Duration::ZERO);
        assert!(hub.keep_alive() > Duration::ZERO);
    }
}
