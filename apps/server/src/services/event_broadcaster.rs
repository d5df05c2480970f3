//! Event broadcaster for dashboard invalidation.
//!
//! Ingestion, retry and the lead/recording handlers publish a
//! [`DashboardEvent`] after each write they make; every open `/ws` socket
//! forwards it so the dashboard refetches the affected list. Analysis
//! status written by the external pipeline produces no event here, so
//! clients still poll for those changes.
//!
//! Uses tokio::sync::broadcast to fan-out events to all connected WebSocket clients.

use tokio::sync::broadcast;

use crate::models::{DashboardEvent, DashboardEventMessage};

/// Default capacity for the broadcast channel.
const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Event broadcaster that distributes events to all connected WebSocket clients.
#[derive(Clone)]
pub struct EventBroadcaster {
    sender: broadcast::Sender<DashboardEventMessage>,
}

impl EventBroadcaster {
    /// Create a new EventBroadcaster with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new EventBroadcaster with a specific capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to receive events.
    /// Returns a receiver that will receive all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEventMessage> {
        self.sender.subscribe()
    }

    /// Broadcast an event to all subscribers.
    /// Returns the number of receivers that received the event.
    /// If there are no subscribers, returns 0 (does not error).
    pub fn send(&self, event: DashboardEvent) -> usize {
        // Ignore errors when there are no subscribers
        self.sender
            .send(DashboardEventMessage::new(event))
            .unwrap_or(0)
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}
