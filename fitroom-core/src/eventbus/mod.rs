//! src/eventbus/mod.rs
//!
//! Provides an in-process event bus that supports guaranteed delivery
//! to multiple subscribers via bounded MPSC queues. The presentation
//! layer subscribes here; the workflow services only publish.

use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex};

use fitroom_common::models::garment::{Category, GarmentRef};
use fitroom_common::models::tryon::TryOnState;

/// Workflow event published to subscribers synchronously with the state
/// change it describes.
#[derive(Debug, Clone)]
pub enum FittingEvent {
    /// The try-on request slot transitioned.
    TryOnStateChanged(TryOnState),

    /// The garment inventory was replaced wholesale with the server's
    /// list. Carries the full snapshot so readers never observe a
    /// partially-updated inventory.
    InventoryReplaced { garments: Vec<GarmentRef> },

    /// The user picked a garment from the closet.
    GarmentSelected(GarmentRef),

    /// The user supplied a new person photo.
    PhotoSelected { file_name: String },

    /// The active body-region category changed.
    CategoryChanged(Category),

    /// Human-readable text for the user, e.g. why a try-on failed.
    Notification(String),
}

impl FittingEvent {
    /// Get the event type as a string.
    pub fn event_type(&self) -> &'static str {
        match self {
            FittingEvent::TryOnStateChanged(_) => "try_on_state_changed",
            FittingEvent::InventoryReplaced { .. } => "inventory_replaced",
            FittingEvent::GarmentSelected(_) => "garment_selected",
            FittingEvent::PhotoSelected { .. } => "photo_selected",
            FittingEvent::CategoryChanged(_) => "category_changed",
            FittingEvent::Notification(_) => "notification",
        }
    }
}

/// Each subscriber gets its own `mpsc::Sender<FittingEvent>` for
/// guaranteed delivery.
///
/// - If the subscriber's channel buffer fills, `publish` will await
///   until there's space (backpressure).
/// - If the subscriber has dropped the `Receiver`, the channel is closed
///   and sending returns an error.
#[derive(Clone)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<mpsc::Sender<FittingEvent>>>>,
    shutdown_tx: watch::Sender<bool>,
    pub shutdown_rx: watch::Receiver<bool>,
}

/// Default size for each subscriber's buffer. Adjust as needed.
const DEFAULT_BUFFER_SIZE: usize = 256;

impl EventBus {
    /// Create a new, empty event bus.
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            subscribers: Arc::new(Mutex::new(vec![])),
            shutdown_tx: tx,
            shutdown_rx: rx,
        }
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    pub fn is_shutdown(&self) -> bool {
        *self.shutdown_rx.borrow()
    }

    /// Returns a receiver on which events will be delivered.
    pub async fn subscribe(&self, buffer_size: Option<usize>) -> mpsc::Receiver<FittingEvent> {
        let size = buffer_size.unwrap_or(DEFAULT_BUFFER_SIZE);
        let (tx, rx) = mpsc::channel(size);
        let mut subs = self.subscribers.lock().await;
        subs.push(tx);
        rx
    }

    /// Publish an event to all subscribers.
    pub async fn publish(&self, event: FittingEvent) {
        let senders = {
            let subs = self.subscribers.lock().await;
            subs.clone()
        };
        for s in senders {
            let _ = s.send(event.clone()).await;
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{sleep, timeout, Duration};

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let bus = EventBus::new();

        let mut rx1 = bus.subscribe(Some(5)).await;
        let mut rx2 = bus.subscribe(Some(5)).await;

        bus.publish(FittingEvent::TryOnStateChanged(TryOnState::Pending))
            .await;

        // Both subscribers should get it
        let evt1 = rx1.recv().await.expect("rx1 should get event");
        let evt2 = rx2.recv().await.expect("rx2 should get event");

        assert_eq!(evt1.event_type(), "try_on_state_changed");
        assert_eq!(evt2.event_type(), "try_on_state_changed");
    }

    #[tokio::test]
    async fn test_backpressure_blocking() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe(Some(1)).await; // queue size = 1

        // Publish first message to fill the queue.
        bus.publish(FittingEvent::Notification("msg1".into())).await;

        // Spawn a task that reads the two messages after a short delay.
        let handle = tokio::spawn(async move {
            sleep(Duration::from_millis(50)).await;
            let first = rx.recv().await.expect("expected first message");
            let second = rx.recv().await.expect("expected second message");
            (first, second)
        });

        // Publish the second message (this call will wait until there's space).
        let second_publish = bus.publish(FittingEvent::Notification("msg2".into()));
        let result = timeout(Duration::from_millis(500), second_publish).await;
        assert!(result.is_ok(), "publish should eventually unblock");

        let (evt1, evt2) = handle.await.unwrap();
        match evt1 {
            FittingEvent::Notification(txt) => assert_eq!(txt, "msg1"),
            _ => panic!("first message mismatch"),
        }
        match evt2 {
            FittingEvent::Notification(txt) => assert_eq!(txt, "msg2"),
            _ => panic!("second message mismatch"),
        }
    }
}
