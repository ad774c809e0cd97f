//! Typed publish/subscribe notifications between workflows.
//!
//! Workflows publish a [`StoreEvent`] after a backend write is acknowledged;
//! views and caches subscribe and refetch. Delivery is best effort: a
//! publish with no subscribers is not an error, and a slow subscriber that
//! lags simply misses events (it refetches on the next one anyway).

use swiftthrift_core::{CartId, WishlistId};
use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 16;

/// Something changed on the backend that views may want to reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    /// Items were added to or removed from a cart.
    CartChanged { cart_id: CartId },
    /// A wishlist's items changed.
    WishlistChanged { wishlist_id: WishlistId },
    /// Products or categories were created.
    ProductsChanged,
}

/// Broadcast bus for [`StoreEvent`]s. Clones share the same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    /// Create a bus with the default capacity (16 buffered events).
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a bus buffering up to `capacity` events per subscriber.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event to every current subscriber.
    pub fn publish(&self, event: StoreEvent) {
        let delivered = self.sender.send(event).unwrap_or(0);
        tracing::debug!(?event, delivered, "Published store event");
    }

    /// Subscribe to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_published_events() {
        let bus = EventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.clone().subscribe();

        bus.publish(StoreEvent::CartChanged {
            cart_id: CartId::new(4),
        });

        let expected = StoreEvent::CartChanged {
            cart_id: CartId::new(4),
        };
        assert_eq!(first.recv().await.unwrap(), expected);
        assert_eq!(second.recv().await.unwrap(), expected);
    }

    #[test]
    fn test_publish_without_subscribers_is_fine() {
        let bus = EventBus::default();
        bus.publish(StoreEvent::ProductsChanged);
    }

    #[tokio::test]
    async fn test_late_subscriber_misses_earlier_events() {
        let bus = EventBus::new();
        bus.publish(StoreEvent::ProductsChanged);
        let mut rx = bus.subscribe();
        bus.publish(StoreEvent::WishlistChanged {
            wishlist_id: WishlistId::new(2),
        });
        assert_eq!(
            rx.recv().await.unwrap(),
            StoreEvent::WishlistChanged {
                wishlist_id: WishlistId::new(2)
            }
        );
    }
}
