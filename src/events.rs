use serde::Serialize;
use time::OffsetDateTime;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, warn};
use uuid::Uuid;

/// Line data attached to add/update notifications.
#[derive(Debug, Clone, Serialize)]
pub struct ItemData {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone)]
pub enum CartEvent {
    ItemAdded { user_id: Uuid, item: ItemData, cart_count: usize },
    ItemUpdated { user_id: Uuid, item: ItemData, cart_count: usize },
    ItemRemoved { user_id: Uuid, cart_count: usize },
    CartCleared { user_id: Uuid },
}

/// What a real-time client receives.
#[derive(Debug, Clone, Serialize)]
pub struct Broadcast {
    pub channel: String,
    pub event: &'static str,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<ItemData>,
    pub cart_count: usize,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl CartEvent {
    pub fn user_id(&self) -> Uuid {
        match self {
            CartEvent::ItemAdded { user_id, .. }
            | CartEvent::ItemUpdated { user_id, .. }
            | CartEvent::ItemRemoved { user_id, .. }
            | CartEvent::CartCleared { user_id } => *user_id,
        }
    }

    pub fn channel(&self) -> String {
        format!("cart.{}", self.user_id())
    }

    pub fn name(&self) -> &'static str {
        match self {
            CartEvent::ItemAdded { .. } => "item.added",
            CartEvent::ItemUpdated { .. } => "item.updated",
            CartEvent::ItemRemoved { .. } => "item.removed",
            CartEvent::CartCleared { .. } => "cart.cleared",
        }
    }

    pub fn to_broadcast(&self) -> Broadcast {
        let (message, item, cart_count) = match self {
            CartEvent::ItemAdded { item, cart_count, .. } => (
                "Item added to cart successfully!",
                Some(item.clone()),
                *cart_count,
            ),
            CartEvent::ItemUpdated { item, cart_count, .. } => {
                ("Cart updated successfully!", Some(item.clone()), *cart_count)
            }
            CartEvent::ItemRemoved { cart_count, .. } => {
                ("Item removed from cart successfully!", None, *cart_count)
            }
            CartEvent::CartCleared { .. } => ("Cart cleared successfully!", None, 0),
        };
        Broadcast {
            channel: self.channel(),
            event: self.name(),
            message,
            item,
            cart_count,
            timestamp: OffsetDateTime::now_utc(),
        }
    }
}

/// Fire-and-forget fan-out of cart notifications.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<Broadcast>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Broadcast> {
        self.tx.subscribe()
    }

    /// Notifications for one user's private channel, as they are published.
    pub fn user_stream(&self, user_id: Uuid) -> impl Stream<Item = Broadcast> + Send + 'static {
        let channel = format!("cart.{user_id}");
        BroadcastStream::new(self.subscribe()).filter_map(move |msg| match msg {
            Ok(msg) if msg.channel == channel => Some(msg),
            Ok(_) => None,
            Err(e) => {
                warn!(%channel, error = %e, "subscriber lagged, events skipped");
                None
            }
        })
    }

    /// Having no listeners is not an error.
    pub fn publish(&self, event: CartEvent) {
        let msg = event.to_broadcast();
        let channel = msg.channel.clone();
        match self.tx.send(msg) {
            Ok(n) => debug!(%channel, event = event.name(), receivers = n, "event published"),
            Err(_) => debug!(%channel, event = event.name(), "event dropped, no subscribers"),
        }
    }
}
