use std::sync::Arc;

/// Handler invoked for every message published on a subscribed event.
pub type BusHandler = Arc<dyn Fn(&serde_json::Value) + Send + Sync>;

/// Fire-and-forget message bus shared by alert notification and signaling.
///
/// Delivery is at-most-once; nothing is acknowledged or retried.
pub trait IMessageBus: Send + Sync {
    fn publish(&self, event: &str, payload: serde_json::Value);
    fn subscribe(&self, event: &str, handler: BusHandler);
    /// Drop every handler registered for `event`.
    fn unsubscribe(&self, event: &str);
}
