//! LocalBus: in-process publish/subscribe keyed by event name.

use dashmap::DashMap;
use vigil_core::traits::{BusHandler, IMessageBus};

/// Synchronous fan-out to every handler subscribed to an event.
///
/// Handlers that panic are caught and do not prevent subsequent handlers
/// from receiving the message.
#[derive(Default)]
pub struct LocalBus {
    handlers: DashMap<String, Vec<BusHandler>>,
}

impl LocalBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handler_count(&self, event: &str) -> usize {
        self.handlers.get(event).map(|h| h.len()).unwrap_or(0)
    }
}

impl IMessageBus for LocalBus {
    fn publish(&self, event: &str, payload: serde_json::Value) {
        // Clone out of the map so handlers may subscribe or unsubscribe.
        let handlers = match self.handlers.get(event) {
            Some(entry) => entry.value().clone(),
            None => return,
        };
        for handler in handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                handler(&payload);
            }));
            if result.is_err() {
                tracing::error!(event = %event, "bus handler panicked");
            }
        }
    }

    fn subscribe(&self, event: &str, handler: BusHandler) {
        self.handlers.entry(event.to_string()).or_default().push(handler);
    }

    fn unsubscribe(&self, event: &str) {
        self.handlers.remove(event);
    }
}
