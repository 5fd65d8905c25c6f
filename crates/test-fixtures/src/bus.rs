use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use vigil_core::traits::{BusHandler, IMessageBus};

#[derive(Default)]
struct BusState {
    published: Vec<(String, Value)>,
    handlers: HashMap<String, Vec<BusHandler>>,
    unsubscribed: Vec<String>,
}

/// Records every publish; `deliver` plays the remote side.
#[derive(Clone, Default)]
pub struct RecordingBus {
    state: Arc<Mutex<BusState>>,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a message arriving from the observer.
    pub fn deliver(&self, event: &str, payload: Value) {
        let handlers = self
            .state
            .lock()
            .unwrap()
            .handlers
            .get(event)
            .cloned()
            .unwrap_or_default();
        for handler in handlers {
            handler(&payload);
        }
    }

    pub fn published(&self) -> Vec<(String, Value)> {
        self.state.lock().unwrap().published.clone()
    }

    pub fn published_on(&self, event: &str) -> Vec<Value> {
        self.state
            .lock()
            .unwrap()
            .published
            .iter()
            .filter(|(e, _)| e == event)
            .map(|(_, v)| v.clone())
            .collect()
    }

    pub fn count(&self, event: &str) -> usize {
        self.published_on(event).len()
    }

    /// Event names in publish order.
    pub fn event_names(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .published
            .iter()
            .map(|(e, _)| e.clone())
            .collect()
    }

    pub fn is_subscribed(&self, event: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .handlers
            .get(event)
            .is_some_and(|h| !h.is_empty())
    }

    pub fn unsubscribed(&self) -> Vec<String> {
        self.state.lock().unwrap().unsubscribed.clone()
    }
}

impl IMessageBus for RecordingBus {
    fn publish(&self, event: &str, payload: Value) {
        self.state
            .lock()
            .unwrap()
            .published
            .push((event.to_string(), payload));
    }

    fn subscribe(&self, event: &str, handler: BusHandler) {
        self.state
            .lock()
            .unwrap()
            .handlers
            .entry(event.to_string())
            .or_default()
            .push(handler);
    }

    fn unsubscribe(&self, event: &str) {
        let mut state = self.state.lock().unwrap();
        state.handlers.remove(event);
        state.unsubscribed.push(event.to_string());
    }
}
