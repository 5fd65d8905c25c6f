use std::sync::{Arc, Mutex};

use vigil_core::models::AlertEvent;
use vigil_core::traits::{ExitReason, IAlertSink, INavigator};

#[derive(Clone, Default)]
pub struct RecordingSink {
    alerts: Arc<Mutex<Vec<AlertEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<AlertEvent> {
        self.alerts.lock().unwrap().clone()
    }
}

impl IAlertSink for RecordingSink {
    fn append_alert(&self, event: &AlertEvent) {
        self.alerts.lock().unwrap().push(event.clone());
    }
}

#[derive(Clone, Default)]
pub struct RecordingNavigator {
    exits: Arc<Mutex<Vec<ExitReason>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exits(&self) -> Vec<ExitReason> {
        self.exits.lock().unwrap().clone()
    }
}

impl INavigator for RecordingNavigator {
    fn leave_exam(&self, reason: ExitReason) {
        self.exits.lock().unwrap().push(reason);
    }
}
