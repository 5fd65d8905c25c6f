//! MonitorHandle: stop a running engine from outside its task.

use vigil_core::traits::{Cancellable, CancellationToken};

/// Cloneable stop switch shared with the engine and its streaming session.
///
/// Stopping is cooperative: the run loop notices on its next step and tears
/// everything down; in-flight detector or signaling results are discarded.
#[derive(Debug, Clone)]
pub struct MonitorHandle {
    token: CancellationToken,
}

impl MonitorHandle {
    pub(crate) fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    /// Request teardown, e.g. on navigation away or unmount.
    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }
}
