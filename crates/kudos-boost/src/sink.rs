//! [`BoostEventSink`] implementations.

use kudos_core::traits::BoostEventSink;
use kudos_core::types::BoostGranted;
use parking_lot::Mutex;
use tracing::info;

/// Emits each grant as a structured `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl BoostEventSink for TracingEventSink {
    fn boost_granted(&self, event: &BoostGranted) {
        info!(
            target: "kudos::boost_granted",
            user = %event.user,
            amount = %event.amount,
            duration_secs = event.duration_secs,
            "boost granted"
        );
    }
}

/// Keeps every grant in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<BoostGranted>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<BoostGranted> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl BoostEventSink for RecordingEventSink {
    fn boost_granted(&self, event: &BoostGranted) {
        self.events.lock().push(*event);
    }
}
