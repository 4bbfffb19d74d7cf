//! Recording collaborators for asserting on side effects

use dmr_dispatch::diagnostics::{DiagnosticsSink, TraceEvent};
use dmr_dispatch::navigation::Navigator;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    pub event: TraceEvent,
    pub id: u64,
    pub timestamp_ms: i64,
    pub token: Option<String>,
}

/// Diagnostics sink that keeps every event in memory
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<RecordedEvent>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<TraceEvent> {
        self.events().into_iter().map(|e| e.event).collect()
    }

    pub fn kinds_for(&self, id: u64) -> Vec<TraceEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.id == id)
            .map(|e| e.event)
            .collect()
    }
}

impl DiagnosticsSink for RecordingSink {
    fn log_rpc(
        &self,
        event: TraceEvent,
        invocation_id: u64,
        timestamp_ms: i64,
        token: Option<&str>,
    ) -> anyhow::Result<()> {
        self.events.lock().unwrap().push(RecordedEvent {
            event,
            id: invocation_id,
            timestamp_ms,
            token: token.map(str::to_string),
        });
        Ok(())
    }
}

/// Navigator that remembers where it was sent
#[derive(Default)]
pub struct RecordingNavigator {
    targets: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn targets(&self) -> Vec<String> {
        self.targets.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate_to(&self, url: &str) {
        self.targets.lock().unwrap().push(url.to_string());
    }
}
