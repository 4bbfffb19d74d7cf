//! Invocation diagnostics
//!
//! When enabled, every dispatch emits five timestamped events correlated by
//! its invocation id:
//!
//! ```text
//! begin → requestSerialized → requestSent → responseReceived → end
//! ```
//!
//! The toggle is read once when the [`Tracer`] is built. A disabled tracer
//! holds no sink and never computes tokens or timestamps.

use anyhow::Result;
use chrono::Utc;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::constants::targets;
use crate::model::{token, Operation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceEvent {
    Begin,
    RequestSerialized,
    RequestSent,
    ResponseReceived,
    End,
}

impl TraceEvent {
    pub fn classifier(&self) -> &'static str {
        match self {
            TraceEvent::Begin => "begin",
            TraceEvent::RequestSerialized => "requestSerialized",
            TraceEvent::RequestSent => "requestSent",
            TraceEvent::ResponseReceived => "responseReceived",
            TraceEvent::End => "end",
        }
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.classifier())
    }
}

/// Receiver of trace events. `token` is only present for [`TraceEvent::Begin`].
pub trait DiagnosticsSink: Send + Sync {
    fn log_rpc(
        &self,
        event: TraceEvent,
        invocation_id: u64,
        timestamp_ms: i64,
        token: Option<&str>,
    ) -> Result<()>;
}

/// Sink that writes each event as a `tracing` event on the `dmr::rpc` target
#[derive(Debug, Clone, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn log_rpc(
        &self,
        event: TraceEvent,
        invocation_id: u64,
        timestamp_ms: i64,
        token: Option<&str>,
    ) -> Result<()> {
        debug!(
            target: targets::RPC,
            event = event.classifier(),
            id = invocation_id,
            timestamp = timestamp_ms,
            token = token.unwrap_or_default(),
            "rpc"
        );
        Ok(())
    }
}

/// Toggle-gated front of a [`DiagnosticsSink`]
#[derive(Clone)]
pub struct Tracer {
    sink: Option<Arc<dyn DiagnosticsSink>>,
}

impl Tracer {
    pub fn new(enabled: bool, sink: Arc<dyn DiagnosticsSink>) -> Self {
        Self {
            sink: enabled.then_some(sink),
        }
    }

    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Emit one event. Sink failures are logged and swallowed.
    pub fn trace(&self, event: TraceEvent, invocation_id: u64, operation: &Operation) {
        let Some(sink) = &self.sink else {
            return;
        };

        let timestamp_ms = Utc::now().timestamp_millis();
        let result = if event == TraceEvent::Begin {
            let token = token(operation);
            sink.log_rpc(event, invocation_id, timestamp_ms, Some(&token))
        } else {
            sink.log_rpc(event, invocation_id, timestamp_ms, None)
        };

        if let Err(e) = result {
            warn!("Failed to record {} for invocation {}: {}", event, invocation_id, e);
        }
    }
}

impl fmt::Debug for Tracer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracer")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
