use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{error, info, instrument, warn};

use super::classifier::{classify, Classification};
use super::handle::{DispatchHandle, ResultSlot, SendGate};
use super::invocation::InvocationCounter;
use super::{ActionHandler, DispatchResult, DmrResponse, ResultCallback};
use crate::codec::{Base64JsonCodec, WireCodec};
use crate::config::Config;
use crate::diagnostics::{DiagnosticsSink, TraceEvent, Tracer, TracingSink};
use crate::errors::DispatchError;
use crate::http::{RequestRouter, ReqwestTransport, ResponseCallback, Transport};
use crate::model::Operation;
use crate::navigation::{LoggingNavigator, Navigator};

/// Turns operations into management requests and classifies their responses.
///
/// Owns the invocation counter and the diagnostics toggle; build one per
/// endpoint and share it by reference.
pub struct Dispatcher {
    endpoint_url: String,
    router: RequestRouter,
    transport: Arc<dyn Transport>,
    codec: Arc<dyn WireCodec>,
    navigator: Arc<dyn Navigator>,
    tracer: Tracer,
    invocations: InvocationCounter,
}

impl Dispatcher {
    /// Dispatcher with the JSON codec, a logging navigator and diagnostics off
    pub fn new(endpoint_url: &str, transport: Arc<dyn Transport>) -> Self {
        let codec: Arc<dyn WireCodec> = Arc::new(Base64JsonCodec);
        Self {
            endpoint_url: endpoint_url.to_string(),
            router: RequestRouter::new(endpoint_url, codec.clone()),
            transport,
            codec,
            navigator: Arc::new(LoggingNavigator),
            tracer: Tracer::disabled(),
            invocations: InvocationCounter::new(),
        }
    }

    /// Dispatcher over `reqwest` configured from `main.toml`
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = ReqwestTransport::new(
            config.credentials(),
            config.connect_timeout_seconds.map(Duration::from_secs),
        )?;

        let dispatcher = Self::new(&config.endpoint_url, Arc::new(transport))
            .with_diagnostics(config.diagnostics_enabled, Arc::new(TracingSink));

        info!(
            "Dispatcher ready for {} (diagnostics {})",
            config.endpoint_url,
            if config.diagnostics_enabled { "enabled" } else { "disabled" }
        );
        Ok(dispatcher)
    }

    pub fn with_codec(mut self, codec: Arc<dyn WireCodec>) -> Self {
        self.router = RequestRouter::new(&self.endpoint_url, codec.clone());
        self.codec = codec;
        self
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    /// The toggle is read here, once. A disabled tracer keeps no sink.
    pub fn with_diagnostics(mut self, enabled: bool, sink: Arc<dyn DiagnosticsSink>) -> Self {
        self.tracer = Tracer::new(enabled, sink);
        self
    }

    pub fn with_invocation_counter(mut self, invocations: InvocationCounter) -> Self {
        self.invocations = invocations;
        self
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    pub fn codec(&self) -> Arc<dyn WireCodec> {
        self.codec.clone()
    }

    /// Send an operation and return immediately.
    ///
    /// `on_result` is invoked at most once, from the transport's completion
    /// context, and never before `requestSent` is traced. It is invoked
    /// synchronously, before this returns, when the request cannot be built
    /// or submitted, or when the transport completes inside `send`. It is never invoked for a 307
    /// redirect or after the handle is cancelled.
    #[instrument(skip(self, operation, on_result), fields(operation = %operation.name()))]
    pub fn dispatch<F>(&self, operation: Operation, on_result: F) -> DispatchHandle
    where
        F: FnOnce(DispatchResult) + Send + 'static,
    {
        let id = self.invocations.next_id();
        let slot = ResultSlot::new(Box::new(on_result));
        self.tracer.trace(TraceEvent::Begin, id, &operation);

        let request = match self.router.route(&operation) {
            Ok(request) => request,
            Err(e) => {
                warn!("Failed to build request for '{}': {}", operation.name(), e);
                slot.deliver(Err(e));
                return DispatchHandle::detached();
            }
        };
        self.tracer.trace(TraceEvent::RequestSerialized, id, &operation);

        let method = request.method.clone();
        let operation = Arc::new(operation);
        // the response handler may not run before `requestSent` is traced
        let gate = SendGate::new();
        let callback: ResponseCallback = {
            let gate = gate.clone();
            let slot = slot.clone();
            let operation = operation.clone();
            let tracer = self.tracer.clone();
            let codec = self.codec.clone();
            let navigator = self.navigator.clone();
            Box::new(move |outcome| {
                gate.run_or_defer(Box::new(move || {
                    tracer.trace(TraceEvent::ResponseReceived, id, &operation);
                    match classify(outcome, &method, &operation, codec.as_ref()) {
                        Classification::Deliver(result) => slot.deliver(result),
                        Classification::Redirect(location) => {
                            let location = location.unwrap_or_default();
                            error!("Redirect '{}'. Could not execute {}", location, operation);
                            slot.disarm();
                            navigator.navigate_to(&location);
                        }
                    }
                    tracer.trace(TraceEvent::End, id, &operation);
                }))
            })
        };

        match self.transport.send(request, callback) {
            Ok(pending) => {
                self.tracer.trace(TraceEvent::RequestSent, id, &operation);
                gate.open();
                DispatchHandle::pending(pending, slot)
            }
            Err(e) => {
                warn!("Failed to submit '{}': {}", operation.name(), e);
                slot.deliver(Err(DispatchError::Submission(e)));
                DispatchHandle::detached()
            }
        }
    }

    /// Dispatch and wait for the outcome.
    ///
    /// Returns `None` when no outcome will ever be delivered: the endpoint
    /// redirected, or the request was abandoned.
    pub async fn dispatch_and_wait(&self, operation: Operation) -> Option<DispatchResult> {
        let (tx, rx) = oneshot::channel();
        let handle = self.dispatch(operation, move |result| {
            // receiver gone means the caller stopped waiting
            let _ = tx.send(result);
        });
        drop(handle);
        rx.await.ok()
    }
}

impl ActionHandler for Dispatcher {
    fn execute(&self, operation: Operation, on_result: ResultCallback) -> DispatchHandle {
        self.dispatch(operation, on_result)
    }

    fn undo(
        &self,
        operation: &Operation,
        _result: &DmrResponse,
    ) -> std::result::Result<DispatchHandle, DispatchError> {
        error!("Undo requested for '{}' but is not supported", operation.name());
        Err(DispatchError::UndoUnsupported)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("endpoint_url", &self.endpoint_url)
            .field("tracer", &self.tracer)
            .finish()
    }
}
