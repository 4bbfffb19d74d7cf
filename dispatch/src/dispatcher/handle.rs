use std::sync::{Arc, Mutex, PoisonError};

use super::{DispatchResult, ResultCallback};
use crate::http::PendingRequest;

/// Holds a caller's completion handler until it is either invoked once or
/// dropped unused.
#[derive(Clone)]
pub(crate) struct ResultSlot {
    callback: Arc<Mutex<Option<ResultCallback>>>,
}

impl ResultSlot {
    pub(crate) fn new(callback: ResultCallback) -> Self {
        Self {
            callback: Arc::new(Mutex::new(Some(callback))),
        }
    }

    fn take(&self) -> Option<ResultCallback> {
        self.callback.lock().ok().and_then(|mut slot| slot.take())
    }

    /// Invoke the handler if it has not been invoked or disarmed yet
    pub(crate) fn deliver(&self, result: DispatchResult) {
        if let Some(callback) = self.take() {
            callback(result);
        }
    }

    /// Drop the handler without invoking it
    pub(crate) fn disarm(&self) {
        drop(self.take());
    }
}

type Deferred = Box<dyn FnOnce() + Send + 'static>;

#[derive(Default)]
struct GateState {
    open: bool,
    deferred: Option<Deferred>,
}

/// Holds back a response handler until the dispatcher has finished
/// submitting the request.
///
/// A transport may complete the exchange on another thread, or inside
/// `send` itself, before `requestSent` has been traced. Work arriving while
/// the gate is closed is parked and runs on the thread that opens it.
#[derive(Clone, Default)]
pub(crate) struct SendGate {
    state: Arc<Mutex<GateState>>,
}

impl SendGate {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Run `work` now if the gate is open, otherwise park it
    pub(crate) fn run_or_defer(&self, work: Deferred) {
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if !state.open {
                state.deferred = Some(work);
                return;
            }
        }
        work();
    }

    /// Open the gate and run parked work, if any. The lock is released
    /// before the work runs.
    pub(crate) fn open(&self) {
        let deferred = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.open = true;
            state.deferred.take()
        };
        if let Some(work) = deferred {
            work();
        }
    }
}

/// Caller's view of a dispatched request.
///
/// Holds no transport request when submission failed synchronously; such a
/// handle is never pending and cancelling it does nothing.
pub struct DispatchHandle {
    request: Option<Box<dyn PendingRequest>>,
    slot: Option<ResultSlot>,
}

impl DispatchHandle {
    pub(crate) fn pending(request: Box<dyn PendingRequest>, slot: ResultSlot) -> Self {
        Self {
            request: Some(request),
            slot: Some(slot),
        }
    }

    pub(crate) fn detached() -> Self {
        Self {
            request: None,
            slot: None,
        }
    }

    /// Abandon the request. Its response, if it still arrives, is not
    /// delivered. Calling this more than once has no further effect.
    pub fn cancel(&self) {
        if let Some(slot) = &self.slot {
            slot.disarm();
        }
        if let Some(request) = &self.request {
            request.cancel();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.request
            .as_ref()
            .map(|request| request.is_pending())
            .unwrap_or(false)
    }
}

impl std::fmt::Debug for DispatchHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchHandle")
            .field("has_request", &self.request.is_some())
            .field("pending", &self.is_pending())
            .finish()
    }
}
