//! In-memory transport driven by the test
//!
//! Requests are recorded on submission and complete only when the test calls
//! `respond`/`fail`, which mimics a response arriving on a later turn of the
//! event loop.

use dmr_dispatch::errors::TransportError;
use dmr_dispatch::http::{HttpRequest, PendingRequest, ResponseCallback, Transport, TransportResponse};
use reqwest::header::HeaderMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct RequestState {
    cancelled: AtomicBool,
    completed: AtomicBool,
}

struct Submitted {
    request: HttpRequest,
    callback: Option<ResponseCallback>,
    state: Arc<RequestState>,
}

struct ManualRequest {
    state: Arc<RequestState>,
}

impl PendingRequest for ManualRequest {
    fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::SeqCst);
    }

    fn is_pending(&self) -> bool {
        !self.state.cancelled.load(Ordering::SeqCst) && !self.state.completed.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct ManualTransport {
    submitted: Mutex<Vec<Submitted>>,
    reject: AtomicBool,
}

impl ManualTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Transport whose `send` always fails before anything is sent
    pub fn rejecting() -> Arc<Self> {
        let transport = Self::default();
        transport.reject.store(true, Ordering::SeqCst);
        Arc::new(transport)
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.submitted
            .lock()
            .unwrap()
            .iter()
            .map(|s| s.request.clone())
            .collect()
    }

    pub fn respond(&self, index: usize, status: u16, body: &str, headers: &[(&'static str, &str)]) {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.insert(*name, value.parse().unwrap());
        }
        self.complete(
            index,
            Ok(TransportResponse {
                status,
                status_text: format!("Status {}", status),
                headers: map,
                body: body.to_string(),
            }),
        );
    }

    pub fn fail(&self, index: usize, error: TransportError) {
        self.complete(index, Err(error));
    }

    /// Cancelled requests drop their callback, as a real transport would
    fn complete(&self, index: usize, outcome: Result<TransportResponse, TransportError>) {
        let (callback, state) = {
            let mut submitted = self.submitted.lock().unwrap();
            let entry = &mut submitted[index];
            (entry.callback.take(), entry.state.clone())
        };

        let Some(callback) = callback else {
            panic!("request {} already completed", index);
        };
        if state.cancelled.load(Ordering::SeqCst) {
            return;
        }
        state.completed.store(true, Ordering::SeqCst);
        callback(outcome);
    }
}

impl Transport for ManualTransport {
    fn send(
        &self,
        request: HttpRequest,
        callback: ResponseCallback,
    ) -> Result<Box<dyn PendingRequest>, TransportError> {
        if self.reject.load(Ordering::SeqCst) {
            return Err(TransportError::InvalidRequest {
                reason: "rejected by test transport".to_string(),
            });
        }

        let state = Arc::new(RequestState::default());
        self.submitted.lock().unwrap().push(Submitted {
            request,
            callback: Some(callback),
            state: state.clone(),
        });
        Ok(Box::new(ManualRequest { state }))
    }
}
