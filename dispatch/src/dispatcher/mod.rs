//! Dispatch of management operations
//!
//! One call to [`Dispatcher::dispatch`] runs this sequence synchronously and
//! returns a [`DispatchHandle`] right after the request is submitted:
//!
//! 1. allocate an invocation id
//! 2. trace `begin`
//! 3. route the operation to a GET or POST request
//! 4. trace `requestSerialized`
//! 5. bind a response handler to the id and the operation
//! 6. submit to the transport
//! 7. trace `requestSent`
//!
//! The response handler later traces `responseReceived`, classifies the
//! response, delivers the outcome and traces `end`. It never starts before
//! step 7, even when the transport completes on another thread first.

pub mod classifier;
mod handle;
mod handler;
pub mod invocation;

use anyhow::Result;
use reqwest::Method;
use serde_json::Value;

use crate::codec::WireCodec;
use crate::errors::DispatchError;
use crate::model::Operation;

pub use classifier::{classify, Classification};
pub use handle::DispatchHandle;
pub use handler::Dispatcher;
pub use invocation::InvocationCounter;

/// Successful management response
#[derive(Debug, Clone, PartialEq)]
pub struct DmrResponse {
    /// Method the request was sent with
    pub method: Method,
    /// Raw response text, base64 wire payload for POSTs
    pub body: String,
    pub content_type: Option<String>,
}

impl DmrResponse {
    /// Decode the body with the given codec
    pub fn decode(&self, codec: &dyn WireCodec) -> Result<Value> {
        codec.decode_from_base64(&self.body)
    }
}

pub type DispatchResult = std::result::Result<DmrResponse, DispatchError>;

/// Completion handler of one dispatch, invoked at most once
pub type ResultCallback = Box<dyn FnOnce(DispatchResult) + Send + 'static>;

/// Generic execute/undo seam a dispatch framework drives
pub trait ActionHandler {
    fn execute(&self, operation: Operation, on_result: ResultCallback) -> DispatchHandle;

    /// Compensating action for a completed operation
    fn undo(
        &self,
        operation: &Operation,
        result: &DmrResponse,
    ) -> std::result::Result<DispatchHandle, DispatchError>;
}
