use reqwest::Method;

use super::DmrResponse;
use crate::codec::WireCodec;
use crate::constants::headers::{CONTENT_TYPE, LOCATION};
use crate::errors::{DispatchError, TransportError};
use crate::http::TransportResponse;
use crate::model::Operation;

/// What the response handler does with a completed exchange
#[derive(Debug)]
pub enum Classification {
    /// Hand the outcome to the caller
    Deliver(Result<DmrResponse, DispatchError>),

    /// Navigate to the given location; the caller gets nothing
    Redirect(Option<String>),
}

/// Map a completed exchange (or a transport failure) to its outcome.
///
/// | status | outcome |
/// |---|---|
/// | 200 | success with method, raw body and content type |
/// | 401, 0 | authentication required |
/// | 307 | redirect to `Location` |
/// | 503 | service unavailable |
/// | other | unexpected status with full context |
pub fn classify(
    outcome: Result<TransportResponse, TransportError>,
    method: &Method,
    operation: &Operation,
    codec: &dyn WireCodec,
) -> Classification {
    let response = match outcome {
        Ok(response) => response,
        Err(e) => return Classification::Deliver(Err(DispatchError::Transport(e))),
    };

    let result = match response.status {
        200 => Ok(DmrResponse {
            method: method.clone(),
            body: response.body.clone(),
            content_type: response.header(CONTENT_TYPE),
        }),
        401 | 0 => Err(DispatchError::AuthenticationRequired),
        307 => return Classification::Redirect(response.header(LOCATION)),
        503 => Err(DispatchError::ServiceUnavailable),
        status => Err(DispatchError::UnexpectedStatus {
            status,
            request: operation.to_string(),
            status_text: response.status_text.clone(),
            details: describe_payload(&response.body, codec),
        }),
    };
    Classification::Deliver(result)
}

/// Decoded error payload, or its raw text when it does not decode
fn describe_payload(body: &str, codec: &dyn WireCodec) -> String {
    if body.is_empty() {
        return "No details".to_string();
    }
    match codec.decode_from_base64(body) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string()),
        Err(_) => body.to_string(),
    }
}
