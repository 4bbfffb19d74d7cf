//! Wire codec seam
//!
//! The dispatcher never touches the byte-level encoding. It asks a
//! [`WireCodec`] for the base64 text of an operation and for the decoded
//! value of an error payload.

use anyhow::{anyhow, Result};
use base64::Engine;
use serde_json::Value;

use crate::model::Operation;

pub trait WireCodec: Send + Sync {
    /// Base64 text of the full operation, nested steps included
    fn encode_to_base64(&self, operation: &Operation) -> Result<String>;

    /// Decode a base64 payload into a model value
    fn decode_from_base64(&self, payload: &str) -> Result<Value>;
}

/// Codec that serializes the operation's model value as JSON before
/// base64-encoding it.
#[derive(Debug, Clone, Default)]
pub struct Base64JsonCodec;

impl WireCodec for Base64JsonCodec {
    fn encode_to_base64(&self, operation: &Operation) -> Result<String> {
        let bytes = serde_json::to_vec(&operation.to_model())
            .map_err(|e| anyhow!("Failed to serialize operation: {}", e))?;
        Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    fn decode_from_base64(&self, payload: &str) -> Result<Value> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| anyhow!("Failed to base64-decode payload: {}", e))?;
        serde_json::from_slice(&bytes).map_err(|e| anyhow!("Failed to parse decoded payload: {}", e))
    }
}
