//! HTTP side of a dispatch
//!
//! This module turns operations into requests against the management
//! endpoint and defines the transport contract those requests are handed to.
//!
//! # Architecture
//!
//! ```text
//! Operation → RequestRouter → HttpRequest → Transport
//!                                               ↓
//!                 ResponseCallback ← TransportResponse
//! ```
//!
//! # Request Shapes
//!
//! - `read-resource-description`: GET on the resource URL, no body
//! - anything else: POST of the base64 wire payload with `Connection: Keep-Alive`
//!
//! Both carry `Accept`/`Content-Type: application/dmr-encoded` and ask for
//! credentials to be included.

pub mod router;
pub mod transport;

pub use router::RequestRouter;
pub use transport::{
    Credentials, HttpRequest, PendingRequest, ReqwestTransport, ResponseCallback, Transport,
    TransportResponse,
};
