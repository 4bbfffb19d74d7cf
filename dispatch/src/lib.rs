pub mod codec;
pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod dispatcher;
pub mod errors;
pub mod http;
pub mod model;
pub mod navigation;

// Re-export commonly used types
pub use codec::{Base64JsonCodec, WireCodec};
pub use config::{Config, ConfigManager};
pub use diagnostics::{DiagnosticsSink, TraceEvent, Tracer, TracingSink};
pub use dispatcher::{ActionHandler, DispatchHandle, DispatchResult, Dispatcher, DmrResponse};
pub use errors::{ConfigError, DispatchError, TransportError};
pub use http::{ReqwestTransport, Transport};
pub use model::{Operation, ResourceAddress};
pub use navigation::{LoggingNavigator, Navigator};
