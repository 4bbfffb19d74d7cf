//! Central repository for wire constants, reserved names and limits
//!
//! Organized by category the same way the rest of the crate groups its
//! configuration values.

/// HTTP header names and values of management exchanges
pub mod headers {
    /// Response headers read by the classifier
    pub const CONTENT_TYPE: &str = "Content-Type";
    pub const LOCATION: &str = "Location";

    /// Media type of base64-encoded DMR payloads
    pub const DMR_ENCODED: &str = "application/dmr-encoded";

    pub const KEEP_ALIVE: &str = "Keep-Alive";
}

/// Reserved names inside an operation model
pub mod model {
    pub const OP: &str = "operation";
    pub const ADDRESS: &str = "address";
    pub const STEPS: &str = "steps";
    pub const CHILD_TYPE: &str = "child-type";
    pub const NAME: &str = "name";

    /// Marker operation name of a composite operation
    pub const COMPOSITE: &str = "composite";

    /// Operation that is answered over GET instead of POST
    pub const READ_RESOURCE_DESCRIPTION_OPERATION: &str = "read-resource-description";

    /// Value of the `operation` query parameter on description requests
    pub const RESOURCE_DESCRIPTION: &str = "resource-description";

    /// Optional parameters forwarded on description requests, in URL order.
    /// `locale` is accepted by the server although it is undocumented.
    pub const READ_RESOURCE_DESCRIPTION_OPTIONAL_PARAMETERS: [&str; 5] =
        ["recursive", "proxies", "operations", "inherited", "locale"];
}

/// Invocation id limits
pub mod invocation {
    /// Largest id ever handed out before the counter wraps back to zero
    pub const MAX_INVOCATION_ID: u64 = u64::MAX - 1;
}

/// Default configuration values
pub mod defaults {
    /// Diagnostics are off unless explicitly enabled
    pub const DIAGNOSTICS_ENABLED: bool = false;

    /// Directory holding `main.toml` when none is given on the command line
    pub const CONFIG_DIR: &str = "config";
}

/// Tracing targets
pub mod targets {
    /// Target used by the default diagnostics sink
    pub const RPC: &str = "dmr::rpc";
}
