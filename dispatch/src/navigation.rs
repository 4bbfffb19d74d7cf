//! Redirect target of the enclosing environment
//!
//! A 307 from the management endpoint means the console must leave the
//! current page (usually for a login flow). The dispatcher only knows how to
//! ask a [`Navigator`] to go there.

use tracing::warn;

pub trait Navigator: Send + Sync {
    fn navigate_to(&self, url: &str);
}

/// Navigator for headless environments: there is nowhere to go, so the
/// target is logged for the operator.
#[derive(Debug, Clone, Default)]
pub struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn navigate_to(&self, url: &str) {
        warn!("Management endpoint requested navigation to {}", url);
    }
}
