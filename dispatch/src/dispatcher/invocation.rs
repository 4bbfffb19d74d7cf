use std::sync::atomic::{AtomicU64, Ordering};

use crate::constants::invocation::MAX_INVOCATION_ID;

/// Source of invocation ids for trace correlation.
///
/// Ids start at 0 and increase by one per dispatch. After
/// [`MAX_INVOCATION_ID`] has been handed out the counter wraps back to 0.
/// The read-and-advance is a single atomic step, so reentrant dispatches
/// never observe the same id.
#[derive(Debug)]
pub struct InvocationCounter {
    next: AtomicU64,
}

impl InvocationCounter {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(next: u64) -> Self {
        Self {
            next: AtomicU64::new(next),
        }
    }

    pub fn next_id(&self) -> u64 {
        let previous = self
            .next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                Some(wrap(current) + 1)
            })
            .unwrap_or_else(|current| current);
        wrap(previous)
    }
}

fn wrap(candidate: u64) -> u64 {
    if candidate > MAX_INVOCATION_ID {
        0
    } else {
        candidate
    }
}

impl Default for InvocationCounter {
    fn default() -> Self {
        Self::new()
    }
}
