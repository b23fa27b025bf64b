use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::FlowError;

/// Whether the screen that issued a request is still mounted.
///
/// Clones share one flag. The screen revokes it on unmount; code resuming
/// after an `.await` calls [`check`](Self::check) before touching shared
/// state.
#[derive(Debug, Clone)]
pub struct Relevance(Arc<AtomicBool>);

impl Relevance {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_current(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn revoke(&self) {
        self.0.store(false, Ordering::Release);
    }

    pub fn check(&self) -> Result<(), FlowError> {
        if self.is_current() {
            Ok(())
        } else {
            tracing::debug!("dropping result for unmounted screen");
            Err(FlowError::Stale)
        }
    }
}

impl Default for Relevance {
    fn default() -> Self {
        Self::new()
    }
}
