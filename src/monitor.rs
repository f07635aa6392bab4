//! Cooperative cancellation of long-running operations

use crate::FokitError;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Observe the progress of an operation and request its cancellation.
///
/// Operations poll the monitor between their steps, a cancelled operation returns
/// [FokitError::Cancelled] without leaving partial results behind.
pub trait Monitor: Sync {
    fn is_cancelled(&self) -> bool;

    /// Return an error if a cancellation was requested
    fn check_cancel(&self) -> Result<(), FokitError> {
        match self.is_cancelled() {
            true => Err(FokitError::Cancelled),
            false => Ok(()),
        }
    }
}

/// A monitor which never cancels
#[derive(Clone, Copy, Debug, Default)]
pub struct NullMonitor;

impl Monitor for NullMonitor {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// A shared flag: all clones observe the same cancellation request.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl Monitor for CancelFlag {
    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
