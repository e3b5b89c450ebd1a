//! 協調的タイムアウトとキャンセル

use crate::ReasonerError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cancels a running check from another thread
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub(crate) fn clear(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Deadline and cancellation flag polled by the completion loop
#[derive(Debug, Clone)]
pub struct Timer {
    started: Instant,
    deadline: Option<Instant>,
    cancel: CancelHandle,
}

impl Timer {
    pub fn new(timeout: Option<Duration>, cancel: CancelHandle) -> Self {
        let started = Instant::now();
        Self {
            started,
            deadline: timeout.map(|t| started + t),
            cancel,
        }
    }

    /// A timer that never fires
    pub fn unlimited() -> Self {
        Self::new(None, CancelHandle::new())
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn check(&self) -> Result<(), ReasonerError> {
        if self.cancel.is_cancelled() {
            return Err(ReasonerError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(ReasonerError::Timeout {
                elapsed_ms: self.elapsed().as_millis() as u64,
            }),
            _ => Ok(()),
        }
    }
}
