use parking_lot::Mutex;
use timetrail_domain::{BatchState, Result, TimetrailError};
use tracing::warn;

/// Idle/running state machine guarding the batch queue.
#[derive(Debug)]
pub struct BatchLock {
    state: Mutex<BatchState>,
}

impl Default for BatchLock {
    fn default() -> Self {
        Self { state: Mutex::new(BatchState::Idle) }
    }
}

impl BatchLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BatchState {
        *self.state.lock()
    }

    /// Move to `Running`, or fail if a batch already holds the lock.
    ///
    /// # Errors
    /// Returns `TimetrailError::BatchInProgress` while another permit is
    /// alive.
    pub fn try_acquire(&self) -> Result<BatchPermit<'_>> {
        let mut state = self.state.lock();
        if *state == BatchState::Running {
            warn!("rejecting batch: another batch is still running");
            return Err(TimetrailError::BatchInProgress);
        }
        *state = BatchState::Running;
        Ok(BatchPermit { lock: self })
    }

    fn release(&self) {
        *self.state.lock() = BatchState::Idle;
    }
}

/// Proof of holding the batch lock. Dropping it returns the lock to idle.
#[derive(Debug)]
#[must_use = "the batch lock is released as soon as the permit is dropped"]
pub struct BatchPermit<'a> {
    lock: &'a BatchLock,
}

impl BatchPermit<'_> {
    /// Release the lock explicitly.
    pub fn finish(self) {}
}

impl Drop for BatchPermit<'_> {
    fn drop(&mut self) {
        self.lock.release();
    }
}
