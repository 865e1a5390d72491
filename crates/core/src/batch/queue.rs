use std::time::Duration;

use timetrail_domain::{BatchConfig, BatchItemFailure, BatchOp, BatchReport, BatchState, Result};
use tracing::{info, warn};

use super::lock::{BatchLock, BatchPermit};

/// Sequential runner for batch operations.
#[derive(Debug, Default)]
pub struct BatchQueue {
    lock: BatchLock,
    item_delay: Duration,
    timeout: Option<Duration>,
}

impl BatchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &BatchConfig) -> Self {
        Self { lock: BatchLock::new(), item_delay: config.item_delay(), timeout: config.timeout() }
    }

    /// Pause between items, on top of the cooperative yield.
    #[must_use]
    pub fn with_item_delay(mut self, delay: Duration) -> Self {
        self.item_delay = delay;
        self
    }

    /// Give up on the remaining items after `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn state(&self) -> BatchState {
        self.lock.state()
    }

    /// Take the batch lock.
    ///
    /// # Errors
    /// Returns `TimetrailError::BatchInProgress` while another batch runs.
    pub fn try_start(&self) -> Result<BatchPermit<'_>> {
        self.lock.try_acquire()
    }

    /// Apply `ops` in order through `apply`.
    ///
    /// A failing item is recorded in the report and the batch moves on. If
    /// the timeout fires, the items not yet attempted are counted as
    /// skipped.
    pub async fn process<F>(
        &self,
        _permit: &BatchPermit<'_>,
        ops: &[BatchOp],
        mut apply: F,
    ) -> BatchReport
    where
        F: FnMut(&BatchOp) -> Result<()> + Send,
    {
        let mut report = BatchReport { total: ops.len(), ..BatchReport::default() };
        let mut attempted = 0;
        info!(items = ops.len(), "batch started");

        let run = async {
            for (index, op) in ops.iter().enumerate() {
                match apply(op) {
                    Ok(()) => report.applied += 1,
                    Err(err) => {
                        warn!(index, id = ?op.target_id(), error = %err, "batch item failed");
                        report.failures.push(BatchItemFailure {
                            index,
                            id: op.target_id().map(str::to_string),
                            reason: err.to_string(),
                        });
                    }
                }
                attempted += 1;
                tokio::task::yield_now().await;
                if !self.item_delay.is_zero() {
                    tokio::time::sleep(self.item_delay).await;
                }
            }
        };

        let timed_out = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, run).await.is_err(),
            None => {
                run.await;
                false
            }
        };

        if timed_out {
            report.timed_out = true;
            report.skipped = ops.len() - attempted;
            warn!(skipped = report.skipped, "batch timed out");
        }
        info!(
            applied = report.applied,
            failed = report.failures.len(),
            skipped = report.skipped,
            "batch finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use timetrail_domain::{Entry, TimetrailError};

    use super::*;

    fn remove(id: &str) -> BatchOp {
        BatchOp::Remove { id: id.into() }
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_the_batch() {
        let queue = BatchQueue::new();
        let permit = queue.try_start().unwrap();
        let ops = vec![remove("a"), remove("missing"), remove("b")];

        let mut seen = Vec::new();
        let report = queue
            .process(&permit, &ops, |op| {
                let id = op.target_id().unwrap_or_default().to_string();
                seen.push(id.clone());
                if id == "missing" {
                    Err(TimetrailError::InvalidInput("unknown entry".into()))
                } else {
                    Ok(())
                }
            })
            .await;

        assert_eq!(seen, ["a", "missing", "b"]);
        assert_eq!(report.total, 3);
        assert_eq!(report.applied, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 1);
        assert_eq!(report.failures[0].id.as_deref(), Some("missing"));
        assert!(!report.timed_out);
        assert_eq!(queue.state(), BatchState::Running);

        permit.finish();
        assert_eq!(queue.state(), BatchState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_skips_remaining_items() {
        let queue = BatchQueue::new()
            .with_item_delay(Duration::from_millis(100))
            .with_timeout(Duration::from_millis(250));
        let permit = queue.try_start().unwrap();
        let ops: Vec<BatchOp> = (0..10).map(|i| remove(&i.to_string())).collect();

        let report = queue.process(&permit, &ops, |_| Ok(())).await;

        assert!(report.timed_out);
        assert_eq!(report.applied, 3);
        assert_eq!(report.skipped, 7);
        assert!(!report.is_clean());
    }

    #[tokio::test]
    async fn test_add_op_reports_entry_id() {
        let queue = BatchQueue::new();
        let permit = queue.try_start().unwrap();
        let ops = vec![BatchOp::Add { entry: Entry::new(0, None, vec![]).with_id("new") }];

        let report = queue
            .process(&permit, &ops, |_| Err(TimetrailError::InvalidInput("nope".into())))
            .await;

        assert_eq!(report.failures[0].id.as_deref(), Some("new"));
    }
}
