//! Advisory operation timing. Budgets are fixed per operation category;
//! an overrun is logged and nothing else — never an abort or a retry.

use std::time::{Duration, Instant};

pub const CREATE_BUDGET: Duration = Duration::from_millis(50);
pub const READ_BUDGET: Duration = Duration::from_millis(20);
pub const LIST_BUDGET: Duration = Duration::from_millis(100);
pub const DELETE_BUDGET: Duration = Duration::from_millis(50);
pub const STATS_BUDGET: Duration = Duration::from_millis(200);

/// Measures elapsed time for one operation; reports on drop so error paths
/// are covered too.
pub struct OpTimer {
    op: &'static str,
    budget: Duration,
    started: Instant,
}

impl OpTimer {
    pub fn start(op: &'static str, budget: Duration) -> Self {
        Self {
            op,
            budget,
            started: Instant::now(),
        }
    }
}

impl Drop for OpTimer {
    fn drop(&mut self) {
        let elapsed = self.started.elapsed();
        if elapsed > self.budget {
            tracing::warn!(
                op = self.op,
                elapsed_ms = elapsed.as_millis() as u64,
                budget_ms = self.budget.as_millis() as u64,
                "operation exceeded its time budget"
            );
        } else {
            tracing::debug!(
                op = self.op,
                elapsed_ms = elapsed.as_millis() as u64,
                "operation completed"
            );
        }
    }
}
