//! Run results.

use flocc_types::{ActorId, Iteration, IterationRecord, Outcome};
use serde::Serialize;
use std::fmt;

/// Terminal status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunStatus {
    /// Every round was processed.
    Completed,
    /// The run stopped early; see [`AbortReason`].
    Aborted,
}

/// Why a run was aborted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AbortReason {
    /// `abort_on_violation` was set and this action failed or errored.
    Violation {
        iteration: Iteration,
        actor_id: ActorId,
        action_name: String,
    },
    /// The caller's cancellation token fired between two due actions.
    Cancelled,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::Violation {
                iteration,
                actor_id,
                action_name,
            } => write!(
                f,
                "violation by {} ({}) in iteration {}",
                actor_id, action_name, iteration.0
            ),
            AbortReason::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Outcome counts and final status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub pass_count: usize,
    pub fail_count: usize,
    pub error_count: usize,
    pub final_status: RunStatus,
}

/// Everything a run produced, in traversal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    records: Vec<IterationRecord>,
    summary: RunSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    abort_reason: Option<AbortReason>,
}

impl RunReport {
    pub(crate) fn new() -> Self {
        Self {
            records: Vec::new(),
            summary: RunSummary {
                pass_count: 0,
                fail_count: 0,
                error_count: 0,
                final_status: RunStatus::Completed,
            },
            abort_reason: None,
        }
    }

    pub(crate) fn push(&mut self, record: IterationRecord) {
        match record.outcome {
            Outcome::Pass => self.summary.pass_count += 1,
            Outcome::Fail => self.summary.fail_count += 1,
            Outcome::Error => self.summary.error_count += 1,
        }
        self.records.push(record);
    }

    pub(crate) fn abort(&mut self, reason: AbortReason) {
        self.summary.final_status = RunStatus::Aborted;
        self.abort_reason = Some(reason);
    }

    /// Records in the order the actions were executed.
    pub fn records(&self) -> &[IterationRecord] {
        &self.records
    }

    /// Consume the report, keeping the records.
    pub fn into_records(self) -> Vec<IterationRecord> {
        self.records
    }

    /// Counts and status.
    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Final status of the run.
    pub fn status(&self) -> RunStatus {
        self.summary.final_status
    }

    /// Why the run stopped early, if it did.
    pub fn abort_reason(&self) -> Option<&AbortReason> {
        self.abort_reason.as_ref()
    }

    /// Completed with no `Fail` or `Error` records.
    pub fn is_clean(&self) -> bool {
        self.summary.final_status == RunStatus::Completed
            && self.summary.fail_count == 0
            && self.summary.error_count == 0
    }

    /// Records that failed or errored.
    pub fn violations(&self) -> impl Iterator<Item = &IterationRecord> {
        self.records.iter().filter(|r| r.outcome.is_violation())
    }

    /// Print a human-readable summary to stdout.
    pub fn print(&self) {
        print!("{}", self);
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Simulation Report ===")?;
        writeln!(f, "Status:   {:?}", self.summary.final_status)?;
        if let Some(reason) = &self.abort_reason {
            writeln!(f, "Reason:   {}", reason)?;
        }
        writeln!(f, "Actions:  {}", self.records.len())?;
        writeln!(f, "  pass:   {}", self.summary.pass_count)?;
        writeln!(f, "  fail:   {}", self.summary.fail_count)?;
        writeln!(f, "  error:  {}", self.summary.error_count)?;

        let mut violations = self.violations().peekable();
        if violations.peek().is_some() {
            writeln!(f, "Violations:")?;
            for record in violations {
                writeln!(f, "  {}", record)?;
            }
        }
        Ok(())
    }
}
