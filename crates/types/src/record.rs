//! Per-action outcome records.

use crate::{ActorId, Iteration};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of one execute/validate pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Post-condition held.
    Pass,
    /// Post-condition was violated.
    Fail,
    /// The action or its check broke (execution error, validation error, timeout).
    Error,
}

impl Outcome {
    /// Whether this outcome counts as a violation for abort purposes.
    pub fn is_violation(self) -> bool {
        !matches!(self, Outcome::Pass)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pass => f.write_str("pass"),
            Outcome::Fail => f.write_str("fail"),
            Outcome::Error => f.write_str("error"),
        }
    }
}

/// Record of a single executed action.
///
/// Created once, after the action's outcome is known, and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationRecord {
    /// Round in which the action ran.
    pub iteration: Iteration,

    /// Actor the action ran for.
    pub actor_id: ActorId,

    /// Name of the action.
    pub action_name: String,

    /// What happened.
    pub outcome: Outcome,

    /// Error description for `Outcome::Error` (and optionally `Fail`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl IterationRecord {
    /// Create a record for a passing action.
    pub fn pass(iteration: Iteration, actor_id: ActorId, action_name: impl Into<String>) -> Self {
        Self {
            iteration,
            actor_id,
            action_name: action_name.into(),
            outcome: Outcome::Pass,
            error_detail: None,
        }
    }

    /// Create a record for a violated post-condition.
    pub fn fail(iteration: Iteration, actor_id: ActorId, action_name: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Fail,
            ..Self::pass(iteration, actor_id, action_name)
        }
    }

    /// Create a record for an action that broke.
    pub fn error(
        iteration: Iteration,
        actor_id: ActorId,
        action_name: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            outcome: Outcome::Error,
            error_detail: Some(detail.into()),
            ..Self::pass(iteration, actor_id, action_name)
        }
    }
}

impl fmt::Display for IterationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} {} {}",
            self.iteration.0, self.actor_id, self.action_name, self.outcome
        )?;
        if let Some(detail) = &self.error_detail {
            write!(f, " ({})", detail)?;
        }
        Ok(())
    }
}
