//! Error taxonomy of the engine.
//!
//! Only [`ConfigurationError`] ever reaches the caller of a run. Execution
//! and validation errors are converted into `Error` records by the runner.

use flocc_types::ActorId;
use std::time::Duration;
use thiserror::Error;

/// Invalid setup, detected before a run starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// An actor with this id is already registered.
    #[error("Actor {0} is already registered")]
    DuplicateActor(ActorId),

    /// Options reference an actor that was never registered.
    #[error("Actor {0} is not registered")]
    UnknownActor(ActorId),

    /// Iteration count below zero.
    #[error("Iterations must be non-negative, got {0}")]
    NegativeIterations(i64),

    /// Random seed was empty.
    #[error("Random seed must not be empty")]
    EmptySeed,

    /// Two actions on one actor share a name.
    #[error("Action {action} is listed more than once on actor {actor}")]
    DuplicateAction { actor: ActorId, action: String },

    /// Action probability outside [0, 1] (or NaN).
    #[error("Action {action} on actor {actor} has invalid probability {probability}")]
    InvalidProbability {
        actor: ActorId,
        action: String,
        probability: f64,
    },
}

/// The side-effecting half of an action did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// The system under test refused the operation.
    #[error("Action rejected: {0}")]
    Rejected(String),

    /// The operation failed for another reason.
    #[error("Action execution failed: {0}")]
    Failed(String),

    /// The operation exceeded the per-action timeout.
    #[error("Action execution timed out after {0:?}")]
    TimedOut(Duration),
}

impl ExecutionError {
    /// Create a rejection error.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }

    /// Create a generic failure.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }
}

/// The post-condition check could not produce a verdict.
///
/// Distinct from a clean `false` verdict, which is a violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The check itself failed.
    #[error("Validation failed: {0}")]
    Failed(String),

    /// The check exceeded the per-action timeout.
    #[error("Validation timed out after {0:?}")]
    TimedOut(Duration),

    /// The execute output handed to validate was not of the action's output type.
    #[error("Action {0} received an output of the wrong type")]
    OutputMismatch(String),
}

impl ValidationError {
    /// Create a generic validation failure.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }
}
