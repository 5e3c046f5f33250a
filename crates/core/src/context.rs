//! Per-call view of the run handed to actions.

use crate::Prng;
use flocc_types::{ActorId, Iteration};
use std::fmt;
use tracing::info;

/// What an action sees of the run while it executes or validates.
///
/// The context borrows the run's single [`Prng`]; drawing through it keeps
/// action randomness inside the replayable stream.
pub struct RunContext<'a> {
    iteration: Iteration,
    actor_id: &'a ActorId,
    action_name: &'a str,
    rng: &'a mut Prng,
}

impl<'a> RunContext<'a> {
    /// Create a context for one action call.
    pub fn new(
        iteration: Iteration,
        actor_id: &'a ActorId,
        action_name: &'a str,
        rng: &'a mut Prng,
    ) -> Self {
        Self {
            iteration,
            actor_id,
            action_name,
            rng,
        }
    }

    /// Current round index.
    pub fn iteration(&self) -> Iteration {
        self.iteration
    }

    /// Randomness facade over the run's shared generator.
    pub fn rng(&mut self) -> &mut Prng {
        self.rng
    }

    /// Emit a log line tagged with the iteration, actor and action.
    pub fn log(&self, message: impl fmt::Display) {
        info!(
            iteration = self.iteration.0,
            actor = %self.actor_id,
            action = self.action_name,
            "{}",
            message
        );
    }
}

impl fmt::Debug for RunContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunContext")
            .field("iteration", &self.iteration)
            .field("actor_id", self.actor_id)
            .field("action_name", &self.action_name)
            .finish()
    }
}
