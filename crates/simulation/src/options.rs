//! Run configuration.

use flocc_core::ConfigurationError;
use flocc_types::ActorId;
use std::time::Duration;

/// Configuration for a simulation run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunOptions {
    /// Number of rounds. Signed so that callers passing through untrusted
    /// input get a configuration error rather than a wrap-around.
    pub iterations: i64,

    /// Seed for the run's random source. Must be non-empty.
    pub random_seed: String,

    /// Permute actor order once per round.
    pub shuffle_agents: bool,

    /// Stop the run at the first `Fail` or `Error` record.
    pub abort_on_violation: bool,

    /// Upper bound on each execute and each validate call.
    pub per_action_timeout: Option<Duration>,

    /// Restrict the run to these registered actors. `None` runs all of them.
    pub only_actors: Option<Vec<ActorId>>,
}

impl RunOptions {
    /// Create options with the given seed and defaults for everything else.
    pub fn new(random_seed: impl Into<String>) -> Self {
        Self {
            random_seed: random_seed.into(),
            ..Default::default()
        }
    }

    /// Set the number of rounds.
    pub fn with_iterations(mut self, iterations: i64) -> Self {
        self.iterations = iterations;
        self
    }

    /// Enable or disable per-round actor shuffling.
    pub fn with_shuffle_agents(mut self, shuffle: bool) -> Self {
        self.shuffle_agents = shuffle;
        self
    }

    /// Enable or disable abort on the first violation.
    pub fn with_abort_on_violation(mut self, abort: bool) -> Self {
        self.abort_on_violation = abort;
        self
    }

    /// Bound each execute and validate call.
    pub fn with_per_action_timeout(mut self, timeout: Duration) -> Self {
        self.per_action_timeout = Some(timeout);
        self
    }

    /// Run only the listed actors (still in registration order).
    pub fn with_only_actors<I, A>(mut self, actors: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<ActorId>,
    {
        self.only_actors = Some(actors.into_iter().map(Into::into).collect());
        self
    }

    /// Check the options that do not depend on the environment.
    ///
    /// Returns the iteration count as unsigned on success.
    pub fn validate(&self) -> Result<u64, ConfigurationError> {
        if self.random_seed.is_empty() {
            return Err(ConfigurationError::EmptySeed);
        }
        u64::try_from(self.iterations)
            .map_err(|_| ConfigurationError::NegativeIterations(self.iterations))
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            iterations: 10,
            random_seed: "test-seed".to_string(),
            shuffle_agents: false,
            abort_on_violation: false,
            per_action_timeout: None,
            only_actors: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = RunOptions::default();
        assert_eq!(options.iterations, 10);
        assert_eq!(options.random_seed, "test-seed");
        assert!(!options.shuffle_agents);
        assert!(!options.abort_on_violation);
        assert!(options.per_action_timeout.is_none());
        assert!(options.only_actors.is_none());
    }

    #[test]
    fn test_validate() {
        assert_eq!(RunOptions::new("s1").with_iterations(0).validate(), Ok(0));
        assert_eq!(RunOptions::new("s1").with_iterations(5).validate(), Ok(5));
        assert_eq!(
            RunOptions::new("s1").with_iterations(-1).validate(),
            Err(ConfigurationError::NegativeIterations(-1))
        );
        assert_eq!(
            RunOptions::new("").with_iterations(5).validate(),
            Err(ConfigurationError::EmptySeed)
        );
    }

    #[test]
    fn test_only_actors_builder() {
        let options = RunOptions::new("s").with_only_actors(["a", "b"]);
        assert_eq!(
            options.only_actors,
            Some(vec![ActorId::from("a"), ActorId::from("b")])
        );
    }
}
