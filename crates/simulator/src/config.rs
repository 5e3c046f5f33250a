//! Configuration types for the simulator.
//!
//! A scenario is read from TOML; every field has a default, so an empty
//! file (or no file) describes the reference scenario: ten borrowers, each
//! borrowing with probability 0.8, for ten iterations under seed
//! `"test-seed"`.

use crate::ScenarioError;
use flocc_simulation::RunOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a simulation run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulatorConfig {
    /// Run-level options.
    pub run: RunConfig,

    /// Participants and initial state.
    pub population: PopulationConfig,

    /// Action mix.
    pub workload: WorkloadConfig,
}

impl SimulatorConfig {
    /// Create a configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML scenario.
    pub fn from_toml_str(source: &str) -> Result<Self, ScenarioError> {
        Ok(toml::from_str(source)?)
    }

    /// Read a TOML scenario file.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let source = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String, ScenarioError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Set the number of iterations.
    pub fn with_iterations(mut self, iterations: i64) -> Self {
        self.run.iterations = iterations;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.run.seed = seed.into();
        self
    }

    /// Set the number of borrowers.
    pub fn with_borrowers(mut self, borrowers: usize) -> Self {
        self.population.borrowers = borrowers;
        self
    }

    /// Set the workload configuration.
    pub fn with_workload(mut self, workload: WorkloadConfig) -> Self {
        self.workload = workload;
        self
    }

    /// Apply command-line overrides on top of file values.
    pub fn apply(&mut self, overrides: RunOverrides) {
        if let Some(iterations) = overrides.iterations {
            self.run.iterations = iterations;
        }
        if let Some(seed) = overrides.seed {
            self.run.seed = seed;
        }
        if let Some(borrowers) = overrides.borrowers {
            self.population.borrowers = borrowers;
        }
        if let Some(shuffle) = overrides.shuffle_agents {
            self.run.shuffle_agents = shuffle;
        }
        if let Some(abort) = overrides.abort_on_violation {
            self.run.abort_on_violation = abort;
        }
        if let Some(timeout) = overrides.per_action_timeout {
            self.run.per_action_timeout = Some(timeout);
        }
        if let Some(n) = overrides.fault_every {
            self.workload.fault_every = n;
        }
    }

    /// Convert to the engine's run options.
    pub fn to_run_options(&self) -> Result<RunOptions, ScenarioError> {
        let mut options = RunOptions::new(self.run.seed.clone())
            .with_iterations(self.run.iterations)
            .with_shuffle_agents(self.run.shuffle_agents)
            .with_abort_on_violation(self.run.abort_on_violation);

        if let Some(timeout) = &self.run.per_action_timeout {
            let timeout = humantime::parse_duration(timeout).map_err(|source| {
                ScenarioError::InvalidTimeout {
                    value: timeout.clone(),
                    source,
                }
            })?;
            options = options.with_per_action_timeout(timeout);
        }

        Ok(options)
    }
}

/// Values set on the command line. `None` keeps the file value, so flags
/// can switch options off as well as on.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunOverrides {
    pub iterations: Option<i64>,
    pub seed: Option<String>,
    pub borrowers: Option<usize>,
    pub shuffle_agents: Option<bool>,
    pub abort_on_violation: Option<bool>,
    pub per_action_timeout: Option<String>,
    pub fault_every: Option<u64>,
}

/// Run-level options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Number of rounds.
    pub iterations: i64,

    /// Seed for the run's random source.
    pub seed: String,

    /// Permute actor order every round.
    pub shuffle_agents: bool,

    /// Stop at the first failed or errored action.
    pub abort_on_violation: bool,

    /// Bound on each execute/validate call, e.g. `"500ms"` or `"2s"`.
    pub per_action_timeout: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            iterations: 10,
            seed: "test-seed".to_string(),
            shuffle_agents: false,
            abort_on_violation: false,
            per_action_timeout: None,
        }
    }
}

/// Participants and initial ledger state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PopulationConfig {
    /// Number of borrower actors.
    pub borrowers: usize,

    /// Liquidity the pool starts with.
    pub initial_liquidity: u64,

    /// Seed for account address derivation (independent of the run seed).
    pub account_seed: u64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            borrowers: 10,
            initial_liquidity: 1_000_000,
            account_seed: 100,
        }
    }
}

/// Action mix for every borrower.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkloadConfig {
    /// Per-round chance that a borrower borrows.
    pub borrow_probability: f64,

    /// Per-round chance that a borrower repays. `0` leaves the action out.
    pub repay_probability: f64,

    /// Upper bound of a single borrow.
    pub max_borrow: u64,

    /// Upper bound of a single repayment.
    pub max_repay: u64,

    /// Inject a bookkeeping fault into every Nth borrow. `0` disables it.
    pub fault_every: u64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            borrow_probability: 0.8,
            repay_probability: 0.0,
            max_borrow: 100,
            max_repay: 100,
            fault_every: 0,
        }
    }
}

impl WorkloadConfig {
    /// Borrow-only workload.
    pub fn borrow_only(probability: f64) -> Self {
        Self {
            borrow_probability: probability,
            ..Default::default()
        }
    }

    /// Set the repay probability.
    pub fn with_repay_probability(mut self, probability: f64) -> Self {
        self.repay_probability = probability;
        self
    }

    /// Inject a ledger fault into every `n`th borrow.
    pub fn with_fault_every(mut self, n: u64) -> Self {
        self.fault_every = n;
        self
    }
}
