//! Scenario assembly and execution.

use crate::accounts::AccountPool;
use crate::config::SimulatorConfig;
use crate::ledger::{LedgerSnapshotProvider, LedgerState, LendingLedger};
use crate::workload::LendingWorkload;
use crate::ScenarioError;
use flocc_simulation::{Environment, RunReport, Runner};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// A lending-ledger scenario ready to run.
pub struct Simulator {
    ledger: LendingLedger,
    runner: Runner<LedgerSnapshotProvider>,
}

impl Simulator {
    /// Build the ledger, the borrower population and the runner.
    pub fn new(config: &SimulatorConfig) -> Result<Self, ScenarioError> {
        let options = config.to_run_options()?;

        let ledger = LendingLedger::new(config.population.initial_liquidity)
            .with_fault_every(config.workload.fault_every);
        let pool = AccountPool::generate(
            config.population.borrowers,
            config.population.account_seed,
        );

        let mut environment: Environment<LedgerState> = Environment::new();
        LendingWorkload::new(&ledger, &config.workload).populate(&mut environment, &pool)?;

        let runner = Runner::new(
            environment,
            LedgerSnapshotProvider::new(ledger.clone()),
            options,
        )?;

        info!(
            borrowers = pool.len(),
            liquidity = config.population.initial_liquidity,
            seed = %config.run.seed,
            iterations = config.run.iterations,
            "Simulator ready"
        );

        Ok(Self { ledger, runner })
    }

    /// Run every round.
    pub async fn run(&mut self) -> RunReport {
        self.runner.run().await
    }

    /// Token that stops the run between actions.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.runner.cancellation_token()
    }

    /// Current ledger contents.
    pub fn ledger_state(&self) -> LedgerState {
        self.ledger.state()
    }

    pub fn runner(&self) -> &Runner<LedgerSnapshotProvider> {
        &self.runner
    }
}
