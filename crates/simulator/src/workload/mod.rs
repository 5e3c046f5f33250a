//! Workload for the lending ledger.
//!
//! Every borrower gets the same action mix: Borrow at the configured
//! probability and, when its probability is non-zero, Repay.

mod borrow;
mod repay;

pub use borrow::BorrowAction;
pub use repay::RepayAction;

use crate::accounts::AccountPool;
use crate::config::WorkloadConfig;
use crate::ledger::{LedgerState, LendingLedger};
use flocc_core::{Account, Actor, ConfigurationError};
use flocc_simulation::Environment;
use std::sync::Arc;
use tracing::debug;

/// Builds borrower actors sharing one set of action instances.
#[derive(Debug, Clone)]
pub struct LendingWorkload {
    borrow: Arc<BorrowAction>,
    borrow_probability: f64,
    repay: Option<(Arc<RepayAction>, f64)>,
}

impl LendingWorkload {
    /// Create the workload against `ledger`.
    pub fn new(ledger: &LendingLedger, config: &WorkloadConfig) -> Self {
        let repay = (config.repay_probability != 0.0).then(|| {
            (
                Arc::new(RepayAction::new(ledger.clone(), config.max_repay)),
                config.repay_probability,
            )
        });

        Self {
            borrow: Arc::new(BorrowAction::new(ledger.clone(), config.max_borrow)),
            borrow_probability: config.borrow_probability,
            repay,
        }
    }

    /// Build the actor for borrower `index`.
    pub fn borrower(
        &self,
        index: usize,
        account: Account,
    ) -> Result<Actor<LedgerState>, ConfigurationError> {
        let mut builder = Actor::builder(
            format!("borrower-{}", index),
            format!("Borrower {}", index),
            account,
        )
        .with_action(self.borrow.clone(), self.borrow_probability);

        if let Some((repay, probability)) = &self.repay {
            builder = builder.with_action(repay.clone(), *probability);
        }

        builder.build()
    }

    /// Register one borrower per account in `pool`.
    pub fn populate(
        &self,
        environment: &mut Environment<LedgerState>,
        pool: &AccountPool,
    ) -> Result<(), ConfigurationError> {
        for (index, account) in pool.accounts().iter().enumerate() {
            environment.register(self.borrower(index, account.clone())?)?;
        }
        debug!(borrowers = pool.len(), "Registered borrowers");
        Ok(())
    }
}
