//! Repay action.

use crate::ledger::{LedgerState, LendingLedger};
use async_trait::async_trait;
use flocc_core::{Action, Actor, ExecutionError, RunContext, ValidationError};
use rand::Rng;

/// Repays a random amount in `1..=max_amount`, capped at the actor's debt.
///
/// An actor with nothing owed repays nothing and expects the ledger to be
/// left untouched.
#[derive(Debug, Clone)]
pub struct RepayAction {
    ledger: LendingLedger,
    max_amount: u64,
}

impl RepayAction {
    pub fn new(ledger: LendingLedger, max_amount: u64) -> Self {
        Self {
            ledger,
            max_amount: max_amount.max(1),
        }
    }
}

#[async_trait]
impl Action<LedgerState> for RepayAction {
    type Output = u64;

    fn name(&self) -> &str {
        "Repay"
    }

    async fn execute(
        &self,
        ctx: &mut RunContext<'_>,
        actor: &Actor<LedgerState>,
        before: &LedgerState,
    ) -> Result<u64, ExecutionError> {
        // Drawn unconditionally so the stream does not depend on ledger state.
        let amount = ctx.rng().gen_range(1..=self.max_amount);
        let address = &actor.account().address;

        if before.debt_of(address) == 0 {
            return Ok(0);
        }

        let repaid = self
            .ledger
            .repay(address, amount)
            .map_err(|e| ExecutionError::rejected(e.to_string()))?;

        actor.log(format_args!("repaid {}", repaid));
        Ok(repaid)
    }

    async fn validate(
        &self,
        _ctx: &mut RunContext<'_>,
        actor: &Actor<LedgerState>,
        before: &LedgerState,
        after: &LedgerState,
        repaid: &u64,
    ) -> Result<bool, ValidationError> {
        let address = &actor.account().address;
        let owed = before.debt_of(address);
        if *repaid > owed {
            return Err(ValidationError::failed(format!(
                "repaid {} but only {} was owed",
                repaid, owed
            )));
        }

        Ok(after.debt_of(address) == owed - repaid
            && after.liquidity == before.liquidity + repaid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::AccountPool;
    use flocc_core::{Iteration, Prng};

    #[tokio::test]
    async fn test_repay_reduces_debt() {
        let ledger = LendingLedger::new(1_000);
        let pool = AccountPool::generate(1, 9);
        let account = pool.accounts()[0].clone();
        ledger.borrow(&account.address, 500).unwrap();

        let actor: Actor<LedgerState> = Actor::builder("borrower-0", "Borrower 0", account)
            .build()
            .unwrap();
        let action = RepayAction::new(ledger.clone(), 100);
        let mut prng = Prng::new("repay");
        let mut ctx = RunContext::new(Iteration(3), actor.id(), "Repay", &mut prng);

        let before = ledger.state();
        let repaid = action.execute(&mut ctx, &actor, &before).await.unwrap();
        let after = ledger.state();

        assert!((1..=100).contains(&repaid));
        assert_eq!(after.debt_of(&actor.account().address), 500 - repaid);
        assert!(action
            .validate(&mut ctx, &actor, &before, &after, &repaid)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_repay_without_debt_is_a_no_op() {
        let ledger = LendingLedger::new(1_000);
        let pool = AccountPool::generate(1, 9);
        let actor: Actor<LedgerState> =
            Actor::builder("borrower-0", "Borrower 0", pool.accounts()[0].clone())
                .build()
                .unwrap();
        let action = RepayAction::new(ledger.clone(), 100);
        let mut prng = Prng::new("repay");
        let mut ctx = RunContext::new(Iteration(0), actor.id(), "Repay", &mut prng);

        let before = ledger.state();
        let repaid = action.execute(&mut ctx, &actor, &before).await.unwrap();

        assert_eq!(repaid, 0);
        // Same draws as one amount drawn on a fresh generator.
        let mut reference = Prng::new("repay");
        let _ = reference.gen_range(1..=100u64);
        assert_eq!(prng.draws(), reference.draws());
        assert!(prng.draws() >= 1);
        assert_eq!(ledger.state(), before);
    }

    #[tokio::test]
    async fn test_overstated_repayment_is_a_validation_error() {
        let ledger = LendingLedger::new(1_000);
        let pool = AccountPool::generate(1, 9);
        let actor: Actor<LedgerState> =
            Actor::builder("borrower-0", "Borrower 0", pool.accounts()[0].clone())
                .build()
                .unwrap();
        let action = RepayAction::new(ledger.clone(), 100);
        let mut prng = Prng::new("repay");
        let mut ctx = RunContext::new(Iteration(0), actor.id(), "Repay", &mut prng);

        let state = ledger.state();
        let err = action
            .validate(&mut ctx, &actor, &state, &state, &10)
            .await
            .unwrap_err();
        assert!(matches!(err, ValidationError::Failed(_)));
    }
}
