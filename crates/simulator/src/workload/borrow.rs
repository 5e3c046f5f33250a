//! Borrow action.

use crate::ledger::{LedgerState, LendingLedger};
use async_trait::async_trait;
use flocc_core::{Action, Actor, ExecutionError, RunContext, ValidationError};
use rand::Rng;

/// Borrows a random amount in `1..=max_amount` from the pool.
#[derive(Debug, Clone)]
pub struct BorrowAction {
    ledger: LendingLedger,
    max_amount: u64,
}

impl BorrowAction {
    pub fn new(ledger: LendingLedger, max_amount: u64) -> Self {
        Self {
            ledger,
            max_amount: max_amount.max(1),
        }
    }
}

#[async_trait]
impl Action<LedgerState> for BorrowAction {
    type Output = u64;

    fn name(&self) -> &str {
        "Borrow"
    }

    async fn execute(
        &self,
        ctx: &mut RunContext<'_>,
        actor: &Actor<LedgerState>,
        _before: &LedgerState,
    ) -> Result<u64, ExecutionError> {
        let amount = ctx.rng().gen_range(1..=self.max_amount);
        let address = &actor.account().address;

        self.ledger
            .borrow(address, amount)
            .map_err(|e| ExecutionError::rejected(e.to_string()))?;

        actor.log(format_args!("borrowed {}", amount));
        Ok(amount)
    }

    async fn validate(
        &self,
        ctx: &mut RunContext<'_>,
        actor: &Actor<LedgerState>,
        before: &LedgerState,
        after: &LedgerState,
        amount: &u64,
    ) -> Result<bool, ValidationError> {
        let address = &actor.account().address;
        let debt_ok = after.debt_of(address) == before.debt_of(address) + amount;
        let liquidity_ok = before.liquidity.checked_sub(*amount) == Some(after.liquidity);

        if !(debt_ok && liquidity_ok) {
            ctx.log(format_args!(
                "borrow of {} left debt {} -> {}, liquidity {} -> {}",
                amount,
                before.debt_of(address),
                after.debt_of(address),
                before.liquidity,
                after.liquidity
            ));
        }
        Ok(debt_ok && liquidity_ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::AccountPool;
    use flocc_core::{Iteration, Prng};

    fn borrower(pool: &AccountPool) -> Actor<LedgerState> {
        Actor::builder("borrower-0", "Borrower 0", pool.accounts()[0].clone())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_borrow_validates_against_ledger() {
        let ledger = LendingLedger::new(1_000);
        let action = BorrowAction::new(ledger.clone(), 100);
        let pool = AccountPool::generate(1, 1);
        let actor = borrower(&pool);
        let mut prng = Prng::new("borrow");
        let mut ctx = RunContext::new(Iteration(0), actor.id(), "Borrow", &mut prng);

        let before = ledger.state();
        let amount = action.execute(&mut ctx, &actor, &before).await.unwrap();
        let after = ledger.state();

        assert!((1..=100).contains(&amount));
        assert!(action
            .validate(&mut ctx, &actor, &before, &after, &amount)
            .await
            .unwrap());
        // A stale `after` is a violation.
        assert!(!action
            .validate(&mut ctx, &actor, &before, &before, &amount)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_faulty_ledger_fails_validation() {
        let ledger = LendingLedger::new(1_000).with_fault_every(1);
        let action = BorrowAction::new(ledger.clone(), 100);
        let pool = AccountPool::generate(1, 1);
        let actor = borrower(&pool);
        let mut prng = Prng::new("borrow");
        let mut ctx = RunContext::new(Iteration(0), actor.id(), "Borrow", &mut prng);

        let before = ledger.state();
        let amount = action.execute(&mut ctx, &actor, &before).await.unwrap();
        let after = ledger.state();

        assert!(!action
            .validate(&mut ctx, &actor, &before, &after, &amount)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_exhausted_pool_is_rejected() {
        let ledger = LendingLedger::new(0);
        let action = BorrowAction::new(ledger.clone(), 100);
        let pool = AccountPool::generate(1, 1);
        let actor = borrower(&pool);
        let mut prng = Prng::new("borrow");
        let mut ctx = RunContext::new(Iteration(0), actor.id(), "Borrow", &mut prng);

        let err = action
            .execute(&mut ctx, &actor, &ledger.state())
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutionError::Rejected(_)));
        // Same draws as one amount drawn on a fresh generator.
        let mut reference = Prng::new("borrow");
        let _ = reference.gen_range(1..=100u64);
        assert_eq!(prng.draws(), reference.draws());
        assert!(prng.draws() >= 1);
    }
}
