//! Capability traits implemented by hosts.

use crate::{Actor, ExecutionError, RunContext, ValidationError};
use async_trait::async_trait;

/// Captures the state of the system under test.
///
/// The runner is the only caller and never calls it concurrently. Each call
/// must reflect the state at the instant of the call; the runner guarantees
/// no other action executes between the before and after snapshots of an
/// action.
///
/// The snapshot is opaque to the engine: it is only handed back to the
/// action that triggered it, by reference.
#[async_trait]
pub trait SnapshotProvider: Send {
    /// State capture type.
    type Snapshot: Send + Sync + 'static;

    /// Take a snapshot of the current state.
    async fn snapshot(&mut self) -> Self::Snapshot;
}

/// A unit of simulated behaviour.
///
/// `S` is the snapshot type of the provider the action runs against.
///
/// # Contract
///
/// - `execute` performs the side effect. It may await external calls, but
///   must draw randomness only through [`RunContext::rng`].
/// - `validate` is read-only and deterministic given identical inputs. It
///   returns `Ok(true)` iff the post-condition holds, `Ok(false)` when it is
///   violated, and `Err` only when the check itself cannot be performed.
/// - Neither method retries; retrying is up to the implementation.
///
/// # Example
///
/// ```ignore
/// struct Borrow { ledger: LendingLedger }
///
/// #[async_trait]
/// impl Action<LedgerState> for Borrow {
///     type Output = u64;
///
///     fn name(&self) -> &str { "Borrow" }
///
///     async fn execute(&self, ctx: &mut RunContext<'_>, actor: &Actor<LedgerState>, _before: &LedgerState)
///         -> Result<u64, ExecutionError>
///     {
///         let amount = ctx.rng().gen_range(1..=100);
///         self.ledger.borrow(&actor.account().address, amount)?;
///         Ok(amount)
///     }
///
///     async fn validate(&self, _ctx: &mut RunContext<'_>, actor: &Actor<LedgerState>,
///         before: &LedgerState, after: &LedgerState, amount: &u64) -> Result<bool, ValidationError>
///     {
///         Ok(after.debt_of(&actor.account().address) == before.debt_of(&actor.account().address) + amount)
///     }
/// }
/// ```
#[async_trait]
pub trait Action<S>: Send + Sync + 'static
where
    S: Send + Sync + 'static,
{
    /// Value carried from `execute` to `validate`.
    type Output: Send + Sync + 'static;

    /// Unique name of the action.
    fn name(&self) -> &str;

    /// Perform the side-effecting operation.
    async fn execute(
        &self,
        ctx: &mut RunContext<'_>,
        actor: &Actor<S>,
        before: &S,
    ) -> Result<Self::Output, ExecutionError>;

    /// Check the post-condition.
    async fn validate(
        &self,
        ctx: &mut RunContext<'_>,
        actor: &Actor<S>,
        before: &S,
        after: &S,
        output: &Self::Output,
    ) -> Result<bool, ValidationError>;
}
