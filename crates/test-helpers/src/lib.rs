//! Fake collaborators for exercising the engine without a live system.
//!
//! - [`SequenceProvider`]: every snapshot is the next integer, so each
//!   snapshot is unique and traceable to the call that produced it.
//! - [`ScriptedAction`]: an action whose outcome per iteration is scripted,
//!   and which records every call it receives in a [`CallLog`].
//! - [`Counter`], [`CounterProvider`], [`IncrementAction`]: a minimal
//!   stateful system whose snapshots change only when an action runs.

use async_trait::async_trait;
use flocc_core::{
    Account, Action, Actor, ActorId, Credential, ExecutionError, RunContext, SnapshotProvider,
    ValidationError,
};
use parking_lot::Mutex;
use rand::RngCore;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Long enough that any test timeout fires first.
const HANG: Duration = Duration::from_secs(3600);

/// Deterministic key account for index `i`.
pub fn test_account(i: u64) -> Account {
    Account::key(format!("0x{:040x}", i), Credential::none())
}

/// Build an actor over `u64` snapshots with the given actions.
pub fn actor_with<A>(id: &str, actions: Vec<(Arc<A>, f64)>) -> Actor<u64>
where
    A: Action<u64>,
{
    let mut builder = Actor::builder(id, "Tester", test_account(0));
    for (action, probability) in actions {
        builder = builder.with_action(action, probability);
    }
    builder.build().expect("test actor probabilities are valid")
}

// ═══════════════════════════════════════════════════════════════════════════
// Snapshot providers
// ═══════════════════════════════════════════════════════════════════════════

/// Snapshot provider returning 0, 1, 2, ... on successive calls.
#[derive(Debug, Default)]
pub struct SequenceProvider {
    next: u64,
}

impl SequenceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of snapshots taken so far.
    pub fn snapshots_taken(&self) -> u64 {
        self.next
    }
}

#[async_trait]
impl SnapshotProvider for SequenceProvider {
    type Snapshot = u64;

    async fn snapshot(&mut self) -> u64 {
        let value = self.next;
        self.next += 1;
        value
    }
}

/// Shared counter standing in for a system under test.
#[derive(Debug, Clone, Default)]
pub struct Counter(Arc<AtomicU64>);

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    pub fn add(&self, n: u64) {
        self.0.fetch_add(n, Ordering::SeqCst);
    }
}

/// Snapshots the current value of a [`Counter`].
#[derive(Debug, Clone)]
pub struct CounterProvider(Counter);

impl CounterProvider {
    pub fn new(counter: Counter) -> Self {
        Self(counter)
    }
}

#[async_trait]
impl SnapshotProvider for CounterProvider {
    type Snapshot = u64;

    async fn snapshot(&mut self) -> u64 {
        self.0.get()
    }
}

/// Increments the counter by one; valid iff the snapshots moved by one.
#[derive(Debug, Clone)]
pub struct IncrementAction {
    counter: Counter,
}

impl IncrementAction {
    pub fn new(counter: Counter) -> Self {
        Self { counter }
    }
}

#[async_trait]
impl Action<u64> for IncrementAction {
    type Output = ();

    fn name(&self) -> &str {
        "Increment"
    }

    async fn execute(
        &self,
        _ctx: &mut RunContext<'_>,
        _actor: &Actor<u64>,
        _before: &u64,
    ) -> Result<(), ExecutionError> {
        self.counter.add(1);
        Ok(())
    }

    async fn validate(
        &self,
        _ctx: &mut RunContext<'_>,
        _actor: &Actor<u64>,
        before: &u64,
        after: &u64,
        _output: &(),
    ) -> Result<bool, ValidationError> {
        Ok(*after == before + 1)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Scripted actions
// ═══════════════════════════════════════════════════════════════════════════

/// What a [`ScriptedAction`] does in a given iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Execute succeeds, validate returns true.
    Pass,
    /// Execute succeeds, validate returns false.
    Fail,
    /// Execute returns an error.
    ExecutionError,
    /// Execute succeeds, validate returns an error.
    ValidationError,
    /// Execute never finishes on its own.
    HangExecute,
    /// Validate never finishes on its own.
    HangValidate,
}

/// One call received by a scripted action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Execute {
        iteration: u64,
        actor: ActorId,
        action: String,
        before: u64,
        drawn: Vec<u64>,
    },
    Validate {
        iteration: u64,
        actor: ActorId,
        action: String,
        before: u64,
        after: u64,
        /// The `before` snapshot that execute saw, carried in its output.
        executed_with: u64,
    },
}

/// Shared, append-only log of calls. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, call: Call) {
        self.0.lock().push(call);
    }

    /// Copy of every call so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }
}

/// Output of a scripted execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Executed {
    pub before: u64,
    pub drawn: Vec<u64>,
}

/// Action whose behaviour is scripted per iteration.
#[derive(Debug, Clone)]
pub struct ScriptedAction {
    name: String,
    script: HashMap<u64, Step>,
    default: Step,
    draws: usize,
    log: CallLog,
}

impl ScriptedAction {
    /// An action that passes in every iteration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: HashMap::new(),
            default: Step::Pass,
            draws: 0,
            log: CallLog::new(),
        }
    }

    /// Behave as `step` in `iteration`.
    pub fn with_step(mut self, iteration: u64, step: Step) -> Self {
        self.script.insert(iteration, step);
        self
    }

    /// Behaviour for iterations without a scripted step.
    pub fn with_default(mut self, step: Step) -> Self {
        self.default = step;
        self
    }

    /// Draw `n` values from the context RNG on every execute.
    pub fn with_draws(mut self, n: usize) -> Self {
        self.draws = n;
        self
    }

    /// Record calls into `log` (shared with other actions if desired).
    pub fn with_log(mut self, log: CallLog) -> Self {
        self.log = log;
        self
    }

    /// The log this action records into.
    pub fn log(&self) -> &CallLog {
        &self.log
    }

    fn step(&self, iteration: u64) -> Step {
        self.script.get(&iteration).copied().unwrap_or(self.default)
    }
}

#[async_trait]
impl Action<u64> for ScriptedAction {
    type Output = Executed;

    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(
        &self,
        ctx: &mut RunContext<'_>,
        actor: &Actor<u64>,
        before: &u64,
    ) -> Result<Executed, ExecutionError> {
        let iteration = ctx.iteration().0;
        let drawn: Vec<u64> = (0..self.draws).map(|_| ctx.rng().next_u64()).collect();
        self.log.push(Call::Execute {
            iteration,
            actor: actor.id().clone(),
            action: self.name.clone(),
            before: *before,
            drawn: drawn.clone(),
        });

        match self.step(iteration) {
            Step::ExecutionError => Err(ExecutionError::rejected("scripted rejection")),
            Step::HangExecute => {
                tokio::time::sleep(HANG).await;
                Ok(Executed {
                    before: *before,
                    drawn,
                })
            }
            _ => Ok(Executed {
                before: *before,
                drawn,
            }),
        }
    }

    async fn validate(
        &self,
        ctx: &mut RunContext<'_>,
        actor: &Actor<u64>,
        before: &u64,
        after: &u64,
        output: &Executed,
    ) -> Result<bool, ValidationError> {
        let iteration = ctx.iteration().0;
        self.log.push(Call::Validate {
            iteration,
            actor: actor.id().clone(),
            action: self.name.clone(),
            before: *before,
            after: *after,
            executed_with: output.before,
        });

        match self.step(iteration) {
            Step::Fail => Ok(false),
            Step::ValidationError => Err(ValidationError::failed("scripted check failure")),
            Step::HangValidate => {
                tokio::time::sleep(HANG).await;
                Ok(true)
            }
            _ => Ok(true),
        }
    }
}
