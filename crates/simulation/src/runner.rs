//! Round-by-round orchestration.

use crate::{AbortReason, Environment, RunOptions, RunReport, RunStatus};
use flocc_core::{
    Actor, ConfigurationError, ExecutionError, Prng, RunContext, ScheduledAction,
    SnapshotProvider, ValidationError,
};
use flocc_types::{Iteration, IterationRecord};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

/// Lifecycle of a [`Runner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Constructed, not yet run.
    Idle,
    /// A run is in progress.
    Running,
    /// The last run processed every round.
    Completed,
    /// The last run stopped early.
    Aborted,
}

/// Drives a configured number of rounds over an [`Environment`].
///
/// Each round:
///
/// 1. Fix the actor order (registration order, or one Prng permutation).
/// 2. Take one weighted draw per (actor, action) pair, in that order, to
///    decide which actions are due.
/// 3. For each due action: snapshot, execute, snapshot, validate, record.
///
/// All selection draws of a round happen before any action executes, and
/// no draw is ever skipped because of an outcome. Together with strictly
/// serial execution this makes the record sequence a pure function of the
/// seed and the configuration.
pub struct Runner<P>
where
    P: SnapshotProvider,
{
    environment: Environment<P::Snapshot>,
    provider: P,
    options: RunOptions,
    /// Validated iteration count.
    iterations: u64,
    /// Registration positions of the actors taking part, in registration order.
    participants: Vec<usize>,
    cancel: CancellationToken,
    state: RunState,
}

impl<P> Runner<P>
where
    P: SnapshotProvider,
{
    /// Assemble a runner, validating the options against the environment.
    pub fn new(
        environment: Environment<P::Snapshot>,
        provider: P,
        options: RunOptions,
    ) -> Result<Self, ConfigurationError> {
        let iterations = options.validate().inspect_err(|e| {
            warn!(error = %e, "Invalid run options");
        })?;

        let participants = match &options.only_actors {
            None => (0..environment.len()).collect(),
            Some(ids) => {
                let mut positions = Vec::with_capacity(ids.len());
                for id in ids {
                    let position = environment
                        .position(id)
                        .ok_or_else(|| ConfigurationError::UnknownActor(id.clone()))
                        .inspect_err(|e| warn!(error = %e, "Invalid run options"))?;
                    positions.push(position);
                }
                positions.sort_unstable();
                positions.dedup();
                positions
            }
        };

        Ok(Self {
            environment,
            provider,
            options,
            iterations,
            participants,
            cancel: CancellationToken::new(),
            state: RunState::Idle,
        })
    }

    /// Use a caller-owned cancellation token.
    ///
    /// The token is checked only between due actions, never while one is
    /// executing.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that cancels this runner.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// The environment being simulated.
    pub fn environment(&self) -> &Environment<P::Snapshot> {
        &self.environment
    }

    /// The snapshot provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Options the runner was built with.
    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Execute all rounds and return the report.
    ///
    /// Every call starts a fresh run: the Prng is reseeded and the
    /// iteration counter reset, so calling `run` twice replays the same
    /// draw sequence.
    ///
    /// Dropping the returned future before it completes leaves the runner
    /// `Aborted`.
    pub async fn run(&mut self) -> RunReport {
        let mut state = StateGuard::enter(&mut self.state);
        self.environment.reset_iteration();

        let mut prng = Prng::new(self.options.random_seed.as_str());
        let mut report = RunReport::new();
        let timeout = self.options.per_action_timeout;

        info!(
            iterations = self.iterations,
            seed = %self.options.random_seed,
            actors = self.participants.len(),
            shuffle = self.options.shuffle_agents,
            abort_on_violation = self.options.abort_on_violation,
            "Starting simulation run"
        );

        'rounds: for _ in 0..self.iterations {
            if self.cancel.is_cancelled() {
                report.abort(AbortReason::Cancelled);
                break 'rounds;
            }

            let iteration = self.environment.iteration();
            let order = actor_order(&self.participants, self.options.shuffle_agents, &mut prng);
            let due = due_actions(&self.environment, &order, &mut prng);
            debug!(iteration = iteration.0, due = due.len(), "Selected due actions");

            for (actor_pos, action_pos) in due {
                if self.cancel.is_cancelled() {
                    report.abort(AbortReason::Cancelled);
                    break 'rounds;
                }

                let actor = &self.environment[actor_pos];
                let scheduled = &actor.actions()[action_pos];
                let span = info_span!(
                    "action",
                    iteration = iteration.0,
                    actor = %actor.id(),
                    action = scheduled.action.name()
                );

                let record = run_action(
                    &mut self.provider,
                    actor,
                    scheduled,
                    iteration,
                    &mut prng,
                    timeout,
                )
                .instrument(span)
                .await;

                let violation = record.outcome.is_violation();
                if violation && self.options.abort_on_violation {
                    let reason = AbortReason::Violation {
                        iteration,
                        actor_id: record.actor_id.clone(),
                        action_name: record.action_name.clone(),
                    };
                    report.push(record);
                    warn!(%reason, "Aborting run");
                    report.abort(reason);
                    break 'rounds;
                }
                report.push(record);
            }

            self.environment.advance_iteration();
        }

        state.finish(report.status());

        let summary = report.summary();
        info!(
            status = ?summary.final_status,
            records = report.records().len(),
            pass = summary.pass_count,
            fail = summary.fail_count,
            error = summary.error_count,
            "Simulation run finished"
        );

        report
    }
}

/// Actor traversal order for one round. Exactly one permutation draw
/// when shuffling, none otherwise.
fn actor_order(participants: &[usize], shuffle: bool, prng: &mut Prng) -> Vec<usize> {
    if shuffle {
        prng.permutation(participants.len())
            .into_iter()
            .map(|i| participants[i])
            .collect()
    } else {
        participants.to_vec()
    }
}

/// One weighted draw per (actor, action) pair, actor by actor, action by
/// action. Returns the due pairs in that same order.
fn due_actions<S>(
    environment: &Environment<S>,
    order: &[usize],
    prng: &mut Prng,
) -> Vec<(usize, usize)>
where
    S: Send + Sync + 'static,
{
    let mut due = Vec::new();
    for &actor_pos in order {
        for (action_pos, scheduled) in environment[actor_pos].actions().iter().enumerate() {
            if prng.weighted_bool(scheduled.probability) {
                due.push((actor_pos, action_pos));
            }
        }
    }
    due
}

/// Holds a runner in `Running` for the length of a run.
///
/// If the run future is dropped before `finish`, the runner ends up
/// `Aborted` instead of `Running`.
struct StateGuard<'a>(&'a mut RunState);

impl<'a> StateGuard<'a> {
    fn enter(state: &'a mut RunState) -> Self {
        *state = RunState::Running;
        Self(state)
    }

    fn finish(&mut self, status: RunStatus) {
        *self.0 = match status {
            RunStatus::Completed => RunState::Completed,
            RunStatus::Aborted => RunState::Aborted,
        };
    }
}

impl Drop for StateGuard<'_> {
    fn drop(&mut self) {
        if *self.0 == RunState::Running {
            warn!("Run dropped before finishing");
            *self.0 = RunState::Aborted;
        }
    }
}

/// Run one due action through its snapshot/execute/snapshot/validate cycle.
async fn run_action<P>(
    provider: &mut P,
    actor: &Actor<P::Snapshot>,
    scheduled: &ScheduledAction<P::Snapshot>,
    iteration: Iteration,
    prng: &mut Prng,
    timeout: Option<Duration>,
) -> IterationRecord
where
    P: SnapshotProvider,
{
    let action = scheduled.action.as_ref();
    let name = action.name();
    let actor_id = actor.id();

    let before = provider.snapshot().await;

    let executed = {
        let mut ctx = RunContext::new(iteration, actor_id, name, prng);
        bounded(timeout, action.execute_erased(&mut ctx, actor, &before))
            .await
            .unwrap_or_else(|limit| Err(ExecutionError::TimedOut(limit)))
    };
    let output = match executed {
        Ok(output) => output,
        Err(e) => {
            warn!(error = %e, "Action execution failed");
            return IterationRecord::error(iteration, actor_id.clone(), name, e.to_string());
        }
    };

    let after = provider.snapshot().await;

    let verdict = {
        let mut ctx = RunContext::new(iteration, actor_id, name, prng);
        bounded(
            timeout,
            action.validate_erased(&mut ctx, actor, &before, &after, &output),
        )
        .await
        .unwrap_or_else(|limit| Err(ValidationError::TimedOut(limit)))
    };

    match verdict {
        Ok(true) => {
            debug!("Post-condition held");
            IterationRecord::pass(iteration, actor_id.clone(), name)
        }
        Ok(false) => {
            warn!("Post-condition violated");
            IterationRecord::fail(iteration, actor_id.clone(), name)
        }
        Err(e) => {
            warn!(error = %e, "Validation could not complete");
            IterationRecord::error(iteration, actor_id.clone(), name, e.to_string())
        }
    }
}

/// Await `fut`, bounded by `limit` when one is set. `Err` carries the limit.
async fn bounded<F>(limit: Option<Duration>, fut: F) -> Result<F::Output, Duration>
where
    F: Future,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut).await.map_err(|_| limit),
        None => Ok(fut.await),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flocc_test_helpers::{actor_with, ScriptedAction, SequenceProvider, Step};
    use flocc_types::ActorId;
    use std::sync::Arc;
    use tracing_test::traced_test;

    fn env_with(ids: &[&str]) -> Environment<u64> {
        let action = Arc::new(ScriptedAction::new("Borrow"));
        let mut env = Environment::new();
        for id in ids {
            env.register(actor_with(id, vec![(action.clone(), 1.0)]))
                .unwrap();
        }
        env
    }

    #[test]
    fn test_negative_iterations_rejected() {
        let result = Runner::new(
            env_with(&["a"]),
            SequenceProvider::new(),
            RunOptions::new("s1").with_iterations(-3),
        );
        assert_eq!(
            result.err(),
            Some(ConfigurationError::NegativeIterations(-3))
        );
    }

    #[test]
    fn test_empty_seed_rejected() {
        let result = Runner::new(
            env_with(&["a"]),
            SequenceProvider::new(),
            RunOptions::new("").with_iterations(1),
        );
        assert_eq!(result.err(), Some(ConfigurationError::EmptySeed));
    }

    #[test]
    fn test_unknown_actor_rejected() {
        let result = Runner::new(
            env_with(&["a", "b"]),
            SequenceProvider::new(),
            RunOptions::new("s1").with_only_actors(["b", "ghost"]),
        );
        assert_eq!(
            result.err(),
            Some(ConfigurationError::UnknownActor(ActorId::from("ghost")))
        );
    }

    #[test]
    fn test_only_actors_keep_registration_order() {
        let runner = Runner::new(
            env_with(&["a", "b", "c"]),
            SequenceProvider::new(),
            RunOptions::new("s1").with_only_actors(["c", "a", "c"]),
        )
        .unwrap();
        assert_eq!(runner.participants, vec![0, 2]);
        assert_eq!(runner.state(), RunState::Idle);
    }

    #[test]
    fn test_one_permutation_per_round_when_shuffling() {
        let runner = Runner::new(
            env_with(&["a", "b", "c", "d"]),
            SequenceProvider::new(),
            RunOptions::new("s1").with_shuffle_agents(true),
        )
        .unwrap();
        let mut prng = Prng::new("s1");
        let order = actor_order(&runner.participants, true, &mut prng);
        assert_eq!(prng.draws(), 3);

        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_no_draws_for_order_without_shuffle() {
        let runner = Runner::new(
            env_with(&["a", "b"]),
            SequenceProvider::new(),
            RunOptions::new("s1"),
        )
        .unwrap();
        let mut prng = Prng::new("s1");
        let order = actor_order(&runner.participants, runner.options().shuffle_agents, &mut prng);
        assert_eq!(order, vec![0, 1]);
        assert_eq!(prng.draws(), 0);
    }

    #[test]
    fn test_selection_draws_once_per_pair() {
        let borrow = Arc::new(ScriptedAction::new("Borrow"));
        let repay = Arc::new(ScriptedAction::new("Repay"));
        let mut env = Environment::new();
        env.register(actor_with("a", vec![(borrow.clone(), 0.0), (repay.clone(), 1.0)]))
            .unwrap();
        env.register(actor_with("b", vec![(borrow, 1.0)])).unwrap();

        let runner = Runner::new(env, SequenceProvider::new(), RunOptions::new("s1")).unwrap();
        let mut prng = Prng::new("s1");
        let due = due_actions(runner.environment(), &[0, 1], &mut prng);
        assert_eq!(prng.draws(), 3);
        assert_eq!(due, vec![(0, 1), (1, 0)]);
    }

    #[traced_test]
    #[tokio::test]
    async fn test_run_logs_start_and_finish() {
        let mut runner = Runner::new(
            env_with(&["a"]),
            SequenceProvider::new(),
            RunOptions::new("s1").with_iterations(2),
        )
        .unwrap();
        let report = runner.run().await;

        assert_eq!(report.records().len(), 2);
        assert_eq!(runner.state(), RunState::Completed);
        assert!(logs_contain("Starting simulation run"));
        assert!(logs_contain("Simulation run finished"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_run_leaves_runner_aborted() {
        let action = Arc::new(ScriptedAction::new("Borrow").with_default(Step::HangExecute));
        let mut env = Environment::new();
        env.register(actor_with("a", vec![(action, 1.0)])).unwrap();
        let mut runner = Runner::new(env, SequenceProvider::new(), RunOptions::new("s1")).unwrap();

        let interrupted = tokio::time::timeout(Duration::from_secs(1), runner.run()).await;
        assert!(interrupted.is_err());
        assert_eq!(runner.state(), RunState::Aborted);

        // A later run still starts from scratch.
        let mut runner = Runner::new(
            env_with(&["a"]),
            SequenceProvider::new(),
            RunOptions::new("s1").with_iterations(1),
        )
        .unwrap();
        runner.run().await;
        assert_eq!(runner.state(), RunState::Completed);
    }

    #[tokio::test]
    async fn test_bounded_without_limit_waits() {
        let value = bounded(None, async { 7 }).await;
        assert_eq!(value, Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_reports_limit() {
        let limit = Duration::from_millis(50);
        let result = bounded(Some(limit), tokio::time::sleep(Duration::from_secs(5))).await;
        assert_eq!(result, Err(limit));
    }
}
