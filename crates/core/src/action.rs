//! Type erasure for heterogeneous action lists.
//!
//! An actor holds actions with different `Output` types side by side, so
//! the runner works with `dyn DynAction<S>`. Every [`Action`] is a
//! `DynAction` through the blanket impl below; the output travels between
//! the two halves boxed, and only the action that produced it unboxes it.

use crate::{Action, Actor, ExecutionError, RunContext, ValidationError};
use async_trait::async_trait;
use std::any::Any;
use std::fmt;

/// Boxed output of an erased `execute`, consumed by the matching `validate`.
///
/// Only this crate can construct one.
pub struct ActionOutput(Box<dyn Any + Send + Sync>);

impl ActionOutput {
    fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self(Box::new(value))
    }

    fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for ActionOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ActionOutput(..)")
    }
}

/// Object-safe form of [`Action`] used by actors and the runner.
#[async_trait]
pub trait DynAction<S>: Send + Sync
where
    S: Send + Sync + 'static,
{
    /// Unique name of the action.
    fn name(&self) -> &str;

    /// Erased [`Action::execute`].
    async fn execute_erased(
        &self,
        ctx: &mut RunContext<'_>,
        actor: &Actor<S>,
        before: &S,
    ) -> Result<ActionOutput, ExecutionError>;

    /// Erased [`Action::validate`].
    async fn validate_erased(
        &self,
        ctx: &mut RunContext<'_>,
        actor: &Actor<S>,
        before: &S,
        after: &S,
        output: &ActionOutput,
    ) -> Result<bool, ValidationError>;
}

#[async_trait]
impl<S, A> DynAction<S> for A
where
    S: Send + Sync + 'static,
    A: Action<S>,
{
    fn name(&self) -> &str {
        Action::name(self)
    }

    async fn execute_erased(
        &self,
        ctx: &mut RunContext<'_>,
        actor: &Actor<S>,
        before: &S,
    ) -> Result<ActionOutput, ExecutionError> {
        self.execute(ctx, actor, before).await.map(ActionOutput::new)
    }

    async fn validate_erased(
        &self,
        ctx: &mut RunContext<'_>,
        actor: &Actor<S>,
        before: &S,
        after: &S,
        output: &ActionOutput,
    ) -> Result<bool, ValidationError> {
        let output = output
            .downcast_ref::<A::Output>()
            .ok_or_else(|| ValidationError::OutputMismatch(Action::name(self).to_string()))?;
        self.validate(ctx, actor, before, after, output).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActorId, Prng};
    use flocc_types::{Account, Credential, Iteration};
    use std::sync::Arc;

    /// Adds a fixed amount; validates that the counter moved by exactly that.
    struct AddAction(u64);

    #[async_trait]
    impl Action<u64> for AddAction {
        type Output = u64;

        fn name(&self) -> &str {
            "Add"
        }

        async fn execute(
            &self,
            _ctx: &mut RunContext<'_>,
            _actor: &Actor<u64>,
            _before: &u64,
        ) -> Result<u64, ExecutionError> {
            Ok(self.0)
        }

        async fn validate(
            &self,
            _ctx: &mut RunContext<'_>,
            _actor: &Actor<u64>,
            before: &u64,
            after: &u64,
            added: &u64,
        ) -> Result<bool, ValidationError> {
            Ok(before + added == *after)
        }
    }

    /// Same shape but a different output type.
    struct LabelAction;

    #[async_trait]
    impl Action<u64> for LabelAction {
        type Output = String;

        fn name(&self) -> &str {
            "Label"
        }

        async fn execute(
            &self,
            _ctx: &mut RunContext<'_>,
            _actor: &Actor<u64>,
            _before: &u64,
        ) -> Result<String, ExecutionError> {
            Ok("label".to_string())
        }

        async fn validate(
            &self,
            _ctx: &mut RunContext<'_>,
            _actor: &Actor<u64>,
            _before: &u64,
            _after: &u64,
            _output: &String,
        ) -> Result<bool, ValidationError> {
            Ok(true)
        }
    }

    fn actor() -> Actor<u64> {
        Actor::builder("a", "A", Account::key("0x01", Credential::none()))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_output_flows_from_execute_to_validate() {
        let action: Arc<dyn DynAction<u64>> = Arc::new(AddAction(5));
        let actor = actor();
        let mut prng = Prng::new("erased");
        let id = ActorId::from("a");
        let mut ctx = RunContext::new(Iteration::FIRST, &id, "Add", &mut prng);

        let output = action.execute_erased(&mut ctx, &actor, &10).await.unwrap();
        assert!(action
            .validate_erased(&mut ctx, &actor, &10, &15, &output)
            .await
            .unwrap());
        assert!(!action
            .validate_erased(&mut ctx, &actor, &10, &16, &output)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_foreign_output_is_a_validation_error() {
        let add: Arc<dyn DynAction<u64>> = Arc::new(AddAction(1));
        let label: Arc<dyn DynAction<u64>> = Arc::new(LabelAction);
        let actor = actor();
        let mut prng = Prng::new("erased");
        let id = ActorId::from("a");
        let mut ctx = RunContext::new(Iteration::FIRST, &id, "Label", &mut prng);

        let output = label.execute_erased(&mut ctx, &actor, &0).await.unwrap();
        let err = add
            .validate_erased(&mut ctx, &actor, &0, &1, &output)
            .await
            .unwrap_err();
        assert_eq!(err, ValidationError::OutputMismatch("Add".to_string()));
    }
}
