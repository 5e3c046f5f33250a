//! Simulation participants.

use crate::{Action, ConfigurationError, DynAction};
use flocc_types::{Account, ActorId};
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// An action an actor may perform, with its independent per-round firing chance.
pub struct ScheduledAction<S>
where
    S: Send + Sync + 'static,
{
    /// The action. May be shared with other actors.
    pub action: Arc<dyn DynAction<S>>,

    /// Probability in `[0, 1]` that the action is due in a given round.
    pub probability: f64,
}

impl<S> Clone for ScheduledAction<S>
where
    S: Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            action: Arc::clone(&self.action),
            probability: self.probability,
        }
    }
}

impl<S> fmt::Debug for ScheduledAction<S>
where
    S: Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduledAction")
            .field("action", &self.action.name())
            .field("probability", &self.probability)
            .finish()
    }
}

/// A simulation participant.
///
/// Pure identity and data: an id, a display name, the host account it acts
/// through, and its actions in registration order. Immutable once built.
pub struct Actor<S>
where
    S: Send + Sync + 'static,
{
    id: ActorId,
    display_name: String,
    account: Account,
    actions: Vec<ScheduledAction<S>>,
}

impl<S> Actor<S>
where
    S: Send + Sync + 'static,
{
    /// Start building an actor.
    pub fn builder(
        id: impl Into<ActorId>,
        display_name: impl Into<String>,
        account: Account,
    ) -> ActorBuilder<S> {
        ActorBuilder {
            id: id.into(),
            display_name: display_name.into(),
            account,
            actions: Vec::new(),
        }
    }

    /// Unique id.
    pub fn id(&self) -> &ActorId {
        &self.id
    }

    /// Human-readable name; not required to be unique.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Host account the actor acts through.
    pub fn account(&self) -> &Account {
        &self.account
    }

    /// Actions in registration order.
    pub fn actions(&self) -> &[ScheduledAction<S>] {
        &self.actions
    }

    /// Audit log sink tagged with this actor's id.
    pub fn log(&self, message: impl fmt::Display) {
        info!(
            actor = %self.id,
            name = %self.display_name,
            "{}",
            message
        );
    }
}

impl<S> fmt::Debug for Actor<S>
where
    S: Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Actor")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("account", &self.account)
            .field("actions", &self.actions)
            .finish()
    }
}

/// Builder for [`Actor`].
pub struct ActorBuilder<S>
where
    S: Send + Sync + 'static,
{
    id: ActorId,
    display_name: String,
    account: Account,
    actions: Vec<ScheduledAction<S>>,
}

impl<S> ActorBuilder<S>
where
    S: Send + Sync + 'static,
{
    /// Append an action with its firing probability.
    pub fn with_action<A>(self, action: Arc<A>, probability: f64) -> Self
    where
        A: Action<S>,
    {
        self.with_dyn_action(action, probability)
    }

    /// Append an already type-erased action.
    pub fn with_dyn_action(mut self, action: Arc<dyn DynAction<S>>, probability: f64) -> Self {
        self.actions.push(ScheduledAction {
            action,
            probability,
        });
        self
    }

    /// Finish the actor, rejecting probabilities outside `[0, 1]` and
    /// action names that appear more than once.
    pub fn build(self) -> Result<Actor<S>, ConfigurationError> {
        for (i, scheduled) in self.actions.iter().enumerate() {
            let name = scheduled.action.name();
            if self.actions[..i].iter().any(|prior| prior.action.name() == name) {
                return Err(ConfigurationError::DuplicateAction {
                    actor: self.id.clone(),
                    action: name.to_string(),
                });
            }
        }

        if let Some(bad) = self
            .actions
            .iter()
            .find(|scheduled| !(0.0..=1.0).contains(&scheduled.probability))
        {
            return Err(ConfigurationError::InvalidProbability {
                actor: self.id.clone(),
                action: bad.action.name().to_string(),
                probability: bad.probability,
            });
        }

        Ok(Actor {
            id: self.id,
            display_name: self.display_name,
            account: self.account,
            actions: self.actions,
        })
    }
}
