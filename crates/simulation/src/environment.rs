//! Ordered actor registry.

use flocc_core::{Actor, ConfigurationError};
use flocc_types::{ActorId, Iteration};
use indexmap::IndexMap;
use std::ops::Index;
use tracing::debug;

/// Registry of the actors taking part in a run.
///
/// Actors are kept in registration order, which is the traversal order of
/// every round unless the run shuffles. The environment also carries the
/// run's iteration counter.
pub struct Environment<S>
where
    S: Send + Sync + 'static,
{
    actors: IndexMap<ActorId, Actor<S>>,
    iteration: Iteration,
}

impl<S> Environment<S>
where
    S: Send + Sync + 'static,
{
    /// Create an empty environment.
    pub fn new() -> Self {
        Self {
            actors: IndexMap::new(),
            iteration: Iteration::FIRST,
        }
    }

    /// Register an actor. Ids must be unique.
    pub fn register(&mut self, actor: Actor<S>) -> Result<(), ConfigurationError> {
        if self.actors.contains_key(actor.id()) {
            return Err(ConfigurationError::DuplicateActor(actor.id().clone()));
        }

        debug!(
            actor = %actor.id(),
            name = actor.display_name(),
            actions = actor.actions().len(),
            "Registered actor"
        );
        self.actors.insert(actor.id().clone(), actor);
        Ok(())
    }

    /// Actors in registration order.
    pub fn actors_in_order(&self) -> impl ExactSizeIterator<Item = &Actor<S>> + '_ {
        self.actors.values()
    }

    /// Look up an actor by id.
    pub fn actor(&self, id: &ActorId) -> Option<&Actor<S>> {
        self.actors.get(id)
    }

    /// Registration position of an actor.
    pub fn position(&self, id: &ActorId) -> Option<usize> {
        self.actors.get_index_of(id)
    }

    /// Actor at a registration position.
    pub fn actor_at(&self, index: usize) -> Option<&Actor<S>> {
        self.actors.get_index(index).map(|(_, actor)| actor)
    }

    /// Number of registered actors.
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Whether no actors are registered.
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Current iteration of the run.
    pub fn iteration(&self) -> Iteration {
        self.iteration
    }

    pub(crate) fn reset_iteration(&mut self) {
        self.iteration = Iteration::FIRST;
    }

    pub(crate) fn advance_iteration(&mut self) {
        self.iteration = self.iteration.next();
    }
}

/// Actor at a registration position.
///
/// # Panics
///
/// Panics if `index` is out of bounds.
impl<S> Index<usize> for Environment<S>
where
    S: Send + Sync + 'static,
{
    type Output = Actor<S>;

    fn index(&self, index: usize) -> &Actor<S> {
        &self.actors[index]
    }
}

impl<S> Default for Environment<S>
where
    S: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flocc_test_helpers::{test_account, ScriptedAction};
    use std::sync::Arc;

    fn actor(id: &str) -> Actor<u64> {
        Actor::builder(id, "Borrower", test_account(0))
            .with_action(Arc::new(ScriptedAction::new("Borrow")), 1.0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_registration_order_preserved() {
        let mut env = Environment::new();
        for id in ["c", "a", "b"] {
            env.register(actor(id)).unwrap();
        }

        let ids: Vec<_> = env.actors_in_order().map(|a| a.id().as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert_eq!(env.position(&ActorId::from("a")), Some(1));
        assert_eq!(env.actor_at(2).map(|a| a.id().as_str()), Some("b"));
        assert_eq!(env[0].id().as_str(), "c");
        assert!(env.actor_at(3).is_none());
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_bounds_panics() {
        let mut env = Environment::new();
        env.register(actor("a")).unwrap();
        let _ = &env[1];
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut env = Environment::new();
        env.register(actor("a")).unwrap();
        let err = env.register(actor("a")).unwrap_err();
        assert_eq!(err, ConfigurationError::DuplicateActor(ActorId::from("a")));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn test_iteration_counter() {
        let mut env: Environment<u64> = Environment::new();
        assert_eq!(env.iteration(), Iteration::FIRST);
        env.advance_iteration();
        env.advance_iteration();
        assert_eq!(env.iteration(), Iteration(2));
        env.reset_iteration();
        assert_eq!(env.iteration(), Iteration::FIRST);
    }
}
