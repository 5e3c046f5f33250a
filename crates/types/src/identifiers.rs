//! Domain-specific identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Actor identifier.
///
/// Unique within an environment. Display names may repeat across actors,
/// ids may not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub String);

impl ActorId {
    /// Create an actor id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActorId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ActorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Zero-based round index within a run.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Iteration(pub u64);

impl Iteration {
    /// The first round of a run.
    pub const FIRST: Self = Iteration(0);

    /// Get the next iteration.
    pub fn next(self) -> Self {
        Iteration(self.0 + 1)
    }
}

impl fmt::Display for Iteration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Iteration({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iteration_next() {
        assert_eq!(Iteration::FIRST.next(), Iteration(1));
        assert_eq!(Iteration(41).next().0, 42);
    }

    #[test]
    fn test_actor_id_display_is_raw_id() {
        let id = ActorId::from("borrower-3");
        assert_eq!(id.to_string(), "borrower-3");
        assert_eq!(id.as_str(), "borrower-3");
    }
}
