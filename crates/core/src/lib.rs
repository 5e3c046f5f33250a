//! Core abstractions for the Flocc simulation engine.
//!
//! - [`Prng`]: the single deterministic random source of a run
//! - [`Action`]: a unit of work with a side-effecting `execute` and a
//!   read-only `validate`, each with its own typed output
//! - [`Actor`]: a participant holding an account and a weighted action list
//! - [`SnapshotProvider`]: captures the state of the system under test
//! - [`RunContext`]: what an action sees of the run while it executes
//!
//! Orchestration lives in `flocc-simulation`; this crate performs no
//! scheduling of its own.

mod action;
mod actor;
mod context;
mod error;
mod prng;
mod traits;

pub use action::{ActionOutput, DynAction};
pub use actor::{Actor, ActorBuilder, ScheduledAction};
pub use context::RunContext;
pub use error::{ConfigurationError, ExecutionError, ValidationError};
pub use prng::{Prng, Seed};
pub use traits::{Action, SnapshotProvider};

pub use flocc_types::{
    Account, AccountKind, ActorId, Credential, Iteration, IterationRecord, Outcome,
};
