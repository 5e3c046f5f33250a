//! Shared types for the Flocc simulation engine.
//!
//! Everything in this crate is plain data: identifiers for actors and
//! iterations, host-supplied accounts, and the records a run produces.

mod account;
mod identifiers;
mod record;

pub use account::{Account, AccountKind, Credential};
pub use identifiers::{ActorId, Iteration};
pub use record::{IterationRecord, Outcome};
