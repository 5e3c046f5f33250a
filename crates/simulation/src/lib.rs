//! Deterministic simulation runner.
//!
//! This crate drives weighted, seed-driven sequences of actions against a
//! system under test and checks a post-condition after every one. Given the
//! same seed and the same actor configuration, it produces identical
//! records every run.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                       Runner                            │
//! │                                                         │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │  Environment: actors in registration order         │ │
//! │  │  (optionally permuted once per round by the Prng)  │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │ one weighted draw per       │
//! │                           ▼ (actor, action) pair        │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │  Due actions, in traversal order:                  │ │
//! │  │  snapshot → execute → snapshot → validate          │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │  RunReport: Pass / Fail / Error per due action     │ │
//! │  └────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! let mut env = Environment::new();
//! env.register(
//!     Actor::builder("borrower-0", "Borrower", account)
//!         .with_action(borrow.clone(), 0.8)
//!         .build()?,
//! )?;
//!
//! let options = RunOptions::new("test-seed").with_iterations(10);
//! let mut runner = Runner::new(env, LedgerSnapshotProvider::new(ledger), options)?;
//! let report = runner.run().await;
//! assert_eq!(report.status(), RunStatus::Completed);
//! ```

mod environment;
mod options;
mod report;
mod runner;

pub use environment::Environment;
pub use options::RunOptions;
pub use report::{AbortReason, RunReport, RunStatus, RunSummary};
pub use runner::{RunState, Runner};
