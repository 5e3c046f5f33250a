//! Flocc Simulator
//!
//! A scenario runner built on top of the simulation engine, with a small
//! in-memory lending ledger as the system under test.
//!
//! # Architecture
//!
//! The simulator builds on `flocc-simulation` to provide:
//!
//! - **Account Management**: deterministic borrower accounts derived from a seed
//! - **Ledger**: a lending pool with liquidity and per-address debt
//! - **Workload**: Borrow and Repay actions that check exact ledger deltas
//! - **Configuration**: TOML scenarios with defaults for every field
//!
//! # Example
//!
//! ```ignore
//! use flocc_simulator::{Simulator, SimulatorConfig, WorkloadConfig};
//!
//! let config = SimulatorConfig::new()
//!     .with_borrowers(10)
//!     .with_workload(WorkloadConfig::borrow_only(0.8));
//!
//! let mut simulator = Simulator::new(&config)?;
//! let report = simulator.run().await;
//! report.print();
//! ```

pub mod accounts;
pub mod config;
mod error;
pub mod ledger;
pub mod runner;
pub mod workload;

pub use accounts::{AccountPool, DemoSigner};
pub use config::{PopulationConfig, RunConfig, RunOverrides, SimulatorConfig, WorkloadConfig};
pub use error::ScenarioError;
pub use ledger::{LedgerError, LedgerSnapshotProvider, LedgerState, LendingLedger};
pub use runner::Simulator;
pub use workload::{BorrowAction, LendingWorkload, RepayAction};
