//! In-memory lending pool used as the system under test.
//!
//! The ledger is deliberately small: a single liquidity figure and a debt per
//! address. Borrowing moves liquidity into debt, repaying moves it back. A
//! fault can be injected so that every Nth borrow books the debt but forgets
//! to draw down liquidity, which the borrow validator is expected to catch.

use async_trait::async_trait;
use flocc_core::SnapshotProvider;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace};

/// Errors returned by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Amount must be positive")]
    ZeroAmount,

    #[error("Insufficient liquidity: requested {requested}, available {available}")]
    InsufficientLiquidity { requested: u64, available: u64 },

    #[error("No outstanding debt for {0}")]
    NoDebt(String),
}

/// Point-in-time ledger contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LedgerState {
    /// Funds available to borrow.
    pub liquidity: u64,

    /// Outstanding debt per address. Addresses with no debt are absent.
    pub debts: BTreeMap<String, u64>,
}

impl LedgerState {
    /// Debt owed by `address`.
    pub fn debt_of(&self, address: &str) -> u64 {
        self.debts.get(address).copied().unwrap_or(0)
    }

    /// Sum of all outstanding debt.
    pub fn total_debt(&self) -> u64 {
        self.debts.values().sum()
    }
}

#[derive(Debug)]
struct Inner {
    state: LedgerState,
    borrows: u64,
    fault_every: u64,
}

/// Shared handle to the lending pool.
#[derive(Debug, Clone)]
pub struct LendingLedger {
    inner: Arc<Mutex<Inner>>,
}

impl LendingLedger {
    /// Create a pool holding `liquidity`.
    pub fn new(liquidity: u64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: LedgerState {
                    liquidity,
                    debts: BTreeMap::new(),
                },
                borrows: 0,
                fault_every: 0,
            })),
        }
    }

    /// Make every `n`th borrow skip the liquidity debit. `0` disables it.
    pub fn with_fault_every(self, n: u64) -> Self {
        self.inner.lock().fault_every = n;
        self
    }

    /// Copy of the current contents.
    pub fn state(&self) -> LedgerState {
        self.inner.lock().state.clone()
    }

    /// Lend `amount` to `address`.
    pub fn borrow(&self, address: &str, amount: u64) -> Result<(), LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }

        let mut inner = self.inner.lock();
        let available = inner.state.liquidity;
        if amount > available {
            return Err(LedgerError::InsufficientLiquidity {
                requested: amount,
                available,
            });
        }

        inner.borrows += 1;
        let faulty = inner.fault_every != 0 && inner.borrows % inner.fault_every == 0;
        if faulty {
            debug!(address, amount, borrow = inner.borrows, "Injecting ledger fault");
        } else {
            inner.state.liquidity -= amount;
        }
        *inner.state.debts.entry(address.to_string()).or_insert(0) += amount;

        trace!(address, amount, "Borrowed");
        Ok(())
    }

    /// Repay up to `amount` of `address`'s debt. Returns the amount repaid.
    pub fn repay(&self, address: &str, amount: u64) -> Result<u64, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }

        let mut inner = self.inner.lock();
        let owed = inner.state.debt_of(address);
        if owed == 0 {
            return Err(LedgerError::NoDebt(address.to_string()));
        }

        let repaid = amount.min(owed);
        if repaid == owed {
            inner.state.debts.remove(address);
        } else {
            inner.state.debts.insert(address.to_string(), owed - repaid);
        }
        inner.state.liquidity += repaid;

        trace!(address, repaid, "Repaid");
        Ok(repaid)
    }
}

/// Snapshot provider cloning the ledger's state.
#[derive(Debug, Clone)]
pub struct LedgerSnapshotProvider {
    ledger: LendingLedger,
}

impl LedgerSnapshotProvider {
    pub fn new(ledger: LendingLedger) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &LendingLedger {
        &self.ledger
    }
}

#[async_trait]
impl SnapshotProvider for LedgerSnapshotProvider {
    type Snapshot = LedgerState;

    async fn snapshot(&mut self) -> LedgerState {
        self.ledger.state()
    }
}
