//! Account management for simulations.
//!
//! Provides an `AccountPool` of deterministic borrower accounts. Addresses
//! are derived from a pool seed and the account index, so the same seed
//! always yields the same population.

use flocc_types::{Account, Credential};
use std::fmt;
use tracing::info;

/// Signing material attached to generated accounts.
///
/// The demo ledger never verifies signatures; the secret only exists so
/// actions have a credential to hand to a real client.
#[derive(Clone, PartialEq, Eq)]
pub struct DemoSigner {
    secret: [u8; 32],
}

impl DemoSigner {
    /// Derive a signer from the pool seed and account index.
    pub fn derive(seed: u64, index: u64) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"flocc-signer");
        hasher.update(&seed.to_le_bytes());
        hasher.update(&index.to_le_bytes());
        Self {
            secret: *hasher.finalize().as_bytes(),
        }
    }

    /// Address controlled by this signer: `0x` plus 20 hex-encoded bytes.
    pub fn address(&self) -> String {
        let digest = blake3::hash(&self.secret);
        format!("0x{}", hex::encode(&digest.as_bytes()[..20]))
    }

    /// Deterministic tag over `message`.
    pub fn sign(&self, message: &[u8]) -> [u8; 32] {
        *blake3::keyed_hash(&self.secret, message).as_bytes()
    }
}

impl fmt::Debug for DemoSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DemoSigner").finish_non_exhaustive()
    }
}

/// Pool of generated borrower accounts.
#[derive(Debug, Clone)]
pub struct AccountPool {
    accounts: Vec<Account>,
}

impl AccountPool {
    /// Generate `count` accounts from `seed`.
    pub fn generate(count: usize, seed: u64) -> Self {
        info!(count, seed, "Generating account pool");

        let accounts = (0..count as u64)
            .map(|index| {
                let signer = DemoSigner::derive(seed, index);
                Account::key(signer.address(), Credential::new(signer))
            })
            .collect::<Vec<_>>();

        info!(total_accounts = accounts.len(), "Generated accounts");

        Self { accounts }
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn get(&self, index: usize) -> Option<&Account> {
        self.accounts.get(index)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
