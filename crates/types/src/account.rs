//! Host-supplied accounts.
//!
//! The engine never constructs accounts on its own; it only carries them
//! alongside the actor they belong to so actions can act on their behalf.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// What kind of principal an account address refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    /// Externally owned, controlled by a signing key.
    Key,
    /// A deployed contract acting as a participant.
    Contract,
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountKind::Key => f.write_str("key"),
            AccountKind::Contract => f.write_str("contract"),
        }
    }
}

/// Opaque credential handed in by the host (a signer, a key handle, ...).
///
/// Cloning shares the same underlying value. The credential is never
/// printed; `Debug` is redacted.
#[derive(Clone)]
pub struct Credential(Arc<dyn Any + Send + Sync>);

impl Credential {
    /// Wrap a host credential.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// A credential carrying nothing, for hosts that do not sign.
    pub fn none() -> Self {
        Self::new(())
    }

    /// Borrow the credential as its concrete type, if it is one.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// A participant's account on the system under test.
#[derive(Debug, Clone)]
pub struct Account {
    /// Address on the system under test.
    pub address: String,

    /// Key-controlled or contract account.
    pub kind: AccountKind,

    /// Credential used by actions to authorise calls.
    pub credential: Credential,
}

impl Account {
    /// Create a key-controlled account.
    pub fn key(address: impl Into<String>, credential: Credential) -> Self {
        Self {
            address: address.into(),
            kind: AccountKind::Key,
            credential,
        }
    }

    /// Create a contract account.
    pub fn contract(address: impl Into<String>, credential: Credential) -> Self {
        Self {
            address: address.into(),
            kind: AccountKind::Contract,
            credential,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Signer(u32);

    #[test]
    fn test_credential_downcast() {
        let credential = Credential::new(Signer(7));
        assert_eq!(credential.downcast_ref::<Signer>(), Some(&Signer(7)));
        assert!(credential.downcast_ref::<String>().is_none());
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let account = Account::key("0xabc", Credential::new(String::from("secret-key")));
        let rendered = format!("{:?}", account);
        assert!(rendered.contains("0xabc"));
        assert!(!rendered.contains("secret-key"));
    }
}
