//! # Capability Gate
//!
//! A facade's mutability is decided once, from the kind of credential it was
//! built with, and never changes afterwards.

use crate::domain::value_objects::Address;
use crate::errors::CapabilityError;
use crate::ports::outbound::{LedgerProvider, LedgerSigner};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// What a facade is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    /// Queries and mutating calls.
    Signer,
    /// Queries only.
    ReadOnly,
}

/// Handle to the ledger client a facade talks through.
#[derive(Clone)]
pub struct Credential {
    provider: Arc<dyn LedgerProvider>,
    signer: Option<Arc<dyn LedgerSigner>>,
}

impl Credential {
    /// A credential that can authorize mutating calls.
    pub fn signer<S: LedgerSigner + 'static>(signer: Arc<S>) -> Self {
        Self {
            provider: signer.clone(),
            signer: Some(signer),
        }
    }

    /// A query-only credential.
    pub fn read_only<P: LedgerProvider + 'static>(provider: Arc<P>) -> Self {
        Self {
            provider,
            signer: None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> CredentialKind {
        if self.signer.is_some() {
            CredentialKind::Signer
        } else {
            CredentialKind::ReadOnly
        }
    }

    /// Sending account, for signer credentials.
    #[must_use]
    pub fn sender(&self) -> Option<Address> {
        self.signer.as_ref().map(|s| s.address())
    }

    pub(crate) fn provider(&self) -> &Arc<dyn LedgerProvider> {
        &self.provider
    }

    pub(crate) fn signer_handle(&self) -> Option<&Arc<dyn LedgerSigner>> {
        self.signer.as_ref()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("kind", &self.kind())
            .field("sender", &self.sender())
            .finish()
    }
}

/// Per-facade read-only/read-write state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityGate {
    read_only: bool,
}

impl CapabilityGate {
    /// Fixes the gate from a credential.
    #[must_use]
    pub fn new(credential: &Credential) -> Self {
        Self {
            read_only: credential.kind() == CredentialKind::ReadOnly,
        }
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Fails if this facade may not perform `method`.
    pub fn ensure_writable(&self, method: &'static str) -> Result<(), CapabilityError> {
        if self.read_only {
            warn!(method, "Mutating call rejected on read-only instance");
            return Err(CapabilityError::ReadOnlyViolation { method });
        }
        Ok(())
    }
}
