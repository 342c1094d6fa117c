//! # Error Types
//!
//! One error enum per concern, wrapped by [`FdkError`] at the facade boundary.
//! Callers are expected to match on variants; message text is for humans only.

use crate::config::ContractRole;
use crate::domain::value_objects::FeeScale;
use thiserror::Error;

// =============================================================================
// CONFIGURATION ERRORS
// =============================================================================

/// Errors raised while resolving or loading the address book.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No deployment is configured for this chain id.
    #[error("chainId {chain_id} not officially supported by the Fractional Protocol")]
    UnsupportedNetwork { chain_id: u64 },

    /// The network is known but has no address for the requested role.
    #[error("no {role} contract configured for network {network}")]
    MissingContract { network: String, role: ContractRole },

    /// Two deployments share a chain id.
    #[error("chain id {0} is configured more than once")]
    DuplicateChainId(u64),

    /// Two deployments share a network name.
    #[error("network name {0:?} is configured more than once")]
    DuplicateNetworkName(String),

    /// A configured contract address is the zero address.
    #[error("{role} address for network {network} is the zero address")]
    ZeroAddress { network: String, role: ContractRole },

    /// Reading the configuration file failed.
    #[error("failed to read address book: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration document is malformed.
    #[error("failed to parse address book: {0}")]
    Parse(#[from] serde_json::Error),
}

// =============================================================================
// VALIDATION ERRORS
// =============================================================================

/// Errors from normalizing user-supplied values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Not a 20-byte hex address, or a mixed-case address with a bad checksum.
    #[error("{input} is not a valid address.")]
    InvalidAddress { input: String, reason: AddressFault },

    /// Curator fee outside the protocol bound.
    #[error("{fee} is not a valid curator fee. Must be between {min} and {max}")]
    InvalidCuratorFee {
        fee: String,
        min: &'static str,
        max: &'static str,
    },

    /// Curator fee has more fractional digits than the deployment's scale.
    #[error("curator fee {fee} cannot be represented with {decimals} decimals")]
    FeePrecision { fee: String, decimals: u8 },

    /// Text is not a plain decimal literal.
    #[error("{0:?} is not a valid decimal number")]
    InvalidDecimal(String),

    /// A numeric field cannot be scaled to its on-chain integer form.
    #[error("invalid {field} {value}: {reason}")]
    InvalidAmount {
        field: &'static str,
        value: String,
        reason: AmountFault,
    },

    /// Vault data was encoded for a different fee convention than the target deployment.
    #[error("vault data encodes the fee at {actual} scale but the deployment expects {expected}")]
    FeeScaleMismatch { expected: FeeScale, actual: FeeScale },
}

/// Why an address string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFault {
    /// Not exactly 40 hex digits after the optional prefix.
    BadLength,
    /// Contains a non-hex character.
    BadCharacter,
    /// Mixed case that does not match the EIP-55 checksum.
    BadChecksum,
}

/// Why a decimal could not be scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountFault {
    /// Negative values have no on-chain representation.
    Negative,
    /// More fractional digits than the target scale.
    TooPrecise,
    /// Result does not fit in 256 bits.
    Overflow,
}

impl std::fmt::Display for AmountFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Negative => f.write_str("value must not be negative"),
            Self::TooPrecise => f.write_str("too many decimal places"),
            Self::Overflow => f.write_str("value exceeds 256 bits"),
        }
    }
}

// =============================================================================
// CAPABILITY ERRORS
// =============================================================================

/// Errors from the capability gate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    /// A mutating method was called on a facade holding a read-only credential.
    #[error("read-only instance cannot call {method}: it requires a signer")]
    ReadOnlyViolation { method: &'static str },
}

// =============================================================================
// INTERFACE ERRORS
// =============================================================================

/// A call or a return value that does not match the contract interface table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InterfaceError {
    /// Method is not part of the interface.
    #[error("{interface} has no method {method}")]
    UnknownMethod {
        interface: &'static str,
        method: String,
    },

    /// Arguments do not match the declared inputs.
    #[error("{method} expects ({expected}), got ({actual})")]
    ArgumentMismatch {
        method: &'static str,
        expected: String,
        actual: String,
    },

    /// View method used for a transaction or vice versa.
    #[error("{method} is {mutability} and cannot be used this way")]
    MutabilityMismatch {
        method: &'static str,
        mutability: &'static str,
    },

    /// Value attached to a non-payable method.
    #[error("{method} is not payable")]
    NotPayable { method: &'static str },

    /// The ledger returned something other than the declared outputs.
    #[error("{method} returned ({actual}), expected ({expected})")]
    UnexpectedReturn {
        method: &'static str,
        expected: String,
        actual: String,
    },
}

// =============================================================================
// LEDGER ERRORS
// =============================================================================

/// Errors reported by the ledger client collaborator.
///
/// These are carried verbatim as the source of [`FdkError::Query`],
/// [`FdkError::Estimation`] and [`FdkError::Submission`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Network or RPC failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The call reverted.
    #[error("execution reverted: {0}")]
    Reverted(String),

    /// The node or signer refused the transaction.
    #[error("transaction rejected: {0}")]
    Rejected(String),

    /// Anything else the client reports.
    #[error("ledger error: {0}")]
    Other(String),
}

// =============================================================================
// FACADE ERRORS
// =============================================================================

/// Top-level error returned by the facades.
#[derive(Debug, Error)]
pub enum FdkError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Capability(#[from] CapabilityError),

    #[error(transparent)]
    Interface(#[from] InterfaceError),

    /// A read-only query failed in the ledger client.
    #[error("query {method} failed")]
    Query {
        method: &'static str,
        #[source]
        source: LedgerError,
    },

    /// Gas estimation failed; nothing was submitted.
    #[error("gas estimation for {method} failed")]
    Estimation {
        method: &'static str,
        #[source]
        source: LedgerError,
    },

    /// Submission failed after a gas limit was chosen.
    #[error("submission of {method} failed")]
    Submission {
        method: &'static str,
        #[source]
        source: LedgerError,
    },

    /// The factory has no vault at this index.
    #[error("no vault at index {index}")]
    VaultNotFound { index: u64 },

    /// `auctionState()` returned a value outside the known states.
    #[error("unknown auction state {0}")]
    UnknownAuctionState(u64),
}

impl FdkError {
    /// The underlying ledger error, if the failure came from the ledger client.
    #[must_use]
    pub fn ledger_error(&self) -> Option<&LedgerError> {
        match self {
            Self::Query { source, .. }
            | Self::Estimation { source, .. }
            | Self::Submission { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Returns true if the error was raised before any ledger interaction.
    ///
    /// Failures decoded from a successful call's result are not local.
    #[must_use]
    pub fn is_local(&self) -> bool {
        match self {
            Self::Query { .. }
            | Self::Estimation { .. }
            | Self::Submission { .. }
            | Self::VaultNotFound { .. }
            | Self::UnknownAuctionState(_)
            | Self::Interface(InterfaceError::UnexpectedReturn { .. }) => false,
            Self::Config(_) | Self::Validation(_) | Self::Capability(_) | Self::Interface(_) => true,
        }
    }
}

/// Result alias for facade operations.
pub type FdkResult<T> = Result<T, FdkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_network_message_cites_chain() {
        let err = ConfigError::UnsupportedNetwork { chain_id: 2 };
        assert_eq!(
            err.to_string(),
            "chainId 2 not officially supported by the Fractional Protocol"
        );
    }

    #[test]
    fn test_curator_fee_message_cites_value_and_bound() {
        let err = ValidationError::InvalidCuratorFee {
            fee: "0.2".into(),
            min: "0",
            max: "0.1",
        };
        assert_eq!(
            err.to_string(),
            "0.2 is not a valid curator fee. Must be between 0 and 0.1"
        );
    }

    #[test]
    fn test_ledger_source_is_preserved() {
        let err = FdkError::Estimation {
            method: "mint",
            source: LedgerError::Reverted("paused".into()),
        };
        assert_eq!(
            err.ledger_error(),
            Some(&LedgerError::Reverted("paused".into()))
        );
        assert!(!err.is_local());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_capability_error_is_local() {
        let err: FdkError = CapabilityError::ReadOnlyViolation { method: "bid" }.into();
        assert!(err.is_local());
        assert!(err.to_string().contains("bid"));
    }

    #[test]
    fn test_decoded_result_errors_are_not_local() {
        let returned = FdkError::Interface(InterfaceError::UnexpectedReturn {
            method: "vaultCount",
            expected: "uint256".into(),
            actual: "Bool(true)".into(),
        });
        assert!(!returned.is_local());
        assert!(returned.ledger_error().is_none());
        assert!(!FdkError::VaultNotFound { index: 3 }.is_local());
        assert!(!FdkError::UnknownAuctionState(9).is_local());

        let checked = FdkError::Interface(InterfaceError::NotPayable { method: "end" });
        assert!(checked.is_local());
    }
}
