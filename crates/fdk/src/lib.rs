//! # FDK - Fractional Development Kit
//!
//! Typed, capability-gated client for the Fractional protocol contracts:
//! the vault factory, token vaults and NFT baskets.
//!
//! ## Purpose
//!
//! The protocol logic lives on-chain. This crate:
//!
//! - resolves a network to its contract addresses ([`config::AddressBook`])
//! - fixes at construction whether a facade may send transactions
//!   ([`service::CapabilityGate`])
//! - normalizes user input into the exact checksummed and fixed-point forms
//!   the contracts expect ([`domain::services`])
//! - pads gas estimates by 10% before submission ([`domain::gas`])
//!
//! Transport, signing and ABI encoding belong to the ledger client, reached
//! through the [`ports::LedgerProvider`] and [`ports::LedgerSigner`] traits.
//!
//! ## Operation Order
//!
//! | Step | Mutating call | Failure |
//! |------|---------------|---------|
//! | 1 | Capability gate | `ReadOnlyViolation` |
//! | 2 | Argument normalization | `InvalidAddress`, `InvalidCuratorFee`, ... |
//! | 3 | Interface check | `ArgumentMismatch`, `NotPayable` |
//! | 4 | Gas estimate, padded (or fixed override) | `Estimation` |
//! | 5 | Submission | `Submission` |
//!
//! Steps 1 to 3 never touch the ledger.
//!
//! ## Usage Example
//!
//! ```ignore
//! use fdk::prelude::*;
//!
//! let factory = Factory::new(Credential::signer(signer), MAINNET)?;
//! let data = factory.vault_data("Robot", "ROB", nft, 1u64, 100u64, "1.5".parse::<Decimal>()?, "0.1".parse::<Decimal>()?)?;
//! let tx = factory.mint(&data).await?;
//! ```

// Crate-level lints
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Configuration
    pub use crate::config::{AddressBook, ContractRole, NetworkDeployment, MAINNET, RINKEBY};

    // Domain
    pub use crate::domain::abi::Token;
    pub use crate::domain::entities::{AuctionState, VaultData};
    pub use crate::domain::gas::{pad_gas_estimate, GasPolicy};
    pub use crate::domain::services::{
        construct_vault_data, construct_vault_data_with_scale, inspect_address, normalize_address,
        normalize_fee, parse_units, AddressCheck, NotChecksummedWarning,
    };
    pub use crate::domain::value_objects::{Address, Decimal, FeeScale, FixedPointFee, TxHash, U256};

    // Errors
    pub use crate::errors::{
        CapabilityError, ConfigError, FdkError, FdkResult, InterfaceError, LedgerError,
        ValidationError,
    };

    // Ports
    pub use crate::ports::outbound::{
        ContractCall, LedgerProvider, LedgerSigner, SubmittedTransaction, TransactionRequest,
    };

    // Facades
    pub use crate::service::{Basket, Credential, CredentialKind, Factory, Vault};
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
