//! # Driven Ports (SPI - Outbound)
//!
//! The ledger client the facades delegate to. Transport, signing and ABI
//! encoding all live behind these traits; the SDK only describes calls.
//!
//! - [`LedgerProvider`] answers read-only queries.
//! - [`LedgerSigner`] additionally estimates gas and submits transactions.

use crate::domain::abi::Token;
use crate::domain::value_objects::{Address, TxHash, U256};
use crate::errors::LedgerError;
use async_trait::async_trait;

// =============================================================================
// CALL DESCRIPTIONS
// =============================================================================

/// A fully described contract call, already checked against its interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    /// Target contract.
    pub contract: Address,
    /// Interface name, e.g. `TokenVault`.
    pub interface: &'static str,
    /// Method name, e.g. `bid`.
    pub method: &'static str,
    /// 4-byte selector of the method signature.
    pub selector: [u8; 4],
    /// Arguments in declaration order.
    pub args: Vec<Token>,
    /// Wei attached to the call (payable methods only).
    pub value: U256,
}

/// A call plus the gas limit it is submitted with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub call: ContractCall,
    pub gas_limit: U256,
}

/// What the ledger client returns once a transaction is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmittedTransaction {
    /// Transaction hash.
    pub hash: TxHash,
    /// Gas limit the transaction was submitted with.
    pub gas_limit: U256,
}

// =============================================================================
// LEDGER CLIENT
// =============================================================================

/// Read-only ledger access.
#[async_trait]
pub trait LedgerProvider: Send + Sync {
    /// Executes a view call and returns its decoded outputs.
    async fn call(&self, call: &ContractCall) -> Result<Vec<Token>, LedgerError>;
}

/// Ledger access that can authorize state changes.
#[async_trait]
pub trait LedgerSigner: LedgerProvider {
    /// The account transactions are sent from.
    fn address(&self) -> Address;

    /// Estimates the gas a call would consume. Fails if the call would revert.
    async fn estimate_gas(&self, call: &ContractCall) -> Result<U256, LedgerError>;

    /// Signs and submits a transaction.
    async fn send_transaction(
        &self,
        request: TransactionRequest,
    ) -> Result<SubmittedTransaction, LedgerError>;
}
