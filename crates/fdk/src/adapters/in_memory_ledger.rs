//! # In-Memory Ledger
//!
//! Scripted ledger client for tests. Answers view calls from a response
//! table, returns a configurable gas estimate, and records every interaction
//! in a journal so tests can assert ordering and the absence of calls.

use crate::domain::abi::Token;
use crate::domain::services::keccak256;
use crate::domain::value_objects::{Address, TxHash, U256};
use crate::errors::LedgerError;
use crate::ports::outbound::{
    ContractCall, LedgerProvider, LedgerSigner, SubmittedTransaction, TransactionRequest,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Estimate returned when none has been configured.
pub const DEFAULT_GAS_ESTIMATE: u64 = 100_000;

/// One observed interaction with the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerInteraction {
    Call(ContractCall),
    Estimate(ContractCall),
    Send(TransactionRequest),
}

impl LedgerInteraction {
    /// Method name of the underlying call.
    #[must_use]
    pub fn method(&self) -> &'static str {
        match self {
            Self::Call(call) | Self::Estimate(call) => call.method,
            Self::Send(request) => request.call.method,
        }
    }
}

#[derive(Debug, Default)]
struct Script {
    /// Responses keyed by (contract, method); `None` contract matches any.
    responses: HashMap<(Option<Address>, &'static str), Vec<Token>>,
    estimates: HashMap<&'static str, U256>,
    call_failure: Option<LedgerError>,
    estimate_failure: Option<LedgerError>,
    submission_failure: Option<LedgerError>,
}

/// In-memory ledger for testing.
#[derive(Debug)]
pub struct InMemoryLedger {
    sender: Address,
    script: Mutex<Script>,
    journal: Mutex<Vec<LedgerInteraction>>,
    sent: Mutex<u64>,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new(Address::new([0x11; 20]))
    }
}

impl InMemoryLedger {
    /// Create a ledger that signs as `sender`.
    #[must_use]
    pub fn new(sender: Address) -> Self {
        Self {
            sender,
            script: Mutex::new(Script::default()),
            journal: Mutex::new(Vec::new()),
            sent: Mutex::new(0),
        }
    }

    /// Answer `method` on any contract with `outputs`.
    pub fn respond(&self, method: &'static str, outputs: Vec<Token>) {
        self.script.lock().responses.insert((None, method), outputs);
    }

    /// Answer `method` on one contract with `outputs`.
    pub fn respond_at(&self, contract: Address, method: &'static str, outputs: Vec<Token>) {
        self.script
            .lock()
            .responses
            .insert((Some(contract), method), outputs);
    }

    /// Gas estimate returned for `method`.
    pub fn set_gas_estimate(&self, method: &'static str, gas: U256) {
        self.script.lock().estimates.insert(method, gas);
    }

    /// Every view call fails with `error`.
    pub fn fail_calls(&self, error: LedgerError) {
        self.script.lock().call_failure = Some(error);
    }

    /// Every estimate fails with `error`.
    pub fn fail_estimation(&self, error: LedgerError) {
        self.script.lock().estimate_failure = Some(error);
    }

    /// Every submission fails with `error`.
    pub fn fail_submission(&self, error: LedgerError) {
        self.script.lock().submission_failure = Some(error);
    }

    /// Snapshot of all interactions so far.
    #[must_use]
    pub fn journal(&self) -> Vec<LedgerInteraction> {
        self.journal.lock().clone()
    }

    /// Number of interactions so far.
    #[must_use]
    pub fn interaction_count(&self) -> usize {
        self.journal.lock().len()
    }

    /// Transactions submitted so far, in order.
    #[must_use]
    pub fn sent_transactions(&self) -> Vec<TransactionRequest> {
        self.journal
            .lock()
            .iter()
            .filter_map(|i| match i {
                LedgerInteraction::Send(request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, interaction: LedgerInteraction) {
        self.journal.lock().push(interaction);
    }

    fn next_hash(&self) -> TxHash {
        let mut sent = self.sent.lock();
        *sent += 1;
        TxHash::from(keccak256(&sent.to_be_bytes()))
    }
}

#[async_trait]
impl LedgerProvider for InMemoryLedger {
    async fn call(&self, call: &ContractCall) -> Result<Vec<Token>, LedgerError> {
        self.record(LedgerInteraction::Call(call.clone()));

        let script = self.script.lock();
        if let Some(error) = &script.call_failure {
            return Err(error.clone());
        }
        script
            .responses
            .get(&(Some(call.contract), call.method))
            .or_else(|| script.responses.get(&(None, call.method)))
            .cloned()
            .ok_or_else(|| LedgerError::Reverted(format!("no scripted response for {}", call.method)))
    }
}

#[async_trait]
impl LedgerSigner for InMemoryLedger {
    fn address(&self) -> Address {
        self.sender
    }

    async fn estimate_gas(&self, call: &ContractCall) -> Result<U256, LedgerError> {
        self.record(LedgerInteraction::Estimate(call.clone()));

        let script = self.script.lock();
        if let Some(error) = &script.estimate_failure {
            return Err(error.clone());
        }
        Ok(script
            .estimates
            .get(call.method)
            .copied()
            .unwrap_or_else(|| U256::from(DEFAULT_GAS_ESTIMATE)))
    }

    async fn send_transaction(
        &self,
        request: TransactionRequest,
    ) -> Result<SubmittedTransaction, LedgerError> {
        let gas_limit = request.gas_limit;
        self.record(LedgerInteraction::Send(request));

        if let Some(error) = &self.script.lock().submission_failure {
            return Err(error.clone());
        }
        Ok(SubmittedTransaction {
            hash: self.next_hash(),
            gas_limit,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn call(method: &'static str) -> ContractCall {
        ContractCall {
            contract: Address::new([0xaa; 20]),
            interface: "TokenVault",
            method,
            selector: [0; 4],
            args: vec![],
            value: U256::zero(),
        }
    }

    #[tokio::test]
    async fn test_scripted_responses() {
        let ledger = InMemoryLedger::default();
        ledger.respond("fee", vec![Token::Uint(U256::from(25u8))]);
        ledger.respond_at(Address::new([0xaa; 20]), "fee", vec![Token::Uint(U256::from(50u8))]);

        let out = ledger.call(&call("fee")).await.unwrap();
        assert_eq!(out, vec![Token::Uint(U256::from(50u8))]);

        let mut other = call("fee");
        other.contract = Address::new([0xbb; 20]);
        assert_eq!(ledger.call(&other).await.unwrap(), vec![Token::Uint(U256::from(25u8))]);

        assert!(matches!(
            ledger.call(&call("curator")).await,
            Err(LedgerError::Reverted(_))
        ));
        assert_eq!(ledger.interaction_count(), 3);
    }

    #[tokio::test]
    async fn test_estimates_and_sends_are_journaled() {
        let ledger = InMemoryLedger::default();
        ledger.set_gas_estimate("bid", U256::from(42_000u64));

        assert_eq!(ledger.estimate_gas(&call("bid")).await.unwrap(), U256::from(42_000u64));
        assert_eq!(
            ledger.estimate_gas(&call("end")).await.unwrap(),
            U256::from(DEFAULT_GAS_ESTIMATE)
        );

        let first = ledger
            .send_transaction(TransactionRequest {
                call: call("bid"),
                gas_limit: U256::from(46_200u64),
            })
            .await
            .unwrap();
        let second = ledger
            .send_transaction(TransactionRequest {
                call: call("end"),
                gas_limit: U256::from(1u8),
            })
            .await
            .unwrap();
        assert_ne!(first.hash, second.hash);
        assert_eq!(first.gas_limit, U256::from(46_200u64));

        let methods: Vec<_> = ledger.journal().iter().map(LedgerInteraction::method).collect();
        assert_eq!(methods, ["bid", "end", "bid", "end"]);
        assert_eq!(ledger.sent_transactions().len(), 2);
    }

    #[tokio::test]
    async fn test_scripted_failures() {
        let ledger = InMemoryLedger::default();
        ledger.fail_estimation(LedgerError::Reverted("auction live".into()));
        ledger.fail_submission(LedgerError::Rejected("nonce too low".into()));

        assert_eq!(
            ledger.estimate_gas(&call("end")).await,
            Err(LedgerError::Reverted("auction live".into()))
        );
        let request = TransactionRequest {
            call: call("end"),
            gas_limit: U256::one(),
        };
        assert_eq!(
            ledger.send_transaction(request).await,
            Err(LedgerError::Rejected("nonce too low".into()))
        );
    }
}
