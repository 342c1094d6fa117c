//! # Contract Invoker
//!
//! Binds one contract address, its interface table and a credential.
//! Queries are checked and forwarded; mutating calls run the gas protocol:
//!
//! 1. capability gate ([`ContractInvoker::writable`])
//! 2. argument normalization (by the facade, holding the [`Writable`])
//! 3. interface check
//! 4. estimate, padded to 110% (or a fixed per-method override)
//! 5. submit

use crate::domain::abi::{ContractInterface, MethodSpec, Mutability, Token};
use crate::domain::gas::{pad_gas_estimate, GasPolicy};
use crate::domain::value_objects::{Address, U256};
use crate::errors::{CapabilityError, FdkError, FdkResult, InterfaceError};
use crate::ports::outbound::{ContractCall, LedgerSigner, SubmittedTransaction, TransactionRequest};
use crate::service::capability::{CapabilityGate, Credential};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Fixed gas limits by method name.
pub type GasOverrides = Arc<BTreeMap<String, u64>>;

/// One contract as seen through one credential.
#[derive(Debug, Clone)]
pub struct ContractInvoker {
    address: Address,
    interface: &'static ContractInterface,
    credential: Credential,
    gate: CapabilityGate,
    gas_overrides: GasOverrides,
}

impl ContractInvoker {
    pub fn new(
        credential: Credential,
        address: Address,
        interface: &'static ContractInterface,
        gas_overrides: GasOverrides,
    ) -> Self {
        Self {
            address,
            interface,
            gate: CapabilityGate::new(&credential),
            credential,
            gas_overrides,
        }
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.gate.is_read_only()
    }

    /// Same contract and credential, different override table.
    pub(crate) fn with_gas_overrides(mut self, gas_overrides: GasOverrides) -> Self {
        self.gas_overrides = gas_overrides;
        self
    }

    fn describe(&self, spec: &MethodSpec, args: Vec<Token>, value: U256) -> ContractCall {
        ContractCall {
            contract: self.address,
            interface: self.interface.name,
            method: spec.name,
            selector: spec.selector(),
            args,
            value,
        }
    }

    /// Runs a view method and returns its checked outputs.
    #[instrument(skip(self, args), fields(contract = %self.address))]
    pub async fn query(&self, method: &'static str, args: Vec<Token>) -> FdkResult<Vec<Token>> {
        let spec = self.interface.method(method)?;
        if spec.is_mutating() {
            return Err(InterfaceError::MutabilityMismatch {
                method: spec.name,
                mutability: spec.mutability.as_str(),
            }
            .into());
        }
        spec.check_args(&args)?;

        let call = self.describe(spec, args, U256::zero());
        let outputs = self
            .credential
            .provider()
            .call(&call)
            .await
            .map_err(|source| FdkError::Query { method, source })?;
        spec.check_outputs(&outputs)?;
        Ok(outputs)
    }

    async fn query_one(&self, method: &'static str, args: Vec<Token>) -> FdkResult<Token> {
        let mut outputs = self.query(method, args).await?;
        // check_outputs guarantees exactly one value for single-return methods
        outputs.pop().ok_or_else(|| {
            InterfaceError::UnexpectedReturn {
                method,
                expected: "1 value".to_owned(),
                actual: String::new(),
            }
            .into()
        })
    }

    /// Single `uint` return.
    pub async fn query_uint(&self, method: &'static str, args: Vec<Token>) -> FdkResult<U256> {
        let token = self.query_one(method, args).await?;
        token.as_uint().ok_or_else(|| mismatch(method, "uint", &token))
    }

    /// Single `address` return.
    pub async fn query_address(&self, method: &'static str, args: Vec<Token>) -> FdkResult<Address> {
        let token = self.query_one(method, args).await?;
        token.as_address().ok_or_else(|| mismatch(method, "address", &token))
    }

    /// Single `bool` return.
    pub async fn query_bool(&self, method: &'static str, args: Vec<Token>) -> FdkResult<bool> {
        let token = self.query_one(method, args).await?;
        token.as_bool().ok_or_else(|| mismatch(method, "bool", &token))
    }

    /// Passes the capability gate for `method`.
    ///
    /// Mutating calls can only be submitted through the returned handle, so
    /// the gate always runs before any argument normalization or ledger I/O.
    pub fn writable(&self, method: &'static str) -> FdkResult<Writable<'_>> {
        self.gate.ensure_writable(method)?;
        let signer = self
            .credential
            .signer_handle()
            .ok_or(CapabilityError::ReadOnlyViolation { method })?;
        Ok(Writable {
            invoker: self,
            signer,
            method,
        })
    }

    fn gas_policy(&self, method: &str) -> GasPolicy {
        GasPolicy::for_method(&self.gas_overrides, method)
    }
}

fn mismatch(method: &'static str, expected: &str, token: &Token) -> FdkError {
    InterfaceError::UnexpectedReturn {
        method,
        expected: expected.to_owned(),
        actual: format!("{token:?}"),
    }
    .into()
}

/// Permission to submit one mutating method, obtained from
/// [`ContractInvoker::writable`].
pub struct Writable<'a> {
    invoker: &'a ContractInvoker,
    signer: &'a Arc<dyn LedgerSigner>,
    method: &'static str,
}

impl Writable<'_> {
    /// Checks, prices and submits the call.
    ///
    /// If estimation fails nothing is submitted.
    #[instrument(skip_all, fields(contract = %self.invoker.address, method = self.method))]
    pub async fn send(self, args: Vec<Token>, value: U256) -> FdkResult<SubmittedTransaction> {
        let method = self.method;
        let spec = self.invoker.interface.method(method)?;
        if !spec.is_mutating() {
            return Err(InterfaceError::MutabilityMismatch {
                method: spec.name,
                mutability: spec.mutability.as_str(),
            }
            .into());
        }
        if !value.is_zero() && spec.mutability != Mutability::Payable {
            return Err(InterfaceError::NotPayable { method: spec.name }.into());
        }
        spec.check_args(&args)?;

        let call = self.invoker.describe(spec, args, value);

        let gas_limit = match self.invoker.gas_policy(method) {
            GasPolicy::Fixed(limit) => {
                debug!(limit, "Using fixed gas limit");
                U256::from(limit)
            }
            GasPolicy::Estimate => {
                let estimate = self
                    .signer
                    .estimate_gas(&call)
                    .await
                    .map_err(|source| FdkError::Estimation { method, source })?;
                let padded = pad_gas_estimate(estimate);
                debug!(%estimate, %padded, "Padded gas estimate");
                padded
            }
        };

        let submitted = self
            .signer
            .send_transaction(TransactionRequest { call, gas_limit })
            .await
            .map_err(|source| FdkError::Submission { method, source })?;

        debug!(hash = ?submitted.hash, gas_limit = %submitted.gas_limit, "Transaction submitted");
        Ok(submitted)
    }
}
