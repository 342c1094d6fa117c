//! # Basket Facade
//!
//! An `IndexERC721` basket: a single NFT wrapping a set of deposited NFTs,
//! which can itself be fractionalized in a vault.

use crate::domain::abi::INDEX_BASKET;
use crate::domain::services::{normalize_address, parse_token_id};
use crate::domain::value_objects::{Address, Decimal, U256};
use crate::errors::FdkResult;
use crate::ports::outbound::SubmittedTransaction;
use crate::service::capability::Credential;
use crate::service::invoker::{ContractInvoker, GasOverrides};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Client for one basket.
#[derive(Debug, Clone)]
pub struct Basket {
    invoker: ContractInvoker,
}

impl Basket {
    /// Connects to the basket at `address`, which is normalized first.
    pub fn new(credential: Credential, address: &str) -> FdkResult<Self> {
        Ok(Self::from_address(credential, normalize_address(address)?))
    }

    #[must_use]
    pub fn from_address(credential: Credential, address: Address) -> Self {
        Self {
            invoker: ContractInvoker::new(credential, address, &INDEX_BASKET, GasOverrides::default()),
        }
    }

    /// Fixed gas limits for selected methods.
    #[must_use]
    pub fn with_gas_overrides(mut self, overrides: BTreeMap<String, u64>) -> Self {
        self.invoker = self.invoker.with_gas_overrides(Arc::new(overrides));
        self
    }

    pub(crate) fn with_shared_overrides(mut self, overrides: GasOverrides) -> Self {
        self.invoker = self.invoker.with_gas_overrides(overrides);
        self
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.invoker.address()
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.invoker.is_read_only()
    }

    /// Moves an NFT the caller owns into the basket.
    pub async fn deposit_erc721(
        &self,
        token: &str,
        id: impl Into<Decimal>,
    ) -> FdkResult<SubmittedTransaction> {
        let tx = self.invoker.writable("depositERC721")?;
        let token = normalize_address(token)?;
        let id = parse_token_id(&id.into())?;
        tx.send(vec![token.into(), id.into()], U256::zero()).await
    }

    /// Moves a held NFT back to the basket owner.
    pub async fn withdraw_erc721(
        &self,
        token: &str,
        id: impl Into<Decimal>,
    ) -> FdkResult<SubmittedTransaction> {
        let tx = self.invoker.writable("withdrawERC721")?;
        let token = normalize_address(token)?;
        let id = parse_token_id(&id.into())?;
        tx.send(vec![token.into(), id.into()], U256::zero()).await
    }

    /// Withdraws ETH earned by held NFTs.
    pub async fn withdraw_eth(&self) -> FdkResult<SubmittedTransaction> {
        let tx = self.invoker.writable("withdrawETH")?;
        tx.send(vec![], U256::zero()).await
    }

    /// Withdraws the basket's balance of an ERC20 earned by held NFTs.
    pub async fn withdraw_erc20(&self, token: &str) -> FdkResult<SubmittedTransaction> {
        let tx = self.invoker.writable("withdrawERC20")?;
        let token = normalize_address(token)?;
        tx.send(vec![token.into()], U256::zero()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryLedger;
    use crate::domain::abi::Token;
    use crate::errors::{AmountFault, CapabilityError, FdkError, LedgerError, ValidationError};

    const BASKET: &str = "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB";
    const NFT: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";

    #[tokio::test]
    async fn test_deposit_and_withdraw() {
        let ledger = Arc::new(InMemoryLedger::default());
        let basket = Basket::new(Credential::signer(ledger.clone()), BASKET).unwrap();

        basket.deposit_erc721(NFT, 42u64).await.unwrap();
        basket.withdraw_erc721(&NFT.to_ascii_uppercase().replace("0X", "0x"), 42u64).await.unwrap();
        basket.withdraw_eth().await.unwrap();
        basket.withdraw_erc20(NFT).await.unwrap();

        let sent = ledger.sent_transactions();
        let nft: Address = NFT.parse().unwrap();
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[0].call.args, vec![Token::Address(nft), Token::Uint(U256::from(42u8))]);
        assert_eq!(sent[1].call.args, sent[0].call.args);
        assert!(sent[2].call.args.is_empty());
        assert_eq!(sent[3].call.args, vec![Token::Address(nft)]);
        assert!(sent.iter().all(|tx| tx.call.contract.to_string() == BASKET));
    }

    #[tokio::test]
    async fn test_fractional_token_id_rejected() {
        let ledger = Arc::new(InMemoryLedger::default());
        let basket = Basket::new(Credential::signer(ledger.clone()), BASKET).unwrap();

        let err = basket
            .deposit_erc721(NFT, "1.5".parse::<Decimal>().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FdkError::Validation(ValidationError::InvalidAmount {
                reason: AmountFault::TooPrecise,
                ..
            })
        ));
        assert_eq!(ledger.interaction_count(), 0);
    }

    #[tokio::test]
    async fn test_read_only_basket() {
        let ledger = Arc::new(InMemoryLedger::default());
        let basket = Basket::new(Credential::read_only(ledger.clone()), BASKET).unwrap();
        assert!(basket.is_read_only());

        let err = basket.withdraw_eth().await.unwrap_err();
        assert!(matches!(
            err,
            FdkError::Capability(CapabilityError::ReadOnlyViolation { method: "withdrawETH" })
        ));
        assert_eq!(ledger.interaction_count(), 0);
    }

    #[tokio::test]
    async fn test_estimation_failure_is_not_submitted() {
        let ledger = Arc::new(InMemoryLedger::default());
        ledger.fail_estimation(LedgerError::Reverted("not owner".into()));
        let basket = Basket::new(Credential::signer(ledger.clone()), BASKET).unwrap();

        let err = basket.withdraw_eth().await.unwrap_err();
        assert!(matches!(err, FdkError::Estimation { method: "withdrawETH", .. }));
        assert!(ledger.sent_transactions().is_empty());
    }
}
