//! # Vault Facade
//!
//! Typed access to one `TokenVault`: auction state queries, curator
//! administration, reserve price voting and the buyout auction itself.

use crate::domain::abi::TOKEN_VAULT;
use crate::domain::entities::AuctionState;
use crate::domain::services::{days_to_seconds, normalize_address, normalize_fee, parse_ether};
use crate::domain::value_objects::{Address, Decimal, FeeScale, U256};
use crate::errors::FdkResult;
use crate::ports::outbound::SubmittedTransaction;
use crate::service::capability::Credential;
use crate::service::invoker::{ContractInvoker, GasOverrides};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Client for one `TokenVault` instance.
#[derive(Debug, Clone)]
pub struct Vault {
    invoker: ContractInvoker,
    fee_scale: FeeScale,
}

impl Vault {
    /// Connects to the vault at `address`, which is normalized first.
    pub fn new(credential: Credential, address: &str) -> FdkResult<Self> {
        Ok(Self::from_address(credential, normalize_address(address)?))
    }

    /// Connects to an already-normalized address.
    #[must_use]
    pub fn from_address(credential: Credential, address: Address) -> Self {
        Self {
            invoker: ContractInvoker::new(credential, address, &TOKEN_VAULT, GasOverrides::default()),
            fee_scale: FeeScale::default(),
        }
    }

    /// Fee convention used by [`Vault::update_fee`].
    #[must_use]
    pub fn with_fee_scale(mut self, fee_scale: FeeScale) -> Self {
        self.fee_scale = fee_scale;
        self
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

    #[must_use]
    pub fn fee_scale(&self) -> FeeScale {
        self.fee_scale
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// The fractionalized ERC721 contract.
    pub async fn token_address(&self) -> FdkResult<Address> {
        self.invoker.query_address("token", vec![]).await
    }

    /// The fractionalized token id.
    pub async fn token_id(&self) -> FdkResult<U256> {
        self.invoker.query_uint("id", vec![]).await
    }

    /// Unix time the live auction ends.
    pub async fn auction_end(&self) -> FdkResult<U256> {
        self.invoker.query_uint("auctionEnd", vec![]).await
    }

    /// Auction duration in seconds.
    pub async fn auction_length(&self) -> FdkResult<U256> {
        self.invoker.query_uint("auctionLength", vec![]).await
    }

    /// Token supply currently voting on the reserve price.
    pub async fn reserve_total(&self) -> FdkResult<U256> {
        self.invoker.query_uint("reserveTotal", vec![]).await
    }

    /// Highest bid, in wei.
    pub async fn live_price(&self) -> FdkResult<U256> {
        self.invoker.query_uint("livePrice", vec![]).await
    }

    pub async fn auction_state(&self) -> FdkResult<AuctionState> {
        let raw = self.invoker.query_uint("auctionState", vec![]).await?;
        AuctionState::from_u256(raw)
    }

    /// Governance settings contract.
    pub async fn settings(&self) -> FdkResult<Address> {
        self.invoker.query_address("settings", vec![]).await
    }

    pub async fn curator(&self) -> FdkResult<Address> {
        self.invoker.query_address("curator", vec![]).await
    }

    /// Raw curator fee as stored on-chain.
    pub async fn fee(&self) -> FdkResult<U256> {
        self.invoker.query_uint("fee", vec![]).await
    }

    /// Unix time fees were last claimed.
    pub async fn last_claimed(&self) -> FdkResult<U256> {
        self.invoker.query_uint("lastClaimed", vec![]).await
    }

    /// Whether the vault has been closed by a buyout.
    pub async fn is_closed(&self) -> FdkResult<bool> {
        self.invoker.query_bool("vaultClosed", vec![]).await
    }

    pub async fn voting_tokens(&self) -> FdkResult<U256> {
        self.invoker.query_uint("votingTokens", vec![]).await
    }

    /// Reserve price `user` voted for, in wei.
    pub async fn user_prices(&self, user: &str) -> FdkResult<U256> {
        let user = normalize_address(user)?;
        self.invoker.query_uint("userPrices", vec![user.into()]).await
    }

    /// Weighted average reserve price, in wei.
    pub async fn reserve_price(&self) -> FdkResult<U256> {
        self.invoker.query_uint("reservePrice", vec![]).await
    }

    // =========================================================================
    // MUTATING CALLS
    // =========================================================================

    /// Replaces the curator (governance only).
    pub async fn kick_curator(&self, curator: &str) -> FdkResult<SubmittedTransaction> {
        let tx = self.invoker.writable("kickCurator")?;
        let curator = normalize_address(curator)?;
        tx.send(vec![curator.into()], U256::zero()).await
    }

    /// Clears a user's reserve price vote (governance only).
    pub async fn remove_reserve(&self, user: &str) -> FdkResult<SubmittedTransaction> {
        let tx = self.invoker.writable("removeReserve")?;
        let user = normalize_address(user)?;
        tx.send(vec![user.into()], U256::zero()).await
    }

    /// Hands curatorship to another address (curator only).
    pub async fn update_curator(&self, curator: &str) -> FdkResult<SubmittedTransaction> {
        let tx = self.invoker.writable("updateCurator")?;
        let curator = normalize_address(curator)?;
        tx.send(vec![curator.into()], U256::zero()).await
    }

    /// Sets the auction length, given in whole days.
    pub async fn update_auction_length(&self, days: u64) -> FdkResult<SubmittedTransaction> {
        let tx = self.invoker.writable("updateAuctionLength")?;
        tx.send(vec![days_to_seconds(days).into()], U256::zero()).await
    }

    /// Lowers the curator fee. Bounded to `[0, 0.1]` and scaled at this vault's fee scale.
    pub async fn update_fee(&self, fee: impl Into<Decimal>) -> FdkResult<SubmittedTransaction> {
        let tx = self.invoker.writable("updateFee")?;
        let fee = normalize_fee(&fee.into(), self.fee_scale)?;
        tx.send(vec![fee.value().into()], U256::zero()).await
    }

    /// Mints accrued curator fees.
    pub async fn claim_fees(&self) -> FdkResult<SubmittedTransaction> {
        let tx = self.invoker.writable("claimFees")?;
        tx.send(vec![], U256::zero()).await
    }

    /// Votes a reserve price, in ETH.
    pub async fn update_user_price(&self, price: impl Into<Decimal>) -> FdkResult<SubmittedTransaction> {
        let tx = self.invoker.writable("updateUserPrice")?;
        let price = parse_ether("price", &price.into())?;
        tx.send(vec![price.into()], U256::zero()).await
    }

    /// Starts the buyout auction with an opening bid of `reserve_price` ETH.
    pub async fn start(&self, reserve_price: impl Into<Decimal>) -> FdkResult<SubmittedTransaction> {
        let tx = self.invoker.writable("start")?;
        let value = parse_ether("reserve price", &reserve_price.into())?;
        tx.send(vec![], value).await
    }

    /// Bids `amount` ETH on the live auction.
    pub async fn bid(&self, amount: impl Into<Decimal>) -> FdkResult<SubmittedTransaction> {
        let tx = self.invoker.writable("bid")?;
        let value = parse_ether("bid amount", &amount.into())?;
        tx.send(vec![], value).await
    }

    /// Settles an auction whose end time has passed.
    pub async fn end(&self) -> FdkResult<SubmittedTransaction> {
        let tx = self.invoker.writable("end")?;
        tx.send(vec![], U256::zero()).await
    }

    /// Burns the full supply to withdraw the NFT.
    pub async fn redeem(&self) -> FdkResult<SubmittedTransaction> {
        let tx = self.invoker.writable("redeem")?;
        tx.send(vec![], U256::zero()).await
    }

    /// Burns the caller's tokens for their share of the auction proceeds.
    pub async fn cash(&self) -> FdkResult<SubmittedTransaction> {
        let tx = self.invoker.writable("cash")?;
        tx.send(vec![], U256::zero()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryLedger, LedgerInteraction};
    use crate::domain::abi::Token;
    use crate::errors::{CapabilityError, FdkError, ValidationError};

    const VAULT: &str = "0x0bde53dE4A00c0631978aF174287BddB859F468f";
    const USER: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    fn vault(ledger: &Arc<InMemoryLedger>) -> Vault {
        Vault::new(Credential::signer(ledger.clone()), VAULT).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_queries_forward_unmodified() {
        let ledger = Arc::new(InMemoryLedger::default());
        ledger.respond("reservePrice", vec![Token::Uint(U256::exp10(18))]);
        ledger.respond("auctionState", vec![Token::Uint(U256::one())]);
        ledger.respond("vaultClosed", vec![Token::Bool(false)]);
        ledger.respond("userPrices", vec![Token::Uint(U256::from(7u8))]);
        let vault = vault(&ledger);

        assert_eq!(vault.reserve_price().await.unwrap(), U256::exp10(18));
        assert_eq!(vault.auction_state().await.unwrap(), AuctionState::Live);
        assert!(!vault.is_closed().await.unwrap());
        assert_eq!(
            vault.user_prices(&USER.to_ascii_lowercase()).await.unwrap(),
            U256::from(7u8)
        );

        let journal = ledger.journal();
        let LedgerInteraction::Call(call) = &journal[3] else {
            panic!("expected a view call");
        };
        assert_eq!(call.method, "userPrices");
        assert_eq!(call.args, vec![Token::Address(USER.parse().unwrap())]);
        assert_eq!(call.contract.to_string(), VAULT);
    }

    #[tokio::test]
    async fn test_update_auction_length_in_seconds() {
        let ledger = Arc::new(InMemoryLedger::default());
        vault(&ledger).update_auction_length(3).await.unwrap();

        let sent = ledger.sent_transactions();
        assert_eq!(sent[0].call.method, "updateAuctionLength");
        assert_eq!(sent[0].call.args, vec![Token::Uint(U256::from(259_200u64))]);
    }

    #[tokio::test]
    async fn test_update_fee_uses_vault_scale() {
        let ledger = Arc::new(InMemoryLedger::default());
        vault(&ledger).update_fee(dec("0.05")).await.unwrap();
        vault(&ledger)
            .with_fee_scale(FeeScale::Ether)
            .update_fee(dec("0.05"))
            .await
            .unwrap();

        let sent = ledger.sent_transactions();
        assert_eq!(sent[0].call.args, vec![Token::Uint(U256::from(50u8))]);
        assert_eq!(
            sent[1].call.args,
            vec![Token::Uint(U256::from(5u8) * U256::exp10(16))]
        );
    }

    #[tokio::test]
    async fn test_update_fee_out_of_bounds_never_reaches_ledger() {
        let ledger = Arc::new(InMemoryLedger::default());
        let err = vault(&ledger).update_fee(dec("0.5")).await.unwrap_err();
        assert!(matches!(
            err,
            FdkError::Validation(ValidationError::InvalidCuratorFee { .. })
        ));
        assert_eq!(ledger.interaction_count(), 0);
    }

    #[tokio::test]
    async fn test_payable_calls_attach_value() {
        let ledger = Arc::new(InMemoryLedger::default());
        let vault = vault(&ledger);
        vault.start(dec("1.5")).await.unwrap();
        vault.bid(2u64).await.unwrap();

        let sent = ledger.sent_transactions();
        assert_eq!(sent[0].call.method, "start");
        assert_eq!(sent[0].call.value, U256::from(15u8) * U256::exp10(17));
        assert!(sent[0].call.args.is_empty());
        assert_eq!(sent[1].call.value, U256::from(2u8) * U256::exp10(18));
    }

    #[tokio::test]
    async fn test_curator_calls_normalize_address() {
        let ledger = Arc::new(InMemoryLedger::default());
        let vault = vault(&ledger);
        vault.update_curator(&USER.to_ascii_lowercase()).await.unwrap();

        let err = vault.kick_curator("not-an-address").await.unwrap_err();
        assert!(matches!(
            err,
            FdkError::Validation(ValidationError::InvalidAddress { .. })
        ));

        let sent = ledger.sent_transactions();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].call.args, vec![Token::Address(USER.parse().unwrap())]);
    }

    #[tokio::test]
    async fn test_gate_runs_before_normalization() {
        let ledger = Arc::new(InMemoryLedger::default());
        let vault = Vault::new(Credential::read_only(ledger.clone()), VAULT).unwrap();
        assert!(vault.is_read_only());

        // invalid input on a read-only vault reports the capability error
        let err = vault.kick_curator("not-an-address").await.unwrap_err();
        assert!(matches!(
            err,
            FdkError::Capability(CapabilityError::ReadOnlyViolation { method: "kickCurator" })
        ));
        assert_eq!(ledger.interaction_count(), 0);
    }

    #[tokio::test]
    async fn test_override_applies_per_method() {
        let ledger = Arc::new(InMemoryLedger::default());
        let vault = vault(&ledger).with_gas_overrides(BTreeMap::from([("end".to_owned(), 80_000)]));

        vault.end().await.unwrap();
        vault.redeem().await.unwrap();

        let methods: Vec<_> = ledger.journal().iter().map(LedgerInteraction::method).collect();
        assert_eq!(methods, ["end", "redeem", "redeem"]);
        assert_eq!(ledger.sent_transactions()[0].gas_limit, U256::from(80_000u64));
    }
}
