//! # Factory Facade
//!
//! The protocol entry point for one network: the vault factory, the basket
//! factory, and typed handles to the vaults and baskets they create.

use crate::config::{AddressBook, ContractRole};
use crate::domain::abi::{BASKET_FACTORY, VAULT_FACTORY};
use crate::domain::entities::VaultData;
use crate::domain::services::{construct_vault_data_with_scale, normalize_address};
use crate::domain::value_objects::{Address, Decimal, FeeScale, U256};
use crate::errors::{ConfigError, FdkError, FdkResult, ValidationError};
use crate::ports::outbound::SubmittedTransaction;
use crate::service::basket::Basket;
use crate::service::capability::{CapabilityGate, Credential};
use crate::service::invoker::{ContractInvoker, GasOverrides};
use crate::service::vault::Vault;
use std::sync::Arc;
use tracing::debug;

/// Vault and basket factories of one network.
#[derive(Debug, Clone)]
pub struct Factory {
    chain_id: u64,
    network: Arc<str>,
    fee_scale: FeeScale,
    gas_overrides: GasOverrides,
    gate: CapabilityGate,
    vault_factory: ContractInvoker,
    basket_factory: Option<ContractInvoker>,
}

impl Factory {
    /// Connects to the built-in deployment for `chain_id`.
    pub fn new(credential: Credential, chain_id: u64) -> FdkResult<Self> {
        Self::with_address_book(credential, chain_id, &AddressBook::builtin())
    }

    /// Connects using an injected address book.
    ///
    /// Fails if the book does not validate, the network is unknown, or it
    /// has no vault factory. The basket factory is optional; basket methods
    /// fail if it is not configured.
    pub fn with_address_book(
        credential: Credential,
        chain_id: u64,
        book: &AddressBook,
    ) -> FdkResult<Self> {
        book.validate()?;
        let deployment = book.deployment(chain_id)?;
        let vault_factory = deployment.address(ContractRole::VaultFactory)?;
        let basket_factory = deployment.contracts.get(&ContractRole::BasketFactory).copied();
        let gas_overrides: GasOverrides = Arc::new(deployment.gas_overrides.clone());

        debug!(
            chain_id,
            network = %deployment.name,
            %vault_factory,
            basket_factory = ?basket_factory,
            read_only = credential.sender().is_none(),
            "Connected factory"
        );

        Ok(Self {
            chain_id,
            network: Arc::from(deployment.name.as_str()),
            fee_scale: deployment.fee_scale,
            gate: CapabilityGate::new(&credential),
            basket_factory: basket_factory.map(|address| {
                ContractInvoker::new(credential.clone(), address, &BASKET_FACTORY, gas_overrides.clone())
            }),
            vault_factory: ContractInvoker::new(credential, vault_factory, &VAULT_FACTORY, gas_overrides.clone()),
            gas_overrides,
        })
    }

    #[must_use]
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Network name, e.g. `mainnet`.
    #[must_use]
    pub fn network(&self) -> &str {
        &self.network
    }

    /// Fee convention of this network's vaults.
    #[must_use]
    pub fn fee_scale(&self) -> FeeScale {
        self.fee_scale
    }

    #[must_use]
    pub fn vault_factory_address(&self) -> Address {
        self.vault_factory.address()
    }

    pub fn basket_factory_address(&self) -> FdkResult<Address> {
        self.basket_factory().map(ContractInvoker::address)
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.gate.is_read_only()
    }

    fn basket_factory(&self) -> FdkResult<&ContractInvoker> {
        self.basket_factory.as_ref().ok_or_else(|| {
            ConfigError::MissingContract {
                network: self.network.to_string(),
                role: ContractRole::BasketFactory,
            }
            .into()
        })
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Number of vaults created by the factory.
    pub async fn vault_count(&self) -> FdkResult<U256> {
        self.vault_factory.query_uint("vaultCount", vec![]).await
    }

    /// Address of vault number `index`; the zero address if there is none.
    pub async fn vault_address(&self, index: u64) -> FdkResult<Address> {
        self.vault_factory
            .query_address("vaults", vec![U256::from(index).into()])
            .await
    }

    /// Governance settings contract used by new vaults.
    pub async fn vault_settings(&self) -> FdkResult<Address> {
        self.vault_factory.query_address("settings", vec![]).await
    }

    /// Implementation contract vaults are cloned from.
    pub async fn vault_template(&self) -> FdkResult<Address> {
        self.vault_factory.query_address("logic", vec![]).await
    }

    /// Address of basket number `index`.
    pub async fn basket_address(&self, index: u64) -> FdkResult<Address> {
        self.basket_factory()?
            .query_address("baskets", vec![U256::from(index).into()])
            .await
    }

    // =========================================================================
    // MUTATING CALLS
    // =========================================================================

    /// Fractionalizes an NFT. The caller must have approved the factory.
    pub async fn mint(&self, vault: &VaultData) -> FdkResult<SubmittedTransaction> {
        let tx = self.vault_factory.writable("mint")?;
        if vault.fee_scale() != self.fee_scale {
            return Err(ValidationError::FeeScaleMismatch {
                expected: self.fee_scale,
                actual: vault.fee_scale(),
            }
            .into());
        }
        let args = vec![
            vault.name().into(),
            vault.symbol().into(),
            vault.token().into(),
            vault.id().into(),
            vault.supply().into(),
            vault.list_price().into(),
            vault.fee().value().into(),
        ];
        tx.send(args, U256::zero()).await
    }

    /// Deploys a new empty basket owned by the caller.
    pub async fn create_basket(&self) -> FdkResult<SubmittedTransaction> {
        self.gate.ensure_writable("createBasket")?;
        let tx = self.basket_factory()?.writable("createBasket")?;
        tx.send(vec![], U256::zero()).await
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    /// Builds [`VaultData`] at this network's fee scale.
    #[allow(clippy::too_many_arguments)]
    pub fn vault_data(
        &self,
        name: &str,
        symbol: &str,
        token: &str,
        id: impl Into<Decimal>,
        supply: impl Into<Decimal>,
        list_price: impl Into<Decimal>,
        fee: impl Into<Decimal>,
    ) -> Result<VaultData, ValidationError> {
        construct_vault_data_with_scale(self.fee_scale, name, symbol, token, id, supply, list_price, fee)
    }

    /// A vault on this network, sharing this factory's credential.
    pub fn connect_vault(&self, address: &str) -> FdkResult<Vault> {
        Ok(self.vault(normalize_address(address)?))
    }

    /// A basket on this network, sharing this factory's credential.
    pub fn connect_basket(&self, address: &str) -> FdkResult<Basket> {
        let address = normalize_address(address)?;
        Ok(Basket::from_address(self.vault_factory.credential().clone(), address)
            .with_shared_overrides(self.gas_overrides.clone()))
    }

    /// The vault at `index` in the factory.
    pub async fn vault_at(&self, index: u64) -> FdkResult<Vault> {
        let address = self.vault_address(index).await?;
        if address.is_zero() {
            return Err(FdkError::VaultNotFound { index });
        }
        Ok(self.vault(address))
    }

    fn vault(&self, address: Address) -> Vault {
        Vault::from_address(self.vault_factory.credential().clone(), address)
            .with_fee_scale(self.fee_scale)
            .with_shared_overrides(self.gas_overrides.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryLedger, LedgerInteraction};
    use crate::domain::abi::Token;
    use crate::config::{MAINNET, MAINNET_VAULT_FACTORY, RINKEBY};
    use crate::errors::CapabilityError;

    const NFT: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    fn signer() -> (Arc<InMemoryLedger>, Credential) {
        let ledger = Arc::new(InMemoryLedger::default());
        let credential = Credential::signer(ledger.clone());
        (ledger, credential)
    }

    #[test]
    fn test_unsupported_network() {
        let (_, credential) = signer();
        let err = Factory::new(credential, 2).unwrap_err();
        assert!(matches!(
            err,
            FdkError::Config(ConfigError::UnsupportedNetwork { chain_id: 2 })
        ));
    }

    #[test]
    fn test_resolves_builtin_addresses() {
        let (_, credential) = signer();
        let factory = Factory::new(credential, MAINNET).unwrap();
        assert_eq!(factory.network(), "mainnet");
        assert_eq!(factory.chain_id(), MAINNET);
        assert_eq!(factory.vault_factory_address(), MAINNET_VAULT_FACTORY);
        assert_eq!(
            factory.basket_factory_address().unwrap().to_string(),
            "0xde771104C0C44123d22D39bB716339cD0c3333a1"
        );
        assert!(!factory.is_read_only());
    }

    #[tokio::test]
    async fn test_mint_uses_rinkeby_fixed_gas() {
        let (ledger, credential) = signer();
        let factory = Factory::new(credential, RINKEBY).unwrap();
        let data = factory
            .vault_data("Robot", "ROB", NFT, 1u64, 100u64, "1.5".parse::<Decimal>().unwrap(), "0.1".parse::<Decimal>().unwrap())
            .unwrap();

        let tx = factory.mint(&data).await.unwrap();
        assert_eq!(tx.gas_limit, U256::from(250_000u64));

        let journal = ledger.journal();
        assert_eq!(journal.len(), 1);
        let LedgerInteraction::Send(request) = &journal[0] else {
            panic!("expected a submission");
        };
        assert_eq!(request.call.method, "mint");
        assert_eq!(request.call.args[0], Token::String("Robot".into()));
        assert_eq!(request.call.args[1], Token::String("ROB".into()));
        assert_eq!(request.call.args[6], Token::Uint(U256::from(100u8)));
    }

    #[tokio::test]
    async fn test_mint_rejects_fee_scale_mismatch() {
        let (ledger, credential) = signer();
        let factory = Factory::new(credential, MAINNET).unwrap();
        let data = construct_vault_data_with_scale(
            FeeScale::Ether,
            "Robot",
            "ROB",
            NFT,
            1u64,
            100u64,
            1u64,
            "0.1".parse::<Decimal>().unwrap(),
        )
        .unwrap();

        let err = factory.mint(&data).await.unwrap_err();
        assert!(matches!(
            err,
            FdkError::Validation(ValidationError::FeeScaleMismatch {
                expected: FeeScale::Milli,
                actual: FeeScale::Ether,
            })
        ));
        assert_eq!(ledger.interaction_count(), 0);
    }

    #[tokio::test]
    async fn test_vault_at_zero_address() {
        let (ledger, credential) = signer();
        ledger.respond("vaults", vec![Token::Address(Address::ZERO)]);
        let factory = Factory::new(credential, MAINNET).unwrap();

        let err = factory.vault_at(7).await.unwrap_err();
        assert!(matches!(err, FdkError::VaultNotFound { index: 7 }));
        assert!(!err.is_local());
        assert_eq!(ledger.interaction_count(), 1);
    }

    #[tokio::test]
    async fn test_connected_vault_inherits_network_settings() {
        let (ledger, credential) = signer();
        let vault_address: Address = "0x0bde53dE4A00c0631978aF174287BddB859F468f".parse().unwrap();
        ledger.respond("vaults", vec![Token::Address(vault_address)]);
        let factory = Factory::new(credential, RINKEBY).unwrap();

        let vault = factory.vault_at(0).await.unwrap();
        assert_eq!(vault.address(), vault_address);
        assert_eq!(vault.fee_scale(), FeeScale::Milli);
        assert!(!vault.is_read_only());

        let basket = factory.connect_basket(NFT).unwrap();
        assert_eq!(basket.address().to_string(), NFT);
    }

    #[tokio::test]
    async fn test_read_only_factory() {
        let ledger = Arc::new(InMemoryLedger::default());
        ledger.respond("vaultCount", vec![Token::Uint(U256::from(12u8))]);
        let factory = Factory::new(Credential::read_only(ledger.clone()), MAINNET).unwrap();
        assert!(factory.is_read_only());
        assert_eq!(factory.vault_count().await.unwrap(), U256::from(12u8));

        let err = factory.create_basket().await.unwrap_err();
        assert!(matches!(
            err,
            FdkError::Capability(CapabilityError::ReadOnlyViolation { method: "createBasket" })
        ));
        assert_eq!(ledger.interaction_count(), 1);

        assert!(factory.connect_vault(NFT).unwrap().is_read_only());
    }

    #[tokio::test]
    async fn test_missing_basket_factory() {
        let (_, credential) = signer();
        let mut book = AddressBook::builtin();
        book.networks[0].contracts.remove(&ContractRole::BasketFactory);
        let factory = Factory::with_address_book(credential, MAINNET, &book).unwrap();

        assert!(matches!(
            factory.create_basket().await,
            Err(FdkError::Config(ConfigError::MissingContract {
                role: ContractRole::BasketFactory,
                ..
            }))
        ));
    }

    #[tokio::test]
    async fn test_read_only_without_basket_factory_reports_capability() {
        let ledger = Arc::new(InMemoryLedger::default());
        let mut book = AddressBook::builtin();
        book.networks[0].contracts.remove(&ContractRole::BasketFactory);
        let factory =
            Factory::with_address_book(Credential::read_only(ledger.clone()), MAINNET, &book).unwrap();

        assert!(matches!(
            factory.create_basket().await,
            Err(FdkError::Capability(CapabilityError::ReadOnlyViolation {
                method: "createBasket"
            }))
        ));
        assert_eq!(ledger.interaction_count(), 0);
    }

    #[test]
    fn test_zero_address_in_book_fails_construction() {
        let ledger = Arc::new(InMemoryLedger::default());
        let mut book = AddressBook::builtin();
        book.networks[0]
            .contracts
            .insert(ContractRole::VaultFactory, Address::ZERO);

        let err = Factory::with_address_book(Credential::read_only(ledger.clone()), MAINNET, &book)
            .unwrap_err();
        assert!(matches!(
            err,
            FdkError::Config(ConfigError::ZeroAddress {
                role: ContractRole::VaultFactory,
                ..
            })
        ));

        let mut book = AddressBook::builtin();
        book.networks[0]
            .contracts
            .insert(ContractRole::BasketFactory, Address::ZERO);
        assert!(matches!(
            Factory::with_address_book(Credential::read_only(ledger), MAINNET, &book),
            Err(FdkError::Config(ConfigError::ZeroAddress {
                role: ContractRole::BasketFactory,
                ..
            }))
        ));
    }
}
