//! # Address Book
//!
//! Chain id → named deployment → contract addresses. A built-in table covers
//! the officially supported networks; a replacement can be loaded from JSON
//! and injected at facade construction.
//!
//! ```json
//! {
//!   "networks": [
//!     {
//!       "chain_id": 4,
//!       "name": "rinkeby",
//!       "fee_scale": "milli",
//!       "contracts": { "vault_factory": "0x4585...", "basket_factory": "0xee72..." },
//!       "gas_overrides": { "mint": 250000 }
//!     }
//!   ]
//! }
//! ```

use crate::domain::gas::GasPolicy;
use crate::domain::value_objects::{Address, FeeScale};
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Ethereum mainnet.
pub const MAINNET: u64 = 1;
/// Rinkeby testnet.
pub const RINKEBY: u64 = 4;

/// Mainnet `ERC721VaultFactory`.
pub const MAINNET_VAULT_FACTORY: Address = hex_address("0x85Aa7f78BdB2DE8F3e0c0010d99AD5853fFcfC63");
/// Mainnet `IndexERC721Factory`.
pub const MAINNET_BASKET_FACTORY: Address = hex_address("0xde771104C0C44123d22D39bB716339cD0c3333a1");
/// Mainnet `Settings`.
pub const MAINNET_SETTINGS: Address = hex_address("0x1C0857f8642D704ecB213A752A3f68E51913A779");
/// Rinkeby `ERC721VaultFactory`.
pub const RINKEBY_VAULT_FACTORY: Address = hex_address("0x458556c097251f52ca89cB81316B4113aC734BD1");
/// Rinkeby `IndexERC721Factory`.
pub const RINKEBY_BASKET_FACTORY: Address = hex_address("0xee727b734aC43fc391b67caFd18e5DD4Dc939668");

/// Rinkeby estimates `mint` too low.
const RINKEBY_MINT_GAS: u64 = 250_000;

const fn nibble(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => panic!("invalid hex digit in address constant"),
    }
}

/// Compile-time address literal.
const fn hex_address(s: &str) -> Address {
    let b = s.as_bytes();
    assert!(b.len() == 42, "address constant must be 0x + 40 hex digits");
    let mut out = [0u8; 20];
    let mut i = 0;
    while i < 20 {
        out[i] = (nibble(b[2 + 2 * i]) << 4) | nibble(b[3 + 2 * i]);
        i += 1;
    }
    Address::new(out)
}

// =============================================================================
// CONTRACT ROLES
// =============================================================================

/// Which protocol contract an address book entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractRole {
    VaultFactory,
    Settings,
    VaultTemplate,
    BasketFactory,
}

impl fmt::Display for ContractRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::VaultFactory => "vault_factory",
            Self::Settings => "settings",
            Self::VaultTemplate => "vault_template",
            Self::BasketFactory => "basket_factory",
        };
        f.write_str(s)
    }
}

// =============================================================================
// DEPLOYMENTS
// =============================================================================

/// Everything the SDK knows about one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDeployment {
    /// EIP-155 chain id.
    pub chain_id: u64,
    /// Human name, e.g. `mainnet`.
    pub name: String,
    /// Curator fee convention of this deployment's contracts.
    #[serde(default)]
    pub fee_scale: FeeScale,
    /// Contract addresses by role.
    pub contracts: BTreeMap<ContractRole, Address>,
    /// Fixed gas limits by method name; these methods skip estimation.
    #[serde(default)]
    pub gas_overrides: BTreeMap<String, u64>,
}

impl NetworkDeployment {
    /// Address for a role on this network.
    pub fn address(&self, role: ContractRole) -> Result<Address, ConfigError> {
        self.contracts
            .get(&role)
            .copied()
            .ok_or_else(|| ConfigError::MissingContract {
                network: self.name.clone(),
                role,
            })
    }

    /// Gas policy for a method on this network.
    #[must_use]
    pub fn gas_policy(&self, method: &str) -> GasPolicy {
        GasPolicy::for_method(&self.gas_overrides, method)
    }
}

// =============================================================================
// ADDRESS BOOK
// =============================================================================

/// The full network table. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressBook {
    pub networks: Vec<NetworkDeployment>,
}

impl Default for AddressBook {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AddressBook {
    /// The officially supported deployments.
    #[must_use]
    pub fn builtin() -> Self {
        let mainnet = NetworkDeployment {
            chain_id: MAINNET,
            name: "mainnet".to_owned(),
            fee_scale: FeeScale::Milli,
            contracts: BTreeMap::from([
                (ContractRole::VaultFactory, MAINNET_VAULT_FACTORY),
                (ContractRole::BasketFactory, MAINNET_BASKET_FACTORY),
                (ContractRole::Settings, MAINNET_SETTINGS),
            ]),
            gas_overrides: BTreeMap::new(),
        };
        let rinkeby = NetworkDeployment {
            chain_id: RINKEBY,
            name: "rinkeby".to_owned(),
            fee_scale: FeeScale::Milli,
            contracts: BTreeMap::from([
                (ContractRole::VaultFactory, RINKEBY_VAULT_FACTORY),
                (ContractRole::BasketFactory, RINKEBY_BASKET_FACTORY),
            ]),
            gas_overrides: BTreeMap::from([("mint".to_owned(), RINKEBY_MINT_GAS)]),
        };
        Self {
            networks: vec![mainnet, rinkeby],
        }
    }

    /// Parses and validates a JSON address book.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let book: Self = serde_json::from_str(json)?;
        book.validate()?;
        debug!(networks = book.networks.len(), "Loaded address book");
        Ok(book)
    }

    /// Reads, parses and validates a JSON address book file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut chain_ids = HashSet::new();
        let mut names = HashSet::new();

        for network in &self.networks {
            if !chain_ids.insert(network.chain_id) {
                return Err(ConfigError::DuplicateChainId(network.chain_id));
            }
            if !names.insert(network.name.as_str()) {
                return Err(ConfigError::DuplicateNetworkName(network.name.clone()));
            }
            if let Some((role, _)) = network.contracts.iter().find(|(_, a)| a.is_zero()) {
                return Err(ConfigError::ZeroAddress {
                    network: network.name.clone(),
                    role: *role,
                });
            }
        }

        Ok(())
    }

    /// The deployment for a chain id.
    pub fn deployment(&self, chain_id: u64) -> Result<&NetworkDeployment, ConfigError> {
        self.networks
            .iter()
            .find(|n| n.chain_id == chain_id)
            .ok_or(ConfigError::UnsupportedNetwork { chain_id })
    }

    /// The network name for a chain id.
    pub fn network_name(&self, chain_id: u64) -> Result<&str, ConfigError> {
        self.deployment(chain_id).map(|n| n.name.as_str())
    }

    /// Resolves a role's address on a chain.
    pub fn resolve(&self, chain_id: u64, role: ContractRole) -> Result<Address, ConfigError> {
        let address = self.deployment(chain_id)?.address(role)?;
        debug!(chain_id, %role, %address, "Resolved contract address");
        Ok(address)
    }
}
