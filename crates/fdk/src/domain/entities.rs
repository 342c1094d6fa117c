//! # Domain Entities
//!
//! Validated aggregates built by the normalizer and decoded contract state.

use crate::domain::value_objects::{Address, FeeScale, FixedPointFee, U256};
use crate::errors::FdkError;
use std::fmt;

// =============================================================================
// VAULT DATA
// =============================================================================

/// Arguments to `VaultFactory.mint`, already in on-chain form.
///
/// Only obtainable through
/// [`construct_vault_data`](crate::domain::services::construct_vault_data)
/// or [`Factory::vault_data`](crate::service::Factory::vault_data).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultData {
    name: String,
    symbol: String,
    token: Address,
    id: U256,
    supply: U256,
    list_price: U256,
    fee: FixedPointFee,
}

impl VaultData {
    pub(crate) fn new(
        name: String,
        symbol: String,
        token: Address,
        id: U256,
        supply: U256,
        list_price: U256,
        fee: FixedPointFee,
    ) -> Self {
        Self {
            name,
            symbol,
            token,
            id,
            supply,
            list_price,
            fee,
        }
    }

    /// Name of the fractional ERC20.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Symbol of the fractional ERC20.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The ERC721 contract holding the NFT.
    #[must_use]
    pub fn token(&self) -> Address {
        self.token
    }

    /// Token id, 0 decimals.
    #[must_use]
    pub fn id(&self) -> U256 {
        self.id
    }

    /// Fractional supply, 18 decimals.
    #[must_use]
    pub fn supply(&self) -> U256 {
        self.supply
    }

    /// Initial reserve price in wei.
    #[must_use]
    pub fn list_price(&self) -> U256 {
        self.list_price
    }

    /// Scaled curator fee.
    #[must_use]
    pub fn fee(&self) -> FixedPointFee {
        self.fee
    }

    /// Fee convention this data was encoded with.
    #[must_use]
    pub fn fee_scale(&self) -> FeeScale {
        self.fee.scale()
    }
}

// =============================================================================
// AUCTION STATE
// =============================================================================

/// `TokenVault.auctionState()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuctionState {
    Inactive,
    Live,
    Ended,
    Redeemed,
}

impl AuctionState {
    /// Decodes the contract's enum ordinal.
    pub fn from_u256(raw: U256) -> Result<Self, FdkError> {
        if raw > U256::from(u64::MAX) {
            return Err(FdkError::UnknownAuctionState(u64::MAX));
        }
        match raw.low_u64() {
            0 => Ok(Self::Inactive),
            1 => Ok(Self::Live),
            2 => Ok(Self::Ended),
            3 => Ok(Self::Redeemed),
            other => Err(FdkError::UnknownAuctionState(other)),
        }
    }

    /// An auction has started and not been settled.
    #[must_use]
    pub fn is_live(self) -> bool {
        self == Self::Live
    }
}

impl fmt::Display for AuctionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Inactive => "inactive",
            Self::Live => "live",
            Self::Ended => "ended",
            Self::Redeemed => "redeemed",
        };
        f.write_str(s)
    }
}
