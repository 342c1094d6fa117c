//! # Domain Invariants
//!
//! Bounds the contracts enforce on-chain, checked locally before any call
//! leaves the process.

use crate::domain::value_objects::Decimal;

/// Protocol bounds.
pub mod limits {
    /// Lowest curator fee, in decimal terms.
    pub const MIN_CURATOR_FEE: &str = "0";
    /// Highest curator fee, in decimal terms (10%).
    pub const MAX_CURATOR_FEE: &str = "0.1";
    /// Decimals used for token supply and ETH-denominated prices.
    pub const ETHER_DECIMALS: u8 = 18;
    /// Decimals used for ERC721 token ids.
    pub const TOKEN_ID_DECIMALS: u8 = 0;
    /// Seconds in Solidity's `1 days`.
    pub const SECONDS_PER_DAY: u64 = 86_400;
}

/// Curator fee must lie in `[0, 0.1]`.
///
/// Compared on the exact decimal digits, so values like `0.1000001` are
/// rejected regardless of the scale they would later be encoded at.
#[must_use]
pub fn check_curator_fee_invariant(fee: &Decimal) -> bool {
    if fee.is_negative() || fee.integer_digits() != "0" {
        return false;
    }
    // 0.d1d2... <= 0.1  iff  d1 == 0, or d1 == 1 with nothing after it
    match fee.fraction_digits().as_bytes() {
        [] | [b'0', ..] | [b'1'] => true,
        _ => false,
    }
}
