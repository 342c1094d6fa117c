//! # Gas Policy
//!
//! How a mutating call picks its gas limit: either the ledger's estimate
//! padded by 10%, or a fixed per-method limit for networks where estimation
//! is known to be unreliable for that call.

use crate::domain::value_objects::U256;
use std::collections::BTreeMap;

/// Padding numerator.
pub const GAS_PADDING_NUMERATOR: u64 = 110;
/// Padding denominator.
pub const GAS_PADDING_DENOMINATOR: u64 = 100;

/// `floor(estimate * NUMERATOR / DENOMINATOR)`, saturating at `U256::MAX`.
///
/// Computed as `q * N + floor(r * N / D)` with `estimate = q * D + r`, so
/// the only product that can overflow is the saturating one.
#[must_use]
pub fn pad_gas_estimate(estimate: U256) -> U256 {
    let numerator = U256::from(GAS_PADDING_NUMERATOR);
    let denominator = U256::from(GAS_PADDING_DENOMINATOR);
    let (q, r) = estimate.div_mod(denominator);
    q.saturating_mul(numerator)
        .saturating_add(r * numerator / denominator)
}

/// Gas limit source for one method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GasPolicy {
    /// Estimate, then pad.
    #[default]
    Estimate,
    /// Submit with this limit and skip estimation.
    Fixed(u64),
}

impl GasPolicy {
    /// Policy for `method` given a network's override table.
    #[must_use]
    pub fn for_method(overrides: &BTreeMap<String, u64>, method: &str) -> Self {
        overrides
            .get(method)
            .map_or(Self::Estimate, |limit| Self::Fixed(*limit))
    }
}
