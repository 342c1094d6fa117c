//! # Domain Services
//!
//! Pure normalization functions. Everything a user hands the SDK passes
//! through here before it can become a contract argument.
//!
//! - NO I/O operations
//! - NO async code
//! - Deterministic; the only side effect is the checksum notice logged by
//!   [`normalize_address`]

use crate::domain::entities::VaultData;
use crate::domain::invariants::{check_curator_fee_invariant, limits};
use crate::domain::value_objects::{Address, Decimal, FeeScale, FixedPointFee, U256};
use crate::errors::{AddressFault, AmountFault, ValidationError};
use sha3::{Digest, Keccak256};
use std::fmt;
use tracing::{debug, warn};

// =============================================================================
// HASHING
// =============================================================================

/// Keccak-256 of arbitrary bytes.
#[must_use]
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

// =============================================================================
// ADDRESSES
// =============================================================================

/// EIP-55 checksummed form of an address.
///
/// A hex letter is upper-cased when the matching nibble of
/// `keccak256(lowercase_hex)` is 8 or more.
#[must_use]
pub fn to_checksum(address: &Address) -> String {
    let lower = hex::encode(address.as_bytes());
    let hash = keccak256(lower.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 {
            hash[i / 2] >> 4
        } else {
            hash[i / 2] & 0x0f
        };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Non-fatal notice: the input was a valid address but not in checksummed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotChecksummedWarning {
    /// What the caller passed.
    pub input: String,
    /// What it normalizes to.
    pub checksummed: String,
}

impl fmt::Display for NotChecksummedWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not checksummed.", self.input)
    }
}

/// Outcome of parsing an address string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressCheck {
    /// The parsed address.
    pub address: Address,
    /// Present when the input differed from the checksummed form.
    pub warning: Option<NotChecksummedWarning>,
}

/// Parses an address without logging, reporting the checksum notice to the caller.
///
/// Accepts 40 hex digits with an optional `0x` prefix in any case. Mixed-case
/// input must carry a correct EIP-55 checksum; all-lower or all-upper input is
/// accepted as unchecksummed.
pub fn inspect_address(input: &str) -> Result<AddressCheck, ValidationError> {
    let invalid = |reason| ValidationError::InvalidAddress {
        input: input.to_owned(),
        reason,
    };

    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);

    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid(AddressFault::BadCharacter));
    }
    if digits.len() != 40 {
        return Err(invalid(AddressFault::BadLength));
    }

    let mut bytes = [0u8; 20];
    hex::decode_to_slice(digits, &mut bytes).map_err(|_| invalid(AddressFault::BadCharacter))?;
    let address = Address::new(bytes);
    let checksummed = to_checksum(&address);

    let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper && digits != &checksummed[2..] {
        return Err(invalid(AddressFault::BadChecksum));
    }

    let warning = (input != checksummed).then(|| NotChecksummedWarning {
        input: input.to_owned(),
        checksummed,
    });

    Ok(AddressCheck { address, warning })
}

/// Resolves any accepted address spelling to its canonical value.
///
/// Unchecksummed input still succeeds; the notice is logged at `warn`.
pub fn normalize_address(input: &str) -> Result<Address, ValidationError> {
    let check = inspect_address(input)?;
    if let Some(warning) = &check.warning {
        warn!(
            input = %warning.input,
            checksummed = %warning.checksummed,
            "{warning}"
        );
    }
    Ok(check.address)
}

// =============================================================================
// FIXED-POINT SCALING
// =============================================================================

/// Scales a decimal to an integer with `decimals` implied places.
///
/// Exact: fails rather than rounding when the value has more fractional
/// digits than the target scale.
pub fn parse_units(value: &Decimal, decimals: u8) -> Result<U256, AmountFault> {
    if value.is_negative() {
        return Err(AmountFault::Negative);
    }
    let fraction = value.fraction_digits();
    let decimals = usize::from(decimals);
    if fraction.len() > decimals {
        return Err(AmountFault::TooPrecise);
    }

    let mut digits = String::with_capacity(value.integer_digits().len() + decimals);
    digits.push_str(value.integer_digits());
    digits.push_str(fraction);
    digits.extend(std::iter::repeat('0').take(decimals - fraction.len()));

    U256::from_dec_str(&digits).map_err(|_| AmountFault::Overflow)
}

fn scale_field(field: &'static str, value: &Decimal, decimals: u8) -> Result<U256, ValidationError> {
    parse_units(value, decimals).map_err(|reason| ValidationError::InvalidAmount {
        field,
        value: value.to_string(),
        reason,
    })
}

/// Scales an ETH-denominated amount to wei.
pub fn parse_ether(field: &'static str, value: &Decimal) -> Result<U256, ValidationError> {
    scale_field(field, value, limits::ETHER_DECIMALS)
}

/// Scales a token id; fractional ids are rejected.
pub fn parse_token_id(value: &Decimal) -> Result<U256, ValidationError> {
    scale_field("token id", value, limits::TOKEN_ID_DECIMALS)
}

/// Validates a curator fee against `[0, 0.1]` and scales it.
pub fn normalize_fee(fee: &Decimal, scale: FeeScale) -> Result<FixedPointFee, ValidationError> {
    if !check_curator_fee_invariant(fee) {
        return Err(ValidationError::InvalidCuratorFee {
            fee: fee.to_string(),
            min: limits::MIN_CURATOR_FEE,
            max: limits::MAX_CURATOR_FEE,
        });
    }

    let value = parse_units(fee, scale.decimals()).map_err(|_| ValidationError::FeePrecision {
        fee: fee.to_string(),
        decimals: scale.decimals(),
    })?;

    Ok(FixedPointFee::new(value, scale))
}

/// Converts days to Solidity's `days` unit (seconds).
#[must_use]
pub fn days_to_seconds(days: u64) -> U256 {
    U256::from(days) * U256::from(limits::SECONDS_PER_DAY)
}

// =============================================================================
// VAULT DATA
// =============================================================================

/// Builds [`VaultData`] with the default fee scale.
///
/// See [`construct_vault_data_with_scale`].
pub fn construct_vault_data(
    name: &str,
    symbol: &str,
    token: &str,
    id: impl Into<Decimal>,
    supply: impl Into<Decimal>,
    list_price: impl Into<Decimal>,
    fee: impl Into<Decimal>,
) -> Result<VaultData, ValidationError> {
    construct_vault_data_with_scale(
        FeeScale::default(),
        name,
        symbol,
        token,
        id,
        supply,
        list_price,
        fee,
    )
}

/// Builds [`VaultData`], validating every field.
///
/// Checks run address, then fee, then numeric scaling; the first failure is
/// returned and the rest are skipped.
#[allow(clippy::too_many_arguments)]
pub fn construct_vault_data_with_scale(
    scale: FeeScale,
    name: &str,
    symbol: &str,
    token: &str,
    id: impl Into<Decimal>,
    supply: impl Into<Decimal>,
    list_price: impl Into<Decimal>,
    fee: impl Into<Decimal>,
) -> Result<VaultData, ValidationError> {
    let token = normalize_address(token)?;
    let fee = normalize_fee(&fee.into(), scale)?;
    let id = parse_token_id(&id.into())?;
    let supply = parse_ether("supply", &supply.into())?;
    let list_price = parse_ether("list price", &list_price.into())?;

    debug!(
        name,
        symbol,
        token = %token,
        id = %id,
        fee = %fee.value(),
        scale = %scale,
        "Constructed vault data"
    );

    Ok(VaultData::new(
        name.to_owned(),
        symbol.to_owned(),
        token,
        id,
        supply,
        list_price,
        fee,
    ))
}
