//! # Value Objects
//!
//! Immutable domain primitives shared by the normalizer and the facades.
//! Each type here can only hold a valid value; construction is where
//! validation happens.

use crate::domain::services;
use crate::errors::ValidationError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// Re-export U256 from primitive-types for 256-bit arithmetic
pub use primitive_types::{H256 as TxHash, U256};

// =============================================================================
// ADDRESS (20 bytes)
// =============================================================================

/// A 20-byte account or contract address.
///
/// The only textual form this type produces is the EIP-55 checksummed
/// string, so every address the SDK stores or emits is canonical.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address (0x0000...0000).
    pub const ZERO: Self = Self([0u8; 20]);

    /// Creates an address from a 20-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Creates an address from a slice. Returns None if wrong length.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        <[u8; 20]>::try_from(slice).ok().map(Self)
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns true if this is the zero address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// The EIP-55 checksummed `0x`-prefixed form.
    #[must_use]
    pub fn to_checksum(&self) -> String {
        services::to_checksum(self)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl FromStr for Address {
    type Err = ValidationError;

    /// Strict parse: same acceptance rules as [`services::normalize_address`]
    /// but without emitting the checksum notice.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        services::inspect_address(s).map(|check| check.address)
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl From<Address> for [u8; 20] {
    fn from(addr: Address) -> Self {
        addr.0
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Address::from_str(&s).map_err(de::Error::custom)
    }
}

// =============================================================================
// DECIMAL
// =============================================================================

/// An exact decimal literal as supplied by a user.
///
/// Stored as digit strings so no precision is lost before scaling: leading
/// zeros of the integer part and trailing zeros of the fraction are dropped,
/// and negative zero is folded into zero.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Decimal {
    negative: bool,
    integer: String,
    fraction: String,
}

impl Decimal {
    /// Zero.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            negative: false,
            integer: "0".to_owned(),
            fraction: String::new(),
        }
    }

    /// Returns true for values below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Returns true if the value is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.integer == "0" && self.fraction.is_empty()
    }

    /// Integer digits without leading zeros (`"0"` for values below one).
    #[must_use]
    pub fn integer_digits(&self) -> &str {
        &self.integer
    }

    /// Fractional digits without trailing zeros.
    #[must_use]
    pub fn fraction_digits(&self) -> &str {
        &self.fraction
    }

    fn from_parts(negative: bool, integer: &str, fraction: &str) -> Self {
        let integer = integer.trim_start_matches('0');
        let fraction = fraction.trim_end_matches('0');
        let integer = if integer.is_empty() { "0" } else { integer };
        let is_zero = integer == "0" && fraction.is_empty();
        Self {
            negative: negative && !is_zero,
            integer: integer.to_owned(),
            fraction: fraction.to_owned(),
        }
    }
}

impl Default for Decimal {
    fn default() -> Self {
        Self::zero()
    }
}

impl FromStr for Decimal {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidDecimal(s.to_owned());

        let (negative, unsigned) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let (integer, fraction) = match unsigned.split_once('.') {
            Some((integer, fraction)) => (integer, fraction),
            None => (unsigned, ""),
        };

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if integer.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !all_digits(integer) || !all_digits(fraction) {
            return Err(invalid());
        }

        Ok(Self::from_parts(negative, integer, fraction))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        f.write_str(&self.integer)?;
        if !self.fraction.is_empty() {
            write!(f, ".{}", self.fraction)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decimal({self})")
    }
}

impl From<u64> for Decimal {
    fn from(v: u64) -> Self {
        Self::from_parts(false, &v.to_string(), "")
    }
}

impl From<u32> for Decimal {
    fn from(v: u32) -> Self {
        Self::from(u64::from(v))
    }
}

impl From<U256> for Decimal {
    fn from(v: U256) -> Self {
        Self::from_parts(false, &v.to_string(), "")
    }
}

impl TryFrom<f64> for Decimal {
    type Error = ValidationError;

    /// Uses the shortest text that round-trips the float, so `0.1` becomes
    /// exactly `0.1` rather than its binary expansion.
    fn try_from(v: f64) -> Result<Self, Self::Error> {
        if !v.is_finite() {
            return Err(ValidationError::InvalidDecimal(v.to_string()));
        }
        format!("{v}").parse()
    }
}

impl TryFrom<&str> for Decimal {
    type Error = ValidationError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

// =============================================================================
// FEE SCALE
// =============================================================================

/// Fixed-point convention a deployment uses for the curator fee.
///
/// The two conventions are not interchangeable; the address book pins one
/// per network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeScale {
    /// Three decimals: `0.1` is encoded as `100`.
    #[default]
    Milli,
    /// Eighteen decimals: `0.1` is encoded as `10^17`.
    Ether,
}

impl FeeScale {
    /// Number of decimal places.
    #[must_use]
    pub const fn decimals(self) -> u8 {
        match self {
            Self::Milli => 3,
            Self::Ether => 18,
        }
    }
}

impl fmt::Display for FeeScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Milli => write!(f, "milli ({} decimals)", self.decimals()),
            Self::Ether => write!(f, "ether ({} decimals)", self.decimals()),
        }
    }
}

/// A curator fee scaled to its deployment's fixed-point convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPointFee {
    value: U256,
    scale: FeeScale,
}

impl FixedPointFee {
    pub(crate) fn new(value: U256, scale: FeeScale) -> Self {
        Self { value, scale }
    }

    /// The scaled integer sent to the contract.
    #[must_use]
    pub fn value(&self) -> U256 {
        self.value
    }

    /// The convention the value was scaled with.
    #[must_use]
    pub fn scale(&self) -> FeeScale {
        self.scale
    }
}
