//! # Contract Interface Descriptions
//!
//! Static method tables for each contract role. Every facade call is checked
//! against its table before it reaches the ledger, and every return value is
//! checked against the declared outputs.
//!
//! Encoding is the ledger client's job; these tables only describe shapes.

use crate::domain::services::keccak256;
use crate::domain::value_objects::{Address, U256};
use crate::errors::InterfaceError;
use std::fmt;

// =============================================================================
// VALUES
// =============================================================================

/// A typed value crossing the ledger boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Address(Address),
    Uint(U256),
    Bool(bool),
    String(String),
}

impl Token {
    /// Returns true if this value fits the parameter type.
    #[must_use]
    pub fn matches(&self, param: ParamType) -> bool {
        match (self, param) {
            (Self::Address(_), ParamType::Address)
            | (Self::Bool(_), ParamType::Bool)
            | (Self::String(_), ParamType::String) => true,
            (Self::Uint(v), ParamType::Uint(bits)) => v.bits() <= usize::from(bits),
            _ => false,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Address(_) => "address",
            Self::Uint(_) => "uint",
            Self::Bool(_) => "bool",
            Self::String(_) => "string",
        }
    }

    /// The address, if this is an address token.
    #[must_use]
    pub fn as_address(&self) -> Option<Address> {
        match self {
            Self::Address(a) => Some(*a),
            _ => None,
        }
    }

    /// The integer, if this is a uint token.
    #[must_use]
    pub fn as_uint(&self) -> Option<U256> {
        match self {
            Self::Uint(v) => Some(*v),
            _ => None,
        }
    }

    /// The flag, if this is a bool token.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<Address> for Token {
    fn from(a: Address) -> Self {
        Self::Address(a)
    }
}

impl From<U256> for Token {
    fn from(v: U256) -> Self {
        Self::Uint(v)
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

// =============================================================================
// TYPES
// =============================================================================

/// Solidity parameter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Address,
    /// Unsigned integer of the given bit width.
    Uint(u16),
    Bool,
    String,
}

/// `uint256`.
pub const UINT256: ParamType = ParamType::Uint(256);

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address => f.write_str("address"),
            Self::Uint(bits) => write!(f, "uint{bits}"),
            Self::Bool => f.write_str("bool"),
            Self::String => f.write_str("string"),
        }
    }
}

/// State mutability of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    View,
    NonPayable,
    Payable,
}

impl Mutability {
    /// Solidity keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::NonPayable => "nonpayable",
            Self::Payable => "payable",
        }
    }
}

/// One method of a contract interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodSpec {
    pub name: &'static str,
    pub inputs: &'static [ParamType],
    pub outputs: &'static [ParamType],
    pub mutability: Mutability,
}

impl MethodSpec {
    /// Canonical signature, e.g. `vaults(uint256)`.
    #[must_use]
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, join(self.inputs))
    }

    /// First four bytes of the keccak hash of the signature.
    #[must_use]
    pub fn selector(&self) -> [u8; 4] {
        let hash = keccak256(self.signature().as_bytes());
        [hash[0], hash[1], hash[2], hash[3]]
    }

    /// Returns true for methods that change state.
    #[must_use]
    pub fn is_mutating(&self) -> bool {
        self.mutability != Mutability::View
    }

    /// Checks arguments against the declared inputs.
    pub fn check_args(&self, args: &[Token]) -> Result<(), InterfaceError> {
        if matches_all(self.inputs, args) {
            return Ok(());
        }
        Err(InterfaceError::ArgumentMismatch {
            method: self.name,
            expected: join(self.inputs),
            actual: describe(args),
        })
    }

    /// Checks a return value against the declared outputs.
    pub fn check_outputs(&self, outputs: &[Token]) -> Result<(), InterfaceError> {
        if matches_all(self.outputs, outputs) {
            return Ok(());
        }
        Err(InterfaceError::UnexpectedReturn {
            method: self.name,
            expected: join(self.outputs),
            actual: describe(outputs),
        })
    }
}

fn matches_all(params: &[ParamType], tokens: &[Token]) -> bool {
    params.len() == tokens.len() && params.iter().zip(tokens).all(|(p, t)| t.matches(*p))
}

fn join(params: &[ParamType]) -> String {
    params
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn describe(tokens: &[Token]) -> String {
    tokens.iter().map(Token::kind).collect::<Vec<_>>().join(",")
}

/// The method table of one contract role.
#[derive(Debug)]
pub struct ContractInterface {
    pub name: &'static str,
    pub methods: &'static [MethodSpec],
}

impl ContractInterface {
    /// Looks up a method by name.
    pub fn method(&self, name: &str) -> Result<&MethodSpec, InterfaceError> {
        self.methods
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| InterfaceError::UnknownMethod {
                interface: self.name,
                method: name.to_owned(),
            })
    }
}

// =============================================================================
// TABLES
// =============================================================================

use Mutability::{NonPayable, Payable, View};
use ParamType::{Address as ADDRESS, Bool as BOOL, String as STRING};

const fn view(name: &'static str, inputs: &'static [ParamType], outputs: &'static [ParamType]) -> MethodSpec {
    MethodSpec {
        name,
        inputs,
        outputs,
        mutability: View,
    }
}

const fn send(name: &'static str, inputs: &'static [ParamType]) -> MethodSpec {
    MethodSpec {
        name,
        inputs,
        outputs: &[],
        mutability: NonPayable,
    }
}

/// `ERC721VaultFactory`.
pub static VAULT_FACTORY: ContractInterface = ContractInterface {
    name: "ERC721VaultFactory",
    methods: &[
        view("vaultCount", &[], &[UINT256]),
        view("vaults", &[UINT256], &[ADDRESS]),
        view("settings", &[], &[ADDRESS]),
        view("logic", &[], &[ADDRESS]),
        MethodSpec {
            name: "mint",
            inputs: &[STRING, STRING, ADDRESS, UINT256, UINT256, UINT256, UINT256],
            outputs: &[UINT256],
            mutability: NonPayable,
        },
    ],
};

/// `IndexERC721Factory`.
pub static BASKET_FACTORY: ContractInterface = ContractInterface {
    name: "IndexERC721Factory",
    methods: &[
        view("baskets", &[UINT256], &[ADDRESS]),
        MethodSpec {
            name: "createBasket",
            inputs: &[],
            outputs: &[ADDRESS],
            mutability: NonPayable,
        },
    ],
};

/// `TokenVault`.
pub static TOKEN_VAULT: ContractInterface = ContractInterface {
    name: "TokenVault",
    methods: &[
        view("token", &[], &[ADDRESS]),
        view("id", &[], &[UINT256]),
        view("auctionEnd", &[], &[UINT256]),
        view("auctionLength", &[], &[UINT256]),
        view("reserveTotal", &[], &[UINT256]),
        view("livePrice", &[], &[UINT256]),
        view("auctionState", &[], &[ParamType::Uint(8)]),
        view("settings", &[], &[ADDRESS]),
        view("curator", &[], &[ADDRESS]),
        view("fee", &[], &[UINT256]),
        view("lastClaimed", &[], &[UINT256]),
        view("vaultClosed", &[], &[BOOL]),
        view("votingTokens", &[], &[UINT256]),
        view("userPrices", &[ADDRESS], &[UINT256]),
        view("reservePrice", &[], &[UINT256]),
        send("kickCurator", &[ADDRESS]),
        send("removeReserve", &[ADDRESS]),
        send("updateCurator", &[ADDRESS]),
        send("updateAuctionLength", &[UINT256]),
        send("updateFee", &[UINT256]),
        send("claimFees", &[]),
        send("updateUserPrice", &[UINT256]),
        MethodSpec {
            name: "start",
            inputs: &[],
            outputs: &[],
            mutability: Payable,
        },
        MethodSpec {
            name: "bid",
            inputs: &[],
            outputs: &[],
            mutability: Payable,
        },
        send("end", &[]),
        send("redeem", &[]),
        send("cash", &[]),
    ],
};

/// `IndexERC721`.
pub static INDEX_BASKET: ContractInterface = ContractInterface {
    name: "IndexERC721",
    methods: &[
        send("depositERC721", &[ADDRESS, UINT256]),
        send("withdrawERC721", &[ADDRESS, UINT256]),
        send("withdrawETH", &[]),
        send("withdrawERC20", &[ADDRESS]),
    ],
};
