//! # Ports Layer (Middle Hexagon)
//!
//! Interfaces between the facades and the ledger client.
//! No concrete implementations in this module.

pub mod outbound;

pub use crate::domain::abi::Token;
pub use outbound::*;
