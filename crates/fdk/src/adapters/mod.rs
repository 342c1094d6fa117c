//! # Adapters Layer (Outer Hexagon)
//!
//! Implementations of the ledger ports. Production ledger clients live
//! outside this crate; the in-memory ledger here backs the test suite.

pub mod in_memory_ledger;

pub use in_memory_ledger::*;
