//! # Domain Layer (Inner Hexagon)
//!
//! Address normalization, fixed-point scaling, gas padding and the contract
//! interface tables. NO I/O, NO async.
//!
//! Dependencies point INWARD only: ports, adapters and facades depend on
//! this module, never the reverse.

pub mod abi;
pub mod entities;
pub mod gas;
pub mod invariants;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use gas::*;
pub use invariants::*;
pub use services::*;
pub use value_objects::*;
