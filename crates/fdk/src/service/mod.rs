//! # Service Layer
//!
//! Typed facades over the protocol contracts, plus the capability gate and
//! invoker they share.

pub mod basket;
pub mod capability;
pub mod factory;
pub mod invoker;
pub mod vault;

pub use basket::Basket;
pub use capability::{CapabilityGate, Credential, CredentialKind};
pub use factory::Factory;
pub use invoker::{ContractInvoker, GasOverrides, Writable};
pub use vault::Vault;
