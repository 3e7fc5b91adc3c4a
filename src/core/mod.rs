//! Core deterministic primitives.
//!
//! Participant identifiers and state hashing. Nothing in here depends on
//! match rules, so both the registry and the issuer build on it.

pub mod address;
pub mod hash;

// Re-export core types
pub use address::{Address, AddressParseError};
pub use hash::{compute_state_hash, StateHash, StateHasher};
