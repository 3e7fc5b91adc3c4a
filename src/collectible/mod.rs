//! Victory Collectibles
//!
//! - `token`: Token records
//! - `issuer`: Winner-gated, once-per-match minting and lookups

pub mod token;
pub mod issuer;

// Re-export key types
pub use token::{TokenId, VictoryToken};
pub use issuer::VictoryIssuer;
