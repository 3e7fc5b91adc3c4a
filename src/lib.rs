//! # RPS Arbiter
//!
//! Deterministic Rock-Paper-Scissors arbitration with a winner-gated,
//! once-per-match victory collectible.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       RPS ARBITER                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── address.rs  - Opaque participant identifiers            │
//! │  └── hash.rs     - State hashing for replay verification     │
//! │                                                              │
//! │  game/           - Match logic (deterministic)               │
//! │  ├── moves.rs    - Move encoding and the winner rule         │
//! │  ├── state.rs    - Match record and status                   │
//! │  ├── registry.rs - Match table and state transitions         │
//! │  └── events.rs   - Notifications for observers               │
//! │                                                              │
//! │  collectible/    - Victory tokens                            │
//! │  ├── token.rs    - Token records                             │
//! │  └── issuer.rs   - Winner-gated minting and lookups          │
//! │                                                              │
//! │  engine.rs       - Registry + issuer pair, snapshots         │
//! │  service.rs      - Serialized shared access, event fan-out   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Match Lifecycle
//!
//! ```text
//! Waiting --join--> Ongoing --move--> Ongoing --move--> Finished --redeem--> Redeemed
//! ```
//!
//! The second move resolves the match in the same call. `Redeemed` is not a
//! status on the match; it is the presence of a token in the issuer.
//!
//! ## Determinism Guarantee
//!
//! The `core/`, `game/` and `collectible/` modules are **100% deterministic**:
//! - No HashMap (uses BTreeMap for sorted iteration)
//! - No system time or randomness
//! - Every rejection is decided by state and input alone
//!
//! Given the same sequence of calls, the engine reaches the same state and
//! the same `compute_hash()` digest.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod collectible;
pub mod config;
pub mod engine;
pub mod error;
pub mod service;

// Re-export commonly used types
pub use crate::core::address::Address;
pub use crate::core::hash::StateHash;
pub use collectible::{TokenId, VictoryIssuer, VictoryToken};
pub use config::{ArbiterConfig, CollectionInfo};
pub use engine::Arbiter;
pub use error::{ArbiterError, ArbiterResult};
pub use game::{
    resolve, ArbiterEvent, ArbiterEventData, GameId, Match, MatchRegistry, MatchStatus, Move,
    Outcome,
};
pub use service::ArbiterService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
