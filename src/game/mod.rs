//! Match Logic Module
//!
//! Everything that decides a match. 100% deterministic.
//!
//! ## Module Structure
//!
//! - `moves`: Move encoding and the pure winner rule
//! - `state`: Match record and status
//! - `registry`: Match table and state transitions
//! - `events`: Notifications for external observers

pub mod moves;
pub mod state;
pub mod registry;
pub mod events;

// Re-export key types
pub use moves::{resolve, Move, Outcome};
pub use state::{GameId, Match, MatchStatus, NO_GAME};
pub use registry::MatchRegistry;
pub use events::{ArbiterEvent, ArbiterEventData};
