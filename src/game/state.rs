//! Match State Definitions
//!
//! The per-match record as seen by callers. Records are never deleted.

use serde::{Deserialize, Serialize};

use crate::core::address::Address;
use crate::core::hash::StateHasher;
use crate::game::moves::{Move, Outcome};

/// Match identifier. Allocated from 1; 0 means "no match".
pub type GameId = u64;

/// Reserved id that never names a match.
pub const NO_GAME: GameId = 0;

// =============================================================================
// MATCH STATUS
// =============================================================================

/// Lifecycle status of a match.
///
/// Ordered: a match only ever moves forward through these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
#[derive(Default)]
pub enum MatchStatus {
    /// Created, waiting for an opponent
    #[default]
    Waiting = 0,
    /// Both seats filled, collecting moves
    Ongoing = 1,
    /// Resolved
    Finished = 2,
}

// =============================================================================
// MATCH
// =============================================================================

/// One round between two players.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Match identifier
    pub id: GameId,

    /// Creator
    pub player1: Address,

    /// Opponent (set on join)
    pub player2: Option<Address>,

    /// Lifecycle status
    pub status: MatchStatus,

    /// Player 1's move, published at resolution
    pub move1: Option<Move>,

    /// Player 2's move, published at resolution
    pub move2: Option<Move>,

    /// Winner; `None` on a finished match means a draw
    pub winner: Option<Address>,
}

impl Match {
    /// Create a fresh waiting match.
    pub fn new(id: GameId, player1: Address) -> Self {
        Self {
            id,
            player1,
            player2: None,
            status: MatchStatus::Waiting,
            move1: None,
            move2: None,
            winner: None,
        }
    }

    /// Check if `who` holds either seat.
    pub fn is_player(&self, who: &Address) -> bool {
        self.player1 == *who || self.player2.as_ref() == Some(who)
    }

    /// Check if the match has resolved.
    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    /// Check if a finished match ended level.
    pub fn is_draw(&self) -> bool {
        self.is_finished() && self.winner.is_none()
    }

    /// Outcome of a finished match, from player 1's seat.
    pub fn outcome(&self) -> Option<Outcome> {
        if !self.is_finished() {
            return None;
        }
        Some(match self.winner {
            None => Outcome::Draw,
            Some(w) if w == self.player1 && self.player2 != Some(w) => Outcome::Player1,
            Some(w) if self.player2 == Some(w) && w != self.player1 => Outcome::Player2,
            // Self-join: both seats hold the same address; report by the moves
            Some(_) => match (self.move1, self.move2) {
                (Some(a), Some(b)) => crate::game::moves::resolve(a, b),
                _ => Outcome::Draw,
            },
        })
    }

    /// Hash this match for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u64(self.id);
        hasher.update_address(&self.player1);
        hasher.update_opt_address(self.player2.as_ref());
        hasher.update_u8(self.status as u8);
        hasher.update_u8(self.move1.map(Move::selector).unwrap_or(0));
        hasher.update_u8(self.move2.map(Move::selector).unwrap_or(0));
        hasher.update_opt_address(self.winner.as_ref());
    }
}

// =============================================================================
// TESTS
// =============================================================================
