//! Moves and Winner Determination
//!
//! Cyclic dominance: Rock beats Scissors, Scissors beats Paper,
//! Paper beats Rock. Identical moves draw.

use serde::{Deserialize, Serialize};

use crate::error::ArbiterError;

/// A committed hand.
///
/// Discriminants match the wire selector (0 is reserved for "unset").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Move {
    /// Beats Scissors.
    Rock = 1,
    /// Beats Rock.
    Paper = 2,
    /// Beats Paper.
    Scissors = 3,
}

impl Move {
    /// All valid moves, in selector order.
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    /// Get move from selector (1-3).
    pub fn from_selector(selector: u8) -> Option<Move> {
        match selector {
            1 => Some(Move::Rock),
            2 => Some(Move::Paper),
            3 => Some(Move::Scissors),
            _ => None,
        }
    }

    /// Wire selector for this move.
    #[inline]
    pub fn selector(self) -> u8 {
        self as u8
    }

    /// The move this one defeats.
    pub fn beats(self) -> Move {
        match self {
            Move::Rock => Move::Scissors,
            Move::Scissors => Move::Paper,
            Move::Paper => Move::Rock,
        }
    }
}

impl TryFrom<u8> for Move {
    type Error = ArbiterError;

    fn try_from(selector: u8) -> Result<Self, Self::Error> {
        Move::from_selector(selector).ok_or(ArbiterError::InvalidMove(selector))
    }
}

/// Result of a resolved round, from player 1's seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Player 1 wins.
    Player1,
    /// Player 2 wins.
    Player2,
    /// Same move on both sides.
    Draw,
}

impl Outcome {
    /// The outcome seen with the seats swapped.
    pub fn swapped(self) -> Outcome {
        match self {
            Outcome::Player1 => Outcome::Player2,
            Outcome::Player2 => Outcome::Player1,
            Outcome::Draw => Outcome::Draw,
        }
    }
}

/// Decide a round.
#[inline]
pub fn resolve(move1: Move, move2: Move) -> Outcome {
    if move1 == move2 {
        Outcome::Draw
    } else if move1.beats() == move2 {
        Outcome::Player1
    } else {
        Outcome::Player2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_selector_mapping() {
        assert_eq!(Move::from_selector(1), Some(Move::Rock));
        assert_eq!(Move::from_selector(2), Some(Move::Paper));
        assert_eq!(Move::from_selector(3), Some(Move::Scissors));
        assert_eq!(Move::from_selector(0), None);
        assert_eq!(Move::from_selector(4), None);
    }

    #[test]
    fn test_try_from_rejects_unset() {
        assert_eq!(Move::try_from(0), Err(ArbiterError::InvalidMove(0)));
        assert_eq!(Move::try_from(255), Err(ArbiterError::InvalidMove(255)));
        assert_eq!(Move::try_from(2), Ok(Move::Paper));
    }

    #[test]
    fn test_rule_table() {
        use Move::*;

        assert_eq!(resolve(Rock, Scissors), Outcome::Player1);
        assert_eq!(resolve(Scissors, Paper), Outcome::Player1);
        assert_eq!(resolve(Paper, Rock), Outcome::Player1);

        assert_eq!(resolve(Scissors, Rock), Outcome::Player2);
        assert_eq!(resolve(Paper, Scissors), Outcome::Player2);
        assert_eq!(resolve(Rock, Paper), Outcome::Player2);

        for m in Move::ALL {
            assert_eq!(resolve(m, m), Outcome::Draw);
        }
    }

    fn any_move() -> impl Strategy<Value = Move> {
        prop::sample::select(Move::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_resolve_symmetric_under_swap(a in any_move(), b in any_move()) {
            prop_assert_eq!(resolve(a, b), resolve(b, a).swapped());
        }

        #[test]
        fn prop_each_move_beats_exactly_one(a in any_move()) {
            let wins = Move::ALL.iter().filter(|b| resolve(a, **b) == Outcome::Player1).count();
            prop_assert_eq!(wins, 1);
        }

        #[test]
        fn prop_selector_roundtrip(selector in 0u8..=255) {
            match Move::from_selector(selector) {
                Some(m) => prop_assert_eq!(m.selector(), selector),
                None => prop_assert!(selector == 0 || selector > 3),
            }
        }
    }
}
