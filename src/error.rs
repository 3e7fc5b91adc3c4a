//! Arbiter Errors
//!
//! Every variant is a deterministic rejection of the requested operation.
//! A rejected call leaves all state untouched.

use crate::game::state::GameId;
use crate::collectible::token::TokenId;

/// Errors returned by registry and issuer operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArbiterError {
    /// Game id was never allocated (includes the reserved id 0).
    #[error("game {0} not found")]
    GameNotFound(GameId),

    /// Game is not accepting a second player.
    #[error("game {0} is not waiting for a player")]
    GameNotWaiting(GameId),

    /// Game is not in a state that accepts moves.
    ///
    /// Also returned when redeeming a game that has not finished.
    #[error("game {0} is not ongoing")]
    GameNotOngoing(GameId),

    /// Move selector is not Rock (1), Paper (2) or Scissors (3).
    #[error("invalid move selector {0}")]
    InvalidMove(u8),

    /// Caller is neither player of the game.
    #[error("caller is not a player in game {0}")]
    NotAPlayer(GameId),

    /// Caller has already committed a move.
    #[error("move already submitted for game {0}")]
    MoveAlreadySubmitted(GameId),

    /// Caller is not the winner (or the game was a draw).
    #[error("caller is not the winner of game {0}")]
    NotWinner(GameId),

    /// A victory token already exists for this game.
    #[error("game {game_id} already redeemed as token {token_id}")]
    AlreadyRedeemed {
        /// Game that was redeemed.
        game_id: GameId,
        /// Token minted for it.
        token_id: TokenId,
    },

    /// Token id was never minted.
    #[error("token {0} not found")]
    TokenNotFound(TokenId),

    /// Creator tried to join their own game while self-join is disabled.
    #[error("cannot join own game {0}")]
    CannotJoinOwnGame(GameId),

    /// Snapshot could not be encoded or decoded.
    #[error("snapshot codec error: {0}")]
    Snapshot(String),
}

impl From<bincode::Error> for ArbiterError {
    fn from(err: bincode::Error) -> Self {
        ArbiterError::Snapshot(err.to_string())
    }
}

/// Result alias for arbiter operations.
pub type ArbiterResult<T> = Result<T, ArbiterError>;
