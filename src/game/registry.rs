//! Match Registry
//!
//! Owns the match table, allocates ids and enforces the per-match
//! state machine:
//!
//! ```text
//! Waiting --join--> Ongoing --move--> Ongoing --move (resolves)--> Finished
//! ```
//!
//! Every operation validates all of its preconditions before it writes
//! anything, so a rejected call leaves the registry exactly as it was.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::address::Address;
use crate::core::hash::StateHasher;
use crate::error::{ArbiterError, ArbiterResult};
use crate::game::events::ArbiterEventData;
use crate::game::moves::{resolve, Move, Outcome};
use crate::game::state::{GameId, Match, MatchStatus, NO_GAME};

/// Moves committed but not yet published on the match record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedMoves {
    /// Player 1's slot
    pub first: Option<Move>,
    /// Player 2's slot
    pub second: Option<Move>,
}

impl SealedMoves {
    /// Both slots filled.
    fn both(&self) -> Option<(Move, Move)> {
        Some((self.first?, self.second?))
    }
}

/// Which seat a submission lands in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Seat {
    First,
    Second,
}

/// The match table.
///
/// Uses BTreeMap for deterministic iteration order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchRegistry {
    /// All matches, keyed by id
    games: BTreeMap<GameId, Match>,

    /// Committed moves of unresolved matches
    sealed: BTreeMap<GameId, SealedMoves>,

    /// Next id to allocate (monotonic, starts at 1)
    next_game_id: GameId,

    /// Whether a creator may take their own open seat
    #[serde(skip)]
    allow_self_join: bool,

    /// Events produced by the last operations (drained by the engine)
    #[serde(skip)]
    pending_events: Vec<ArbiterEventData>,
}

impl Default for MatchRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchRegistry {
    /// Create an empty registry that rejects self-join.
    pub fn new() -> Self {
        Self {
            games: BTreeMap::new(),
            sealed: BTreeMap::new(),
            next_game_id: NO_GAME + 1,
            allow_self_join: false,
            pending_events: Vec::new(),
        }
    }

    /// Set the self-join policy.
    #[must_use]
    pub fn with_self_join(mut self, allow: bool) -> Self {
        self.allow_self_join = allow;
        self
    }

    /// Update the self-join policy in place.
    pub fn set_self_join(&mut self, allow: bool) {
        self.allow_self_join = allow;
    }

    /// Check the self-join policy.
    pub fn allows_self_join(&self) -> bool {
        self.allow_self_join
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Open a new match with `caller` as player 1.
    pub fn create_game(&mut self, caller: Address) -> GameId {
        let game_id = self.next_game_id;
        self.next_game_id += 1;

        self.games.insert(game_id, Match::new(game_id, caller));
        self.push_event(ArbiterEventData::GameCreated { game_id, player1: caller });

        info!("Game {} created by {}", game_id, caller.short());
        game_id
    }

    /// Take the open seat of a waiting match.
    pub fn join_game(&mut self, game_id: GameId, caller: Address) -> ArbiterResult<()> {
        let allow_self_join = self.allow_self_join;
        let game = self.game_mut(game_id)?;

        if game.status != MatchStatus::Waiting {
            return Err(ArbiterError::GameNotWaiting(game_id));
        }
        if game.player1 == caller && !allow_self_join {
            return Err(ArbiterError::CannotJoinOwnGame(game_id));
        }

        game.player2 = Some(caller);
        game.status = MatchStatus::Ongoing;
        self.sealed.insert(game_id, SealedMoves::default());
        self.push_event(ArbiterEventData::GameJoined { game_id, player2: caller });

        debug!("Player {} joined game {}", caller.short(), game_id);
        Ok(())
    }

    /// Commit a move for `caller`.
    ///
    /// `selector` is the wire encoding (1 = Rock, 2 = Paper, 3 = Scissors).
    /// The second commitment resolves the match in the same call; in that
    /// case the outcome is returned, otherwise `None`.
    pub fn submit_move(
        &mut self,
        game_id: GameId,
        caller: Address,
        selector: u8,
    ) -> ArbiterResult<Option<Outcome>> {
        let game = self.game(game_id)?;
        if game.status != MatchStatus::Ongoing {
            return Err(ArbiterError::GameNotOngoing(game_id));
        }

        let mv = Move::try_from(selector)?;

        if !game.is_player(&caller) {
            return Err(ArbiterError::NotAPlayer(game_id));
        }

        let slots = self.sealed.get(&game_id).copied().unwrap_or_default();
        let seat = Self::free_seat(game, &caller, &slots)
            .ok_or(ArbiterError::MoveAlreadySubmitted(game_id))?;

        // All checks passed; from here on the call cannot fail.
        let slots = self.sealed.entry(game_id).or_default();
        match seat {
            Seat::First => slots.first = Some(mv),
            Seat::Second => slots.second = Some(mv),
        }
        let both = slots.both();

        self.push_event(ArbiterEventData::MoveSubmitted { game_id, player: caller });
        debug!("Player {} committed a move in game {}", caller.short(), game_id);

        Ok(both.map(|(move1, move2)| self.finish(game_id, move1, move2)))
    }

    /// Read a match record.
    pub fn get_game(&self, game_id: GameId) -> ArbiterResult<&Match> {
        self.game(game_id)
    }

    /// Id of the most recently created match (0 if none).
    pub fn game_counter(&self) -> GameId {
        self.next_game_id.saturating_sub(1)
    }

    /// Next id `create_game` will hand out.
    pub fn next_game_id(&self) -> GameId {
        self.next_game_id
    }

    /// Number of matches ever created.
    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    /// Check whether `player` has already committed in `game_id`.
    ///
    /// On a self-joined match this reports whether both seats are filled.
    pub fn has_submitted(&self, game_id: GameId, player: &Address) -> ArbiterResult<bool> {
        let game = self.game(game_id)?;
        if !game.is_player(player) {
            return Err(ArbiterError::NotAPlayer(game_id));
        }
        if game.is_finished() {
            return Ok(true);
        }

        let slots = self.sealed.get(&game_id).copied().unwrap_or_default();
        Ok(Self::free_seat(game, player, &slots).is_none())
    }

    /// Iterate over all matches in id order.
    pub fn games(&self) -> impl Iterator<Item = &Match> {
        self.games.values()
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<ArbiterEventData> {
        std::mem::take(&mut self.pending_events)
    }

    /// Hash the match table for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u64(self.games.len() as u64);
        for game in self.games.values() {
            game.hash_into(hasher);
        }

        // Sealed slots only record presence; the digest must not leak moves
        hasher.update_u64(self.sealed.len() as u64);
        for (game_id, slots) in &self.sealed {
            hasher.update_u64(*game_id);
            hasher.update_bool(slots.first.is_some());
            hasher.update_bool(slots.second.is_some());
        }
    }

    /// Check that a decoded table agrees with its own id counter and that
    /// sealed slots only exist for ongoing matches.
    pub(crate) fn validate(&self) -> ArbiterResult<()> {
        if self.next_game_id <= NO_GAME {
            return Err(ArbiterError::Snapshot("next game id is zero".to_string()));
        }
        if let Some((&last, _)) = self.games.last_key_value() {
            if last >= self.next_game_id {
                return Err(ArbiterError::Snapshot(format!(
                    "game {} is not below next game id {}",
                    last, self.next_game_id
                )));
            }
        }
        for (id, game) in &self.games {
            if *id == NO_GAME || game.id != *id {
                return Err(ArbiterError::Snapshot(format!("game record {} is keyed as {}", game.id, id)));
            }
        }
        for id in self.sealed.keys() {
            match self.games.get(id) {
                Some(game) if game.status == MatchStatus::Ongoing => {}
                _ => {
                    return Err(ArbiterError::Snapshot(format!(
                        "sealed moves for game {} which is not ongoing",
                        id
                    )))
                }
            }
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn set_next_game_id(&mut self, next_game_id: GameId) {
        self.next_game_id = next_game_id;
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn game(&self, game_id: GameId) -> ArbiterResult<&Match> {
        self.games.get(&game_id).ok_or(ArbiterError::GameNotFound(game_id))
    }

    fn game_mut(&mut self, game_id: GameId) -> ArbiterResult<&mut Match> {
        self.games.get_mut(&game_id).ok_or(ArbiterError::GameNotFound(game_id))
    }

    fn push_event(&mut self, event: ArbiterEventData) {
        self.pending_events.push(event);
    }

    /// Seat `caller` would fill next, or `None` if they have no empty seat.
    fn free_seat(game: &Match, caller: &Address, slots: &SealedMoves) -> Option<Seat> {
        if game.player1 == *caller && slots.first.is_none() {
            return Some(Seat::First);
        }
        if game.player2.as_ref() == Some(caller) && slots.second.is_none() {
            return Some(Seat::Second);
        }
        None
    }

    /// Publish both moves, decide the winner and close the match.
    fn finish(&mut self, game_id: GameId, move1: Move, move2: Move) -> Outcome {
        let outcome = resolve(move1, move2);

        self.sealed.remove(&game_id);
        let Some(game) = self.games.get_mut(&game_id) else {
            return outcome;
        };

        game.move1 = Some(move1);
        game.move2 = Some(move2);
        game.winner = match outcome {
            Outcome::Player1 => Some(game.player1),
            Outcome::Player2 => game.player2,
            Outcome::Draw => None,
        };
        game.status = MatchStatus::Finished;

        let winner = game.winner;
        self.push_event(ArbiterEventData::GameFinished { game_id, winner });

        match winner {
            Some(w) => info!("Game {} finished: {:?} vs {:?}, winner {}", game_id, move1, move2, w.short()),
            None => info!("Game {} finished: {:?} vs {:?}, draw", game_id, move1, move2),
        }
        outcome
    }
}

// =============================================================================
// TESTS
// =============================================================================
