//! Arbiter Events
//!
//! Notifications emitted by registry and issuer operations for external
//! observers (indexers, UIs). Delivery is the embedder's concern; the engine
//! only queues them in call order.

use serde::{Deserialize, Serialize};

use crate::collectible::token::TokenId;
use crate::core::address::Address;
use crate::game::state::GameId;

/// Event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArbiterEventData {
    /// A match was created
    GameCreated {
        game_id: GameId,
        player1: Address,
    },

    /// Second player took the open seat
    GameJoined {
        game_id: GameId,
        player2: Address,
    },

    /// A player committed a move (the move itself stays sealed)
    MoveSubmitted {
        game_id: GameId,
        player: Address,
    },

    /// Both moves are in and the match resolved
    GameFinished {
        game_id: GameId,
        winner: Option<Address>,
    },

    /// Token ownership changed; `from: None` is a mint
    Transfer {
        from: Option<Address>,
        to: Address,
        token_id: TokenId,
    },

    /// Winner claimed the victory token
    NftRedeemed {
        game_id: GameId,
        token_id: TokenId,
        owner: Address,
    },
}

/// An event with its position in the engine's call log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbiterEvent {
    /// Monotonic sequence number (assigned by the engine)
    pub sequence: u64,

    /// Event data
    pub data: ArbiterEventData,
}

impl ArbiterEvent {
    /// Create a new event.
    pub fn new(sequence: u64, data: ArbiterEventData) -> Self {
        Self { sequence, data }
    }

    /// Game this event concerns, if any.
    pub fn game_id(&self) -> Option<GameId> {
        match &self.data {
            ArbiterEventData::GameCreated { game_id, .. }
            | ArbiterEventData::GameJoined { game_id, .. }
            | ArbiterEventData::MoveSubmitted { game_id, .. }
            | ArbiterEventData::GameFinished { game_id, .. }
            | ArbiterEventData::NftRedeemed { game_id, .. } => Some(*game_id),
            ArbiterEventData::Transfer { .. } => None,
        }
    }

    /// Short event name for logs.
    pub fn name(&self) -> &'static str {
        match &self.data {
            ArbiterEventData::GameCreated { .. } => "GameCreated",
            ArbiterEventData::GameJoined { .. } => "GameJoined",
            ArbiterEventData::MoveSubmitted { .. } => "MoveSubmitted",
            ArbiterEventData::GameFinished { .. } => "GameFinished",
            ArbiterEventData::Transfer { .. } => "Transfer",
            ArbiterEventData::NftRedeemed { .. } => "NFTRedeemed",
        }
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_game_id() {
        let alice = Address::from_label("alice");

        let created = ArbiterEvent::new(0, ArbiterEventData::GameCreated { game_id: 7, player1: alice });
        assert_eq!(created.game_id(), Some(7));
        assert_eq!(created.name(), "GameCreated");

        let transfer = ArbiterEvent::new(1, ArbiterEventData::Transfer { from: None, to: alice, token_id: 1 });
        assert_eq!(transfer.game_id(), None);
    }

    #[test]
    fn test_event_json_is_tagged() {
        let alice = Address::from_label("alice");
        let event = ArbiterEvent::new(
            3,
            ArbiterEventData::NftRedeemed { game_id: 1, token_id: 1, owner: alice },
        );

        let json = event.to_json().unwrap();
        assert!(json.contains("\"type\":\"nft_redeemed\""));

        let parsed = ArbiterEvent::from_json(&json).unwrap();
        assert_eq!(parsed, event);
    }
}
