//! Arbiter Engine
//!
//! Pairs one `MatchRegistry` with one `VictoryIssuer` and gives callers a
//! single surface over both. Each method runs to completion before
//! returning; events produced by a call are stamped with sequence numbers
//! and queued in call order.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::collectible::issuer::VictoryIssuer;
use crate::collectible::token::{TokenId, VictoryToken};
use crate::config::ArbiterConfig;
use crate::core::address::Address;
use crate::core::hash::{compute_state_hash, StateHash};
use crate::error::ArbiterResult;
use crate::game::events::ArbiterEvent;
use crate::game::moves::Outcome;
use crate::game::registry::MatchRegistry;
use crate::game::state::{GameId, Match};

/// Registry + issuer pair.
#[derive(Clone, Debug)]
pub struct Arbiter {
    config: ArbiterConfig,
    registry: MatchRegistry,
    issuer: VictoryIssuer,
    next_sequence: u64,
    pending_events: Vec<ArbiterEvent>,
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    registry: &'a MatchRegistry,
    issuer: &'a VictoryIssuer,
    next_sequence: u64,
}

#[derive(Deserialize)]
struct Snapshot {
    registry: MatchRegistry,
    issuer: VictoryIssuer,
    next_sequence: u64,
}

impl Default for Arbiter {
    fn default() -> Self {
        Self::new(ArbiterConfig::default())
    }
}

impl Arbiter {
    /// Create a fresh, empty engine.
    pub fn new(config: ArbiterConfig) -> Self {
        let registry = MatchRegistry::new().with_self_join(config.allow_self_join);
        let issuer = VictoryIssuer::new(config.collection.clone());

        Self {
            config,
            registry,
            issuer,
            next_sequence: 0,
            pending_events: Vec::new(),
        }
    }

    /// Engine configuration.
    pub fn config(&self) -> &ArbiterConfig {
        &self.config
    }

    // =========================================================================
    // Match registry
    // =========================================================================

    /// Open a new match.
    pub fn create_game(&mut self, caller: Address) -> GameId {
        let game_id = self.registry.create_game(caller);
        self.collect_events();
        game_id
    }

    /// Join a waiting match.
    pub fn join_game(&mut self, game_id: GameId, caller: Address) -> ArbiterResult<()> {
        let result = self.registry.join_game(game_id, caller);
        self.collect_events();
        result
    }

    /// Commit a move; returns the outcome if this call resolved the match.
    pub fn submit_move(
        &mut self,
        game_id: GameId,
        caller: Address,
        selector: u8,
    ) -> ArbiterResult<Option<Outcome>> {
        let result = self.registry.submit_move(game_id, caller, selector);
        self.collect_events();
        result
    }

    /// Read a match record.
    pub fn get_game(&self, game_id: GameId) -> ArbiterResult<Match> {
        self.registry.get_game(game_id).cloned()
    }

    /// Id of the most recently created match (0 if none).
    pub fn game_counter(&self) -> GameId {
        self.registry.game_counter()
    }

    /// Check whether `player` has committed in `game_id`.
    pub fn has_submitted(&self, game_id: GameId, player: &Address) -> ArbiterResult<bool> {
        self.registry.has_submitted(game_id, player)
    }

    // =========================================================================
    // Collectible issuer
    // =========================================================================

    /// Mint the victory token for a finished match to its winner.
    pub fn redeem_victory_nft(
        &mut self,
        game_id: GameId,
        uri: impl Into<String>,
        caller: Address,
    ) -> ArbiterResult<TokenId> {
        let result = self.issuer.redeem_victory_nft(&self.registry, game_id, uri, caller);
        self.collect_events();
        result
    }

    /// Owner of a token.
    pub fn owner_of(&self, token_id: TokenId) -> ArbiterResult<Address> {
        self.issuer.owner_of(token_id)
    }

    /// Metadata location of a token.
    pub fn token_uri(&self, token_id: TokenId) -> ArbiterResult<String> {
        self.issuer.token_uri(token_id).map(str::to_owned)
    }

    /// Full token record.
    pub fn token(&self, token_id: TokenId) -> ArbiterResult<VictoryToken> {
        self.issuer.token(token_id).cloned()
    }

    /// Token minted for a match, if any.
    pub fn token_of_game(&self, game_id: GameId) -> Option<TokenId> {
        self.issuer.token_of_game(game_id)
    }

    /// Number of tokens held by `owner`.
    pub fn balance_of(&self, owner: &Address) -> u64 {
        self.issuer.balance_of(owner)
    }

    /// Number of tokens ever minted.
    pub fn total_supply(&self) -> u64 {
        self.issuer.total_supply()
    }

    /// Read-only access to the match table.
    pub fn registry(&self) -> &MatchRegistry {
        &self.registry
    }

    /// Read-only access to the token table.
    pub fn issuer(&self) -> &VictoryIssuer {
        &self.issuer
    }

    // =========================================================================
    // Events, digest, snapshots
    // =========================================================================

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<ArbiterEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Compute a digest of the full engine state.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(
            self.registry.next_game_id(),
            self.issuer.next_token_id(),
            |hasher| {
                self.registry.hash_into(hasher);
                self.issuer.hash_into(hasher);
            },
        )
    }

    /// Encode both tables (and id counters) with bincode.
    pub fn snapshot(&self) -> ArbiterResult<Vec<u8>> {
        let snapshot = SnapshotRef {
            registry: &self.registry,
            issuer: &self.issuer,
            next_sequence: self.next_sequence,
        };
        Ok(bincode::serialize(&snapshot)?)
    }

    /// Rebuild an engine from a snapshot.
    ///
    /// The self-join policy comes from `config`; collection metadata is
    /// whatever the snapshot recorded. Snapshots whose counters or indexes
    /// contradict their own tables are rejected.
    pub fn restore(config: ArbiterConfig, bytes: &[u8]) -> ArbiterResult<Self> {
        let snapshot: Snapshot = bincode::deserialize(bytes)?;

        let mut registry = snapshot.registry;
        registry.validate()?;
        snapshot.issuer.validate(&registry)?;
        registry.set_self_join(config.allow_self_join);

        let config = ArbiterConfig {
            collection: snapshot.issuer.collection().clone(),
            ..config
        };

        debug!(
            "Restored {} games and {} tokens",
            registry.game_count(),
            snapshot.issuer.total_supply()
        );

        Ok(Self {
            config,
            registry,
            issuer: snapshot.issuer,
            next_sequence: snapshot.next_sequence,
            pending_events: Vec::new(),
        })
    }

    /// Move component events into the engine queue, in emission order.
    fn collect_events(&mut self) {
        let registry_events = self.registry.take_events();
        let issuer_events = self.issuer.take_events();

        for data in registry_events.into_iter().chain(issuer_events) {
            let event = ArbiterEvent::new(self.next_sequence, data);
            self.next_sequence += 1;
            debug!("Event #{} {}", event.sequence, event.name());
            self.pending_events.push(event);
        }

        #[cfg(feature = "debug-tracing")]
        tracing::trace!("State digest {}", hex::encode(self.compute_hash()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CollectionInfo;
    use crate::error::ArbiterError;
    use crate::game::events::ArbiterEventData;
    use crate::game::moves::Move;
    use crate::game::state::MatchStatus;

    fn alice() -> Address {
        Address::from_label("alice")
    }

    fn bob() -> Address {
        Address::from_label("bob")
    }

    fn play(arbiter: &mut Arbiter, move1: Move, move2: Move) -> GameId {
        let id = arbiter.create_game(alice());
        arbiter.join_game(id, bob()).unwrap();
        arbiter.submit_move(id, alice(), move1 as u8).unwrap();
        arbiter.submit_move(id, bob(), move2 as u8).unwrap();
        id
    }

    #[test]
    fn test_full_flow_sequences_events() {
        let mut arbiter = Arbiter::default();
        let id = play(&mut arbiter, Move::Paper, Move::Rock);
        let token_id = arbiter.redeem_victory_nft(id, "ipfs://victory1", alice()).unwrap();

        let events = arbiter.take_events();
        let sequences: Vec<u64> = events.iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, (0..7).collect::<Vec<_>>());

        assert_eq!(
            events.last().map(|e| e.data.clone()),
            Some(ArbiterEventData::NftRedeemed { game_id: id, token_id, owner: alice() })
        );
        assert!(arbiter.take_events().is_empty());
    }

    #[test]
    fn test_failed_call_changes_nothing() {
        let mut arbiter = Arbiter::default();
        let id = arbiter.create_game(alice());
        arbiter.take_events();
        let before = arbiter.compute_hash();

        assert!(arbiter.submit_move(id, alice(), Move::Rock as u8).is_err());
        assert!(arbiter.join_game(id, alice()).is_err());
        assert!(arbiter.redeem_victory_nft(id, "x", alice()).is_err());

        assert_eq!(arbiter.compute_hash(), before);
        assert!(arbiter.take_events().is_empty());
    }

    #[test]
    fn test_replay_reproduces_digest() {
        let run = || {
            let mut arbiter = Arbiter::default();
            let id = play(&mut arbiter, Move::Scissors, Move::Paper);
            arbiter.redeem_victory_nft(id, "ipfs://x", alice()).unwrap();
            play(&mut arbiter, Move::Rock, Move::Rock);
            arbiter.compute_hash()
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_digest_hides_sealed_move() {
        let with_move = |selector: u8| {
            let mut arbiter = Arbiter::default();
            let id = arbiter.create_game(alice());
            arbiter.join_game(id, bob()).unwrap();
            arbiter.submit_move(id, alice(), selector).unwrap();
            arbiter.compute_hash()
        };

        assert_eq!(with_move(Move::Rock as u8), with_move(Move::Paper as u8));
    }

    #[test]
    fn test_snapshot_restore() {
        let mut arbiter = Arbiter::default();
        let id = play(&mut arbiter, Move::Paper, Move::Rock);
        let token_id = arbiter.redeem_victory_nft(id, "ipfs://victory1", alice()).unwrap();

        // Leave one match mid-flight so sealed slots are exercised too
        let open = arbiter.create_game(bob());
        arbiter.join_game(open, alice()).unwrap();
        arbiter.submit_move(open, bob(), Move::Scissors as u8).unwrap();

        let bytes = arbiter.snapshot().unwrap();
        let mut restored = Arbiter::restore(ArbiterConfig::default(), &bytes).unwrap();

        assert_eq!(restored.compute_hash(), arbiter.compute_hash());
        assert_eq!(restored.owner_of(token_id), Ok(alice()));
        assert_eq!(restored.token_uri(token_id), Ok("ipfs://victory1".to_string()));

        // The sealed move survives the round trip
        assert_eq!(restored.submit_move(open, alice(), Move::Paper as u8), Ok(Some(Outcome::Player1)));
        let game = restored.get_game(open).unwrap();
        assert_eq!(game.status, MatchStatus::Finished);
        assert_eq!(game.winner, Some(bob()));

        // Counters continue where they left off
        assert_eq!(restored.create_game(alice()), open + 1);
    }

    #[test]
    fn test_restore_rejects_garbage() {
        let result = Arbiter::restore(ArbiterConfig::default(), &[1, 2, 3]);
        assert!(matches!(result, Err(ArbiterError::Snapshot(_))));
    }

    #[test]
    fn test_restore_rejects_reused_game_id() {
        let mut arbiter = Arbiter::default();
        let id = arbiter.create_game(alice());
        arbiter.registry.set_next_game_id(id);

        let bytes = arbiter.snapshot().unwrap();
        assert!(matches!(
            Arbiter::restore(ArbiterConfig::default(), &bytes),
            Err(ArbiterError::Snapshot(_))
        ));
    }

    #[test]
    fn test_restore_rejects_zero_game_counter() {
        let mut arbiter = Arbiter::default();
        arbiter.registry.set_next_game_id(0);
        assert_eq!(arbiter.game_counter(), 0);

        let bytes = arbiter.snapshot().unwrap();
        assert!(matches!(
            Arbiter::restore(ArbiterConfig::default(), &bytes),
            Err(ArbiterError::Snapshot(_))
        ));
    }

    #[test]
    fn test_restore_keeps_snapshot_collection() {
        let original = ArbiterConfig {
            collection: CollectionInfo {
                name: "Arena Trophies".to_string(),
                symbol: "TROPHY".to_string(),
            },
            ..ArbiterConfig::default()
        };
        let bytes = Arbiter::new(original.clone()).snapshot().unwrap();

        let restored = Arbiter::restore(ArbiterConfig::default(), &bytes).unwrap();
        assert_eq!(restored.config().collection, original.collection);
        assert_eq!(restored.issuer().name(), "Arena Trophies");
        assert_eq!(restored.issuer().symbol(), "TROPHY");
    }

    #[test]
    fn test_restore_applies_self_join_policy() {
        let arbiter = Arbiter::default();
        let bytes = arbiter.snapshot().unwrap();

        let mut restored = Arbiter::restore(ArbiterConfig::default().with_self_join(true), &bytes).unwrap();
        let id = restored.create_game(alice());
        assert_eq!(restored.join_game(id, alice()), Ok(()));
    }
}
