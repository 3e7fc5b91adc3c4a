//! Arbiter Service
//!
//! Shares one `Arbiter` between concurrent callers. Writes take the lock
//! for the whole call, so callers never observe a half-applied operation;
//! events produced under the lock are broadcast to subscribers in order.

use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use crate::collectible::token::TokenId;
use crate::config::ArbiterConfig;
use crate::core::address::Address;
use crate::core::hash::StateHash;
use crate::engine::Arbiter;
use crate::error::ArbiterResult;
use crate::game::events::ArbiterEvent;
use crate::game::moves::Outcome;
use crate::game::state::{GameId, Match};

/// Cloneable handle to a shared arbiter.
#[derive(Clone)]
pub struct ArbiterService {
    engine: Arc<RwLock<Arbiter>>,
    event_tx: broadcast::Sender<ArbiterEvent>,
}

impl ArbiterService {
    /// Create a service around a fresh engine.
    pub fn new(config: ArbiterConfig) -> Self {
        Self::with_engine(Arbiter::new(config))
    }

    /// Create a service around an existing engine (e.g. a restored snapshot).
    pub fn with_engine(engine: Arbiter) -> Self {
        // broadcast::channel panics on a zero capacity
        let (event_tx, _) = broadcast::channel(engine.config().event_capacity.max(1));

        Self {
            engine: Arc::new(RwLock::new(engine)),
            event_tx,
        }
    }

    /// Subscribe to arbiter events.
    pub fn subscribe_events(&self) -> broadcast::Receiver<ArbiterEvent> {
        self.event_tx.subscribe()
    }

    /// Open a new match.
    pub async fn create_game(&self, caller: Address) -> GameId {
        self.write(|engine| engine.create_game(caller)).await
    }

    /// Join a waiting match.
    pub async fn join_game(&self, game_id: GameId, caller: Address) -> ArbiterResult<()> {
        self.write(|engine| engine.join_game(game_id, caller)).await
    }

    /// Commit a move.
    pub async fn submit_move(
        &self,
        game_id: GameId,
        caller: Address,
        selector: u8,
    ) -> ArbiterResult<Option<Outcome>> {
        self.write(|engine| engine.submit_move(game_id, caller, selector)).await
    }

    /// Mint the victory token for a finished match.
    pub async fn redeem_victory_nft(
        &self,
        game_id: GameId,
        uri: String,
        caller: Address,
    ) -> ArbiterResult<TokenId> {
        self.write(|engine| engine.redeem_victory_nft(game_id, uri, caller)).await
    }

    /// Read a match record.
    pub async fn get_game(&self, game_id: GameId) -> ArbiterResult<Match> {
        self.engine.read().await.get_game(game_id)
    }

    /// Id of the most recently created match.
    pub async fn game_counter(&self) -> GameId {
        self.engine.read().await.game_counter()
    }

    /// Owner of a token.
    pub async fn owner_of(&self, token_id: TokenId) -> ArbiterResult<Address> {
        self.engine.read().await.owner_of(token_id)
    }

    /// Metadata location of a token.
    pub async fn token_uri(&self, token_id: TokenId) -> ArbiterResult<String> {
        self.engine.read().await.token_uri(token_id)
    }

    /// Digest of the current state.
    pub async fn compute_hash(&self) -> StateHash {
        self.engine.read().await.compute_hash()
    }

    /// Bincode snapshot of the current state.
    pub async fn snapshot(&self) -> ArbiterResult<Vec<u8>> {
        self.engine.read().await.snapshot()
    }

    /// Run `op` under the write lock, then publish its events.
    async fn write<T, F>(&self, op: F) -> T
    where
        F: FnOnce(&mut Arbiter) -> T,
    {
        let mut engine = self.engine.write().await;
        let result = op(&mut *engine);

        for event in engine.take_events() {
            // No subscribers is fine; events are fire-and-forget
            if self.event_tx.send(event).is_err() {
                debug!("No event subscribers");
            }
        }
        result
    }
}
