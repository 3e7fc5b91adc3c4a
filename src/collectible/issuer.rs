//! Victory Collectible Issuer
//!
//! Mints exactly one token per finished match, to its winner, on request.
//! The issuer reads the registry but never writes to it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::collectible::token::{TokenId, VictoryToken};
use crate::config::CollectionInfo;
use crate::core::address::Address;
use crate::core::hash::StateHasher;
use crate::error::{ArbiterError, ArbiterResult};
use crate::game::events::ArbiterEventData;
use crate::game::registry::MatchRegistry;
use crate::game::state::{GameId, MatchStatus};

/// The token table.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VictoryIssuer {
    /// Collection metadata
    collection: CollectionInfo,

    /// All tokens, keyed by id
    tokens: BTreeMap<TokenId, VictoryToken>,

    /// Match -> token association (at most one per match)
    redeemed: BTreeMap<GameId, TokenId>,

    /// Per-owner token count
    balances: BTreeMap<Address, u64>,

    /// Next id to allocate (monotonic, starts at 1)
    next_token_id: TokenId,

    /// Events produced by the last operations (drained by the engine)
    #[serde(skip)]
    pending_events: Vec<ArbiterEventData>,
}

impl Default for VictoryIssuer {
    fn default() -> Self {
        Self::new(CollectionInfo::default())
    }
}

impl VictoryIssuer {
    /// Create an empty issuer.
    pub fn new(collection: CollectionInfo) -> Self {
        Self {
            collection,
            tokens: BTreeMap::new(),
            redeemed: BTreeMap::new(),
            balances: BTreeMap::new(),
            next_token_id: 1,
            pending_events: Vec::new(),
        }
    }

    /// Mint the victory token for `game_id` to `caller`.
    ///
    /// `registry` must be the one this issuer is paired with; the engine
    /// is the only caller.
    ///
    /// Checks, in order: the match exists, it has finished, `caller` is its
    /// winner, and nothing was minted for it yet. An unfinished match is
    /// reported as `GameNotOngoing`.
    pub(crate) fn redeem_victory_nft(
        &mut self,
        registry: &MatchRegistry,
        game_id: GameId,
        uri: impl Into<String>,
        caller: Address,
    ) -> ArbiterResult<TokenId> {
        let game = registry.get_game(game_id)?;

        if game.status != MatchStatus::Finished {
            warn!("Redeem for unfinished game {} by {}", game_id, caller.short());
            return Err(ArbiterError::GameNotOngoing(game_id));
        }
        if game.winner != Some(caller) {
            warn!("Redeem for game {} by non-winner {}", game_id, caller.short());
            return Err(ArbiterError::NotWinner(game_id));
        }
        if let Some(token_id) = self.redeemed.get(&game_id) {
            return Err(ArbiterError::AlreadyRedeemed { game_id, token_id: *token_id });
        }

        let token_id = self.next_token_id;
        self.next_token_id += 1;

        let token = VictoryToken {
            id: token_id,
            owner: caller,
            uri: uri.into(),
            game_id,
        };
        self.tokens.insert(token_id, token);
        self.redeemed.insert(game_id, token_id);
        *self.balances.entry(caller).or_insert(0) += 1;

        self.push_event(ArbiterEventData::Transfer { from: None, to: caller, token_id });
        self.push_event(ArbiterEventData::NftRedeemed { game_id, token_id, owner: caller });

        info!("Token {} minted to {} for game {}", token_id, caller.short(), game_id);
        Ok(token_id)
    }

    /// Owner of a token.
    pub fn owner_of(&self, token_id: TokenId) -> ArbiterResult<Address> {
        self.token(token_id).map(|t| t.owner)
    }

    /// Metadata location of a token, exactly as supplied at redemption.
    pub fn token_uri(&self, token_id: TokenId) -> ArbiterResult<&str> {
        self.token(token_id).map(|t| t.uri.as_str())
    }

    /// Full token record.
    pub fn token(&self, token_id: TokenId) -> ArbiterResult<&VictoryToken> {
        self.tokens.get(&token_id).ok_or(ArbiterError::TokenNotFound(token_id))
    }

    /// Token minted for a match, if any.
    pub fn token_of_game(&self, game_id: GameId) -> Option<TokenId> {
        self.redeemed.get(&game_id).copied()
    }

    /// Check if a match has been redeemed.
    pub fn is_redeemed(&self, game_id: GameId) -> bool {
        self.redeemed.contains_key(&game_id)
    }

    /// Number of tokens held by `owner`.
    pub fn balance_of(&self, owner: &Address) -> u64 {
        self.balances.get(owner).copied().unwrap_or(0)
    }

    /// Number of tokens ever minted.
    pub fn total_supply(&self) -> u64 {
        self.tokens.len() as u64
    }

    /// Next id a redemption will hand out.
    pub fn next_token_id(&self) -> TokenId {
        self.next_token_id
    }

    /// Collection name.
    pub fn name(&self) -> &str {
        &self.collection.name
    }

    /// Collection symbol.
    pub fn symbol(&self) -> &str {
        &self.collection.symbol
    }

    /// Collection metadata.
    pub fn collection(&self) -> &CollectionInfo {
        &self.collection
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<ArbiterEventData> {
        std::mem::take(&mut self.pending_events)
    }

    /// Hash the token table for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u64(self.tokens.len() as u64);
        for token in self.tokens.values() {
            token.hash_into(hasher);
        }
    }

    /// Check that a decoded token table agrees with its id counter, its own
    /// indexes, and the winners recorded in `registry`.
    pub(crate) fn validate(&self, registry: &MatchRegistry) -> ArbiterResult<()> {
        if self.next_token_id == 0 {
            return Err(ArbiterError::Snapshot("next token id is zero".to_string()));
        }
        if let Some((&last, _)) = self.tokens.last_key_value() {
            if last >= self.next_token_id {
                return Err(ArbiterError::Snapshot(format!(
                    "token {} is not below next token id {}",
                    last, self.next_token_id
                )));
            }
        }
        if self.redeemed.len() != self.tokens.len() {
            return Err(ArbiterError::Snapshot(format!(
                "{} redeemed games for {} tokens",
                self.redeemed.len(),
                self.tokens.len()
            )));
        }

        for (game_id, token_id) in &self.redeemed {
            let token = self.tokens.get(token_id).ok_or_else(|| {
                ArbiterError::Snapshot(format!("game {} points at missing token {}", game_id, token_id))
            })?;
            if token.game_id != *game_id {
                return Err(ArbiterError::Snapshot(format!(
                    "token {} belongs to game {}, not {}",
                    token_id, token.game_id, game_id
                )));
            }

            let winner = registry
                .get_game(*game_id)
                .ok()
                .filter(|game| game.status == MatchStatus::Finished)
                .and_then(|game| game.winner);
            if winner != Some(token.owner) {
                return Err(ArbiterError::Snapshot(format!(
                    "token {} is not held by the winner of game {}",
                    token_id, game_id
                )));
            }
        }

        let mut counted: BTreeMap<Address, u64> = BTreeMap::new();
        for (id, token) in &self.tokens {
            if token.id != *id {
                return Err(ArbiterError::Snapshot(format!("token record {} is keyed as {}", token.id, id)));
            }
            *counted.entry(token.owner).or_insert(0) += 1;
        }
        if counted != self.balances {
            return Err(ArbiterError::Snapshot("balances disagree with token owners".to_string()));
        }
        Ok(())
    }

    fn push_event(&mut self, event: ArbiterEventData) {
        self.pending_events.push(event);
    }
}
