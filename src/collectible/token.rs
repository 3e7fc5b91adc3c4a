//! Victory Token Records

use serde::{Deserialize, Serialize};

use crate::core::address::Address;
use crate::core::hash::StateHasher;
use crate::game::state::GameId;

/// Token identifier. Allocated from 1.
pub type TokenId = u64;

/// A minted victory token. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VictoryToken {
    /// Token identifier
    pub id: TokenId,

    /// Winner of the source match
    pub owner: Address,

    /// Opaque metadata location, stored verbatim
    pub uri: String,

    /// Match this token was redeemed for
    pub game_id: GameId,
}

impl VictoryToken {
    /// Hash this token for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u64(self.id);
        hasher.update_address(&self.owner);
        hasher.update_str(&self.uri);
        hasher.update_u64(self.game_id);
    }
}
