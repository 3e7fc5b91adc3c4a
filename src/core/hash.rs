//! State Hashing for Verification
//!
//! Provides deterministic hashing of arbiter state for:
//! - Replay validation (same calls, same digest)
//! - Snapshot integrity checks after a restore

use sha2::{Digest, Sha256};

use super::address::Address;

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Deterministic hasher for arbiter state.
///
/// Wraps SHA-256 with helpers for the engine's field types.
/// Order of updates is critical for determinism.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for full arbiter state.
    pub fn for_arbiter_state() -> Self {
        Self::new(b"RPS_ARBITER_STATE_V1")
    }

    /// Update with raw bytes.
    #[inline]
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a boolean.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(value as u8);
    }

    /// Update with an address.
    #[inline]
    pub fn update_address(&mut self, address: &Address) {
        self.hasher.update(address.as_bytes());
    }

    /// Update with an optional address. A presence byte keeps `None`
    /// distinct from any real address.
    pub fn update_opt_address(&mut self, address: Option<&Address>) {
        match address {
            Some(a) => {
                self.update_u8(1);
                self.update_address(a);
            }
            None => self.update_u8(0),
        }
    }

    /// Update with a length-prefixed string.
    pub fn update_str(&mut self, value: &str) {
        self.update_u64(value.len() as u64);
        self.hasher.update(value.as_bytes());
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Compute state hash for replay verification.
///
/// Both id counters are always hashed first so that two states with the
/// same records but different allocation history never collide.
pub fn compute_state_hash<F>(next_game_id: u64, next_token_id: u64, add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_arbiter_state();

    hasher.update_u64(next_game_id);
    hasher.update_u64(next_token_id);

    add_state(&mut hasher);

    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_hasher_determinism() {
        let make_hash = || {
            let mut hasher = StateHasher::for_arbiter_state();
            hasher.update_u64(12345);
            hasher.update_address(&Address::from_label("alice"));
            hasher.update_opt_address(None);
            hasher.update_str("ipfs://victory1");
            hasher.update_bool(true);
            hasher.finalize()
        };

        assert_eq!(make_hash(), make_hash());
    }

    #[test]
    fn test_hash_order_matters() {
        let hash1 = {
            let mut h = StateHasher::new(b"test");
            h.update_u64(1);
            h.update_u64(2);
            h.finalize()
        };

        let hash2 = {
            let mut h = StateHasher::new(b"test");
            h.update_u64(2);
            h.update_u64(1);
            h.finalize()
        };

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_domain_separation() {
        let hash = |domain: &[u8]| {
            let mut h = StateHasher::new(domain);
            h.update_u64(1234);
            h.finalize()
        };

        assert_ne!(hash(b"DOMAIN_A"), hash(b"DOMAIN_B"));
    }

    #[test]
    fn test_optional_address_presence_byte() {
        let none = {
            let mut h = StateHasher::new(b"test");
            h.update_opt_address(None);
            h.finalize()
        };
        let zero = {
            let mut h = StateHasher::new(b"test");
            h.update_opt_address(Some(&Address::new([0; 20])));
            h.finalize()
        };

        assert_ne!(none, zero);
    }

    #[test]
    fn test_compute_state_hash() {
        let hash = compute_state_hash(2, 1, |hasher| {
            hasher.update_str("a");
        });
        let hash2 = compute_state_hash(2, 1, |hasher| {
            hasher.update_str("a");
        });
        assert_eq!(hash, hash2);

        let hash3 = compute_state_hash(3, 1, |hasher| {
            hasher.update_str("a");
        });
        assert_ne!(hash, hash3);
    }
}
