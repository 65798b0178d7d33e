//! Deterministic random streams for synthetic weather.
//!
//! Each weather component draws from its own ChaCha stream derived from
//! (master seed, stream id, day), so changing how one component consumes
//! randomness never shifts another.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Identifier of an independent random stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamId {
    Temperature = 1,
    Humidity = 2,
    Rain = 3,
}

#[derive(Debug, Clone)]
pub struct RngManager {
    master_seed: u64,
}

impl RngManager {
    pub fn new(seed: u64) -> Self {
        Self { master_seed: seed }
    }

    /// RNG for one stream on one simulated day.
    pub fn daily_stream(&self, stream: StreamId, day: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.derive_seed(stream as u64, day))
    }

    fn derive_seed(&self, stream: u64, day: u64) -> u64 {
        let mut seed = self.master_seed;
        seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        seed ^= stream.wrapping_mul(1103515245);
        seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        seed ^= day.wrapping_mul(69069);
        seed
    }
}
