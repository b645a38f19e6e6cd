//! Deterministic random source for strike rolls, damage jitter and loot.
//!
//! Every draw is a pure function of `(game_seed, nonce, stream, draw)`, so a
//! round replayed with the same seed and nonce produces identical results.

/// RNG oracle: maps a 64-bit seed to a 32-bit value.
///
/// Implementations must be deterministic.
pub trait RngOracle: Send + Sync {
    fn next_u32(&self, seed: u64) -> u32;

    /// Value in `0..bound`. A zero bound yields 0.
    fn below(&self, seed: u64, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.next_u32(seed) % bound
    }

    /// Value in `[min, max]` inclusive.
    fn range(&self, seed: u64, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        min + self.below(seed, max - min + 1)
    }
}

/// PCG-XSH-RR output over a single LCG step of the seed.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::output(Self::step(seed))
    }
}

/// Mixes the draw coordinates into one seed.
///
/// * `game_seed` - fixed for the lifetime of the runtime
/// * `nonce` - bumped once per resolved round or technique
/// * `stream` - separates independent consumers within one nonce
/// * `draw` - position within the stream
pub fn compute_seed(game_seed: u64, nonce: u64, stream: u32, draw: u32) -> u64 {
    let mut hash = game_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (stream as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (draw as u64).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}
