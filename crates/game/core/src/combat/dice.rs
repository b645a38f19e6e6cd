use crate::env::{RngOracle, compute_seed};

/// Sequential draws from one `(game_seed, nonce)` pair.
///
/// Each call advances an internal draw counter, so the n-th draw of a round
/// is the same on every replay of that round.
pub struct Dice<'a> {
    rng: &'a dyn RngOracle,
    game_seed: u64,
    nonce: u64,
    stream: u32,
    draw: u32,
}

impl<'a> Dice<'a> {
    pub fn new(rng: &'a dyn RngOracle, game_seed: u64, nonce: u64) -> Self {
        Self {
            rng,
            game_seed,
            nonce,
            stream: 0,
            draw: 0,
        }
    }

    /// Same seed and nonce, independent sequence.
    pub fn with_stream(mut self, stream: u32) -> Self {
        self.stream = stream;
        self.draw = 0;
        self
    }

    pub fn next_u32(&mut self) -> u32 {
        let seed = compute_seed(self.game_seed, self.nonce, self.stream, self.draw);
        self.draw = self.draw.wrapping_add(1);
        self.rng.next_u32(seed)
    }

    /// Uniform value in `0..bound`; 0 when `bound` is 0.
    pub fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.next_u32() % bound
    }

    /// Multiplier in `[1 - pct/100, 1 + pct/100]` with permille resolution.
    pub fn jitter(&mut self, pct: u32) -> f64 {
        let span = pct.saturating_mul(20).saturating_add(1);
        let offset = self.below(span);
        let permille = 1000 - i64::from(pct.min(100)) * 10 + i64::from(offset);
        permille as f64 / 1000.0
    }

    /// True with probability `rate` (four decimal places).
    pub fn chance(&mut self, rate: f64) -> bool {
        let roll = self.below(10_000) as f64 / 10_000.0;
        roll < rate
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> u32 {
        self.draw
    }
}

impl core::fmt::Debug for Dice<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Dice")
            .field("game_seed", &self.game_seed)
            .field("nonce", &self.nonce)
            .field("stream", &self.stream)
            .field("draw", &self.draw)
            .finish()
    }
}
