//! Randomizer module - TGM history randomizer
//!
//! Pieces are drawn uniformly from the seven shapes, then re-rolled against a 4-entry history
//! of the most recent shapes:
//!
//! - The first piece after a reset is never S, Z or O (re-rolled until it isn't).
//! - The draw is then compared against each history slot in turn; on a match it is re-rolled
//!   once for that slot. A re-rolled value is not checked again against earlier slots, so a
//!   recent shape can still slip through occasionally.
//! - The history starts out filled with S and Z, which makes an early S/Z less likely.
//!
//! Also provides a simple LCG so seeded games are reproducible.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::tetromino::Tetromino;
use crate::types::ShapeKind;

/// Number of recent shapes remembered
pub const HISTORY_LEN: usize = 4;

/// History contents after a reset
pub const SEED_HISTORY: [ShapeKind; HISTORY_LEN] =
    [ShapeKind::Z, ShapeKind::Z, ShapeKind::S, ShapeKind::S];

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce a short first cycle
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max), taken from the high bits
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }
}

/// Where a reset takes its seed from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedSource {
    /// Wall-clock time at each reset
    Clock,
    /// The same seed on every reset (reproducible games)
    Fixed(u32),
}

impl SeedSource {
    fn seed(self) -> u32 {
        match self {
            SeedSource::Fixed(seed) => seed,
            SeedSource::Clock => {
                let nanos = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_nanos())
                    .unwrap_or_default();
                (nanos ^ (nanos >> 32) ^ (nanos >> 64)) as u32
            }
        }
    }
}

/// Apply the TGM selection rules to one draw.
///
/// `draw` yields uniformly random shapes. Kept separate from the RNG so the rules can be
/// exercised with scripted draws.
pub fn pick_shape(
    first_piece: bool,
    history: &[ShapeKind; HISTORY_LEN],
    mut draw: impl FnMut() -> ShapeKind,
) -> ShapeKind {
    let mut shape = draw();

    if first_piece {
        while matches!(shape, ShapeKind::S | ShapeKind::Z | ShapeKind::O) {
            shape = draw();
        }
    }

    for &recent in history {
        if shape == recent {
            shape = draw();
        }
    }

    shape
}

/// TGM piece generator
#[derive(Debug, Clone)]
pub struct Randomizer {
    history: [ShapeKind; HISTORY_LEN],
    first_piece: bool,
    source: SeedSource,
    rng: SimpleRng,
}

impl Randomizer {
    /// Randomizer seeded from the clock on every reset
    pub fn new() -> Self {
        Self::from_source(SeedSource::Clock)
    }

    /// Randomizer that replays the same sequence after every reset
    pub fn with_seed(seed: u32) -> Self {
        Self::from_source(SeedSource::Fixed(seed))
    }

    fn from_source(source: SeedSource) -> Self {
        let mut randomizer = Self {
            history: SEED_HISTORY,
            first_piece: true,
            source,
            rng: SimpleRng::new(1),
        };
        randomizer.reset();
        randomizer
    }

    /// Reseed, refill the history with the S/Z seed values and re-arm the first-piece rule.
    pub fn reset(&mut self) {
        self.rng = SimpleRng::new(self.source.seed());
        self.history = SEED_HISTORY;
        self.first_piece = true;
    }

    /// Draw the next shape and record it in the history.
    pub fn next_shape(&mut self) -> ShapeKind {
        let rng = &mut self.rng;
        let shape = pick_shape(self.first_piece, &self.history, || {
            ShapeKind::ALL[rng.next_range(ShapeKind::COUNT as u32) as usize]
        });

        self.history.rotate_right(1);
        self.history[0] = shape;
        self.first_piece = false;

        shape
    }

    /// Draw the next piece as a fresh catalog tetromino.
    pub fn next_piece(&mut self) -> Tetromino {
        Tetromino::new(self.next_shape())
    }

    /// Recent shapes, most recent first
    pub fn history(&self) -> &[ShapeKind; HISTORY_LEN] {
        &self.history
    }

    /// Whether the next draw is the first since a reset
    pub fn is_first_piece(&self) -> bool {
        self.first_piece
    }

    pub fn source(&self) -> SeedSource {
        self.source
    }
}

impl Default for Randomizer {
    fn default() -> Self {
        Self::new()
    }
}
