//! RNG module - seeded piece generation
//!
//! Each engine owns its own generator, seeded from the match seed. Two engines
//! reset with the same seed draw the same piece sequence, which is what lets a
//! mirrored engine follow its peer without the piece types being sent.
//!
//! The generator is a plain 32-bit LCG so the sequence is identical on every
//! platform and toolchain.

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // (a * state + c) mod 2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Scales by the high bits; the low bits of an LCG have short periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Draw a piece kind uniformly from the seven playable kinds.
    pub fn next_piece(&mut self) -> PieceKind {
        PieceKind::ALL[self.next_range(PieceKind::ALL.len() as u32) as usize]
    }
}

/// A fresh, non-deterministic seed for a new match.
pub fn fresh_seed() -> u32 {
    fastrand::u32(..)
}
