//! Scoring module - points awarded per lock
//!
//! A single lock that clears `n` rows awards:
//!
//! | Rows | Points |
//! |------|--------|
//! | 0 | 0 |
//! | 1 | 100 |
//! | 2 | 300 |
//! | 3 | 500 |
//! | 4 | 800 |
//! | n > 4 | 100 * n |
//!
//! There is no level multiplier, combo or T-spin bonus.

/// Points for clearing 0..=4 rows in one lock.
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Points per row when more than four rows clear at once.
pub const PER_LINE_FALLBACK: u32 = 100;

/// Score awarded for clearing `lines` rows in a single lock.
pub fn line_clear_score(lines: usize) -> u32 {
    match LINE_SCORES.get(lines) {
        Some(&points) => points,
        None => PER_LINE_FALLBACK.saturating_mul(lines as u32),
    }
}
