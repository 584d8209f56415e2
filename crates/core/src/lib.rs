//! Simulation core - pure, deterministic, and testable
//!
//! This crate contains the rules of a single player's game and nothing else:
//! no rendering, no networking, no clocks.
//!
//! - **Deterministic**: the same seed produces the same piece sequence, which
//!   is what keeps a mirrored engine in step with its peer
//! - **Total**: illegal moves are silent no-ops, game over is a state
//! - **Allocation-free** on the hot paths (tick, move, rotate, lock)
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 grid of cell ids with permissive bounds handling
//! - [`pieces`]: static shape table
//! - [`rng`]: per-engine seeded generator
//! - [`scoring`]: points per lock
//! - [`engine`]: the simulation itself (spawn, move, rotate, tick, lock, clear)
//! - [`snapshot`]: read-only views for renderers
//!
//! # Example
//!
//! ```
//! use tetris_duel_core::{Engine, TickOutcome};
//!
//! let mut engine = Engine::new(42);
//! let x = engine.current().x;
//!
//! assert!(engine.move_piece(-1, 0));
//! assert_eq!(engine.current().x, x - 1);
//!
//! // Gravity: step until the piece locks
//! while !matches!(engine.tick(), TickOutcome::Locked(_)) {}
//! assert_eq!(engine.spawn_counter(), 2);
//! ```

pub mod board;
pub mod engine;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use tetris_duel_types as types;

pub use board::Board;
pub use engine::{ClearedRows, Engine, LockEvent, Tetromino, TickOutcome, MAX_CLEARED};
pub use pieces::{get_block, get_shape, PieceShape};
pub use rng::{fresh_seed, SimpleRng};
pub use scoring::line_clear_score;
pub use snapshot::{ActiveSnapshot, EngineSnapshot};
