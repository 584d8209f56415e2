//! Terminal input.
//!
//! Maps `crossterm` key events onto [`GameAction`](crate::types::GameAction)s
//! and the few out-of-game commands the terminal client understands. Every
//! key press is one discrete action; there is no auto-repeat handling beyond
//! what the terminal itself sends.

pub mod map;

pub use tetris_duel_types as types;

pub use map::{handle_key_event, is_press, map_key, should_quit, KeyCommand};
