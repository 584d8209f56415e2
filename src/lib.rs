//! Tetris duel (workspace facade crate).
//!
//! Re-exports the member crates under short names and holds the pieces of
//! the terminal client that are worth testing without a terminal.

pub use tetris_duel_core as core;
pub use tetris_duel_input as input;
pub use tetris_duel_net as net;
pub use tetris_duel_session as session;
pub use tetris_duel_types as types;

pub mod cli;
pub mod screen;
pub mod view;
