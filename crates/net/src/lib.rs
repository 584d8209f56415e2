//! Peer link - text protocol and TCP transport between two duel clients
//!
//! One side hosts, the other connects; after that the two are symmetric and
//! exchange `\n`-terminated text messages over a single TCP stream.
//!
//! # Protocol Overview
//!
//! 1. **Connect**: the client connects to the host (default port 7777)
//! 2. **Announce**: client sends `CLIENT_READY;P2_NAME:<name>`
//! 3. **Start**: host replies `GAME_START_HOST;SEED:<seed>;P1_NAME:<name>`;
//!    both sides reset with that seed so their piece sequences match
//! 4. **Play**: every accepted local action is relayed (`MOVE_LR`, `ROTATE`,
//!    `MOVE_DOWN`), and a `SYNC_STATE` snapshot follows every lock
//! 5. **Finish**: each side sends `PLAYER_DEAD;ID:<1|2>` once when its own
//!    game ends
//!
//! See [`protocol`] for the exact message grammar.
//!
//! # Environment Variables
//!
//! - `TETRIS_DUEL_HOST`: bind address when hosting (default `0.0.0.0`)
//! - `TETRIS_DUEL_PORT`: port (default 7777)
//! - `TETRIS_DUEL_WIRE_LOG`: append every wire line to this file as JSON
//!
//! # Testing
//!
//! Host from one terminal and talk to it with netcat:
//!
//! ```bash
//! nc 127.0.0.1 7777
//! CLIENT_READY;P2_NAME:netcat
//! ```

pub mod config;
pub mod protocol;
pub mod runtime;
pub mod transport;

pub use tetris_duel_types as types;

pub use config::{resolve_peer, NetConfig};
pub use protocol::{sanitize_name, Message, SyncState};
pub use runtime::{LinkRole, PeerLink};
pub use transport::{run_client, run_host, LinkEvent, LinkShared, WireDirection, WireLog};
