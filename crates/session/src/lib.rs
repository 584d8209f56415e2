//! Session coordinator - one local player against one remote mirror
//!
//! Glues two [`Engine`](tetris_duel_core::Engine)s to the peer link without
//! touching the network itself:
//!
//! - local key input and gravity drive the local engine, and every accepted
//!   action is queued for the peer
//! - messages from the peer drive the mirrored engine only
//! - `SYNC_STATE` overwrites the mirror wholesale
//! - each player's death is announced once; when both are out the higher
//!   score wins
//!
//! Each frame the driver calls [`Session::frame`] with the link events that
//! arrived, the keys pressed and the time elapsed, then sends what it
//! returns.
//!
//! ```
//! use tetris_duel_net::{LinkEvent, Message};
//! use tetris_duel_session::{Phase, Role, Session, SessionConfig};
//! use tetris_duel_types::GameAction;
//!
//! let mut host = Session::new(Role::Host, SessionConfig::default().with_seed(42));
//! host.handle_message(Message::client_ready("Bob"));
//! assert_eq!(host.phase(), Phase::Active);
//!
//! let out = host.frame(Vec::<LinkEvent>::new(), [GameAction::MoveLeft], 16);
//! assert_eq!(out, vec![Message::game_start(42, "Player"), Message::move_lr(-1)]);
//! ```

pub mod config;
pub mod session;
pub mod snapshot;

pub use config::SessionConfig;
pub use session::{Outcome, Phase, Role, Session};
pub use snapshot::MatchSnapshot;
