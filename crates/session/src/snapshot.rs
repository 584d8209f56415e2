//! Read-only view of a whole match for renderers.

use tetris_duel_core::EngineSnapshot;
use tetris_duel_types::PlayerId;

use crate::session::{Outcome, Phase, Role};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSnapshot {
    pub role: Role,
    pub phase: Phase,
    pub local_id: PlayerId,
    pub local: EngineSnapshot,
    /// Mirror of the opponent.
    pub remote: EngineSnapshot,
    pub local_name: String,
    pub peer_name: String,
    pub local_dead: bool,
    pub remote_dead: bool,
    pub outcome: Option<Outcome>,
}

impl MatchSnapshot {
    pub fn player(&self, id: PlayerId) -> &EngineSnapshot {
        if id == self.local_id {
            &self.local
        } else {
            &self.remote
        }
    }

    pub fn is_dead(&self, id: PlayerId) -> bool {
        if id == self.local_id {
            self.local_dead
        } else {
            self.remote_dead
        }
    }

    pub fn name(&self, id: PlayerId) -> &str {
        if id == self.local_id {
            &self.local_name
        } else {
            &self.peer_name
        }
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.outcome.and_then(Outcome::winner)
    }
}
