//! Read-only views of an engine for renderers and tests.

use crate::engine::Tetromino;
use crate::types::{Grid, PieceKind, Rotation, EMPTY_GRID, SPAWN_X, SPAWN_Y};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl From<Tetromino> for ActiveSnapshot {
    fn from(value: Tetromino) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
        }
    }
}

impl ActiveSnapshot {
    /// Absolute (x, y) positions of the four blocks.
    pub fn blocks(&self) -> [(i8, i8); 4] {
        Tetromino {
            kind: self.kind,
            rotation: self.rotation,
            x: self.x,
            y: self.y,
        }
        .blocks()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngineSnapshot {
    pub board: Grid,
    pub current: ActiveSnapshot,
    pub ghost_y: Option<i8>,
    pub next: PieceKind,
    pub seed: u32,
    pub spawn_counter: u32,
    pub score: u32,
    pub lines: u32,
    pub game_over: bool,
}

impl EngineSnapshot {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn playable(&self) -> bool {
        !self.game_over
    }
}

impl Default for EngineSnapshot {
    fn default() -> Self {
        Self {
            board: EMPTY_GRID,
            current: ActiveSnapshot {
                kind: PieceKind::I,
                rotation: Rotation::North,
                x: SPAWN_X,
                y: SPAWN_Y,
            },
            ghost_y: None,
            next: PieceKind::I,
            seed: 0,
            spawn_counter: 0,
            score: 0,
            lines: 0,
            game_over: false,
        }
    }
}
