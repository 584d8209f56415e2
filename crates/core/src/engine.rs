//! Engine module - one player's complete simulation
//!
//! Ties together the board, shape table, RNG and scoring. An engine is either
//! active (accepting moves, rotations and ticks) or game over, which is
//! terminal until the next [`Engine::reset`].
//!
//! Nothing in here fails: a move into a wall or another block is rejected
//! silently and leaves the state untouched, and once the game is over every
//! mutating call is a no-op.

use arrayvec::ArrayVec;
use tracing::debug;

use crate::pieces::{get_shape, PieceShape};
use crate::rng::{fresh_seed, SimpleRng};
use crate::scoring::line_clear_score;
use crate::snapshot::{ActiveSnapshot, EngineSnapshot};
use crate::types::*;
use crate::Board;

/// Upper bound on rows a single lock can clear.
pub const MAX_CLEARED: usize = BOARD_HEIGHT as usize;

/// Rows removed by one lock, in the order they were cleared.
///
/// Each entry is the row index at the moment it was cleared, so the same
/// index can appear more than once when rows shift into it.
pub type ClearedRows = ArrayVec<u8, MAX_CLEARED>;

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl Tetromino {
    /// Create a new tetromino at spawn position
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: Rotation::North,
            x: SPAWN_X,
            y: SPAWN_Y,
        }
    }

    /// Get the shape (block offsets) for current rotation
    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    /// Absolute (x, y) board positions of the four blocks
    pub fn blocks(&self) -> [(i8, i8); 4] {
        self.shape().map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Check if all blocks are at valid positions on the board
    pub fn is_valid(&self, board: &Board) -> bool {
        self.blocks().iter().all(|&(x, y)| board.is_free(x, y))
    }

    pub fn shifted(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..*self
        }
    }

    pub fn rotated_cw(&self) -> Self {
        Self {
            rotation: self.rotation.rotate_cw(),
            ..*self
        }
    }
}

/// Result of writing a piece into the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockEvent {
    pub kind: PieceKind,
    pub rows_cleared: ClearedRows,
    pub score_delta: u32,
    /// The piece spawned after this lock could not be placed.
    pub game_over: bool,
}

impl LockEvent {
    pub fn lines(&self) -> usize {
        self.rows_cleared.len()
    }
}

/// What a single [`Engine::tick`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Engine is game over; nothing changed.
    Ignored,
    /// The piece moved down one row.
    Fell,
    /// The piece could not descend and was locked; a new piece was spawned.
    Locked(LockEvent),
}

/// Complete per-player simulation state
#[derive(Debug, Clone)]
pub struct Engine {
    board: Board,
    current: Tetromino,
    next: PieceKind,
    rng: SimpleRng,
    /// Seed the current game was reset with.
    seed: u32,
    /// Incremented once per successful spawn.
    spawn_counter: u32,
    score: u32,
    lines: u32,
    game_over: bool,
}

impl Engine {
    /// Create an engine and reset it with the given seed.
    pub fn new(seed: u32) -> Self {
        let mut engine = Self {
            board: Board::new(),
            current: Tetromino::new(PieceKind::I),
            next: PieceKind::I,
            rng: SimpleRng::new(seed),
            seed,
            spawn_counter: 0,
            score: 0,
            lines: 0,
            game_over: false,
        };
        engine.reset(Some(seed));
        engine
    }

    /// Create an engine with a fresh, non-deterministic seed.
    pub fn unseeded() -> Self {
        Self::new(fresh_seed())
    }

    /// Re-initialize every piece of state and spawn the first piece.
    ///
    /// With `Some(seed)` the piece sequence is fully determined by the seed;
    /// with `None` a fresh seed is drawn.
    pub fn reset(&mut self, seed: Option<u32>) {
        let seed = seed.unwrap_or_else(fresh_seed);

        self.board.reset();
        self.rng = SimpleRng::new(seed);
        self.seed = seed;
        self.spawn_counter = 0;
        self.score = 0;
        self.lines = 0;
        self.game_over = false;

        self.next = self.rng.next_piece();
        self.spawn_piece();
    }

    /// Promote the next piece to current at the spawn position and draw a new
    /// next piece.
    ///
    /// Returns false if the engine was already over, or if the promoted piece
    /// does not fit, in which case the engine becomes game over and the board
    /// is left untouched.
    pub fn spawn_piece(&mut self) -> bool {
        if self.game_over {
            return false;
        }

        self.current = Tetromino::new(self.next);
        self.next = self.rng.next_piece();

        if !self.is_valid_position(&self.current) {
            debug!(kind = ?self.current.kind, score = self.score, "spawn blocked, game over");
            self.game_over = true;
            return false;
        }

        self.spawn_counter = self.spawn_counter.wrapping_add(1);
        true
    }

    /// Whether `piece` fits on the board: all four blocks in bounds and over
    /// empty cells.
    pub fn is_valid_position(&self, piece: &Tetromino) -> bool {
        piece.is_valid(&self.board)
    }

    /// Try to shift the current piece. Rejected moves leave the state as is.
    pub fn move_piece(&mut self, dx: i8, dy: i8) -> bool {
        if self.game_over {
            return false;
        }
        let candidate = self.current.shifted(dx, dy);
        if self.is_valid_position(&candidate) {
            self.current = candidate;
            return true;
        }
        false
    }

    /// Try to rotate the current piece clockwise. No wall kicks.
    pub fn rotate(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        let candidate = self.current.rotated_cw();
        if self.is_valid_position(&candidate) {
            self.current = candidate;
            return true;
        }
        false
    }

    /// One forced downward step: fall if possible, otherwise lock the piece,
    /// clear rows and spawn the next piece.
    pub fn tick(&mut self) -> TickOutcome {
        if self.game_over {
            return TickOutcome::Ignored;
        }

        if self.move_piece(0, 1) {
            return TickOutcome::Fell;
        }

        let Some(mut event) = self.lock_piece() else {
            return TickOutcome::Ignored;
        };
        event.game_over = !self.spawn_piece();
        TickOutcome::Locked(event)
    }

    /// Write the current piece's blocks into the board and evaluate line
    /// clears. Does not spawn.
    ///
    /// Returns `None` if the engine is over.
    pub fn lock_piece(&mut self) -> Option<LockEvent> {
        if self.game_over {
            return None;
        }

        let kind = self.current.kind;
        for (x, y) in self.current.blocks() {
            self.board.set_cell(y as i32, x as i32, kind.id());
        }

        let score_before = self.score;
        let rows_cleared = self.check_lines();

        Some(LockEvent {
            kind,
            rows_cleared,
            score_delta: self.score - score_before,
            game_over: false,
        })
    }

    /// Remove every full row and score them as one clear.
    ///
    /// Scans bottom to top. After a row is removed the same index is examined
    /// again, since the row that shifted into it may also be full.
    pub fn check_lines(&mut self) -> ClearedRows {
        let mut cleared = ClearedRows::new();
        if self.game_over {
            return cleared;
        }

        let mut row = BOARD_HEIGHT as usize;
        while row > 0 {
            let y = row - 1;
            if self.board.is_row_full(y) {
                self.board.clear_row(y);
                if cleared.try_push(y as u8).is_err() {
                    break;
                }
                // re-examine the same index
                continue;
            }
            row -= 1;
        }

        if !cleared.is_empty() {
            let points = line_clear_score(cleared.len());
            self.score = self.score.saturating_add(points);
            self.lines = self.lines.saturating_add(cleared.len() as u32);
        }

        cleared
    }

    /// Overwrite board, score and next piece with a peer's snapshot.
    ///
    /// Last write wins; nothing is merged. A `None` next piece keeps the
    /// current one. The current piece and game-over flag are left alone.
    pub fn apply_sync(&mut self, grid: &Grid, score: u32, next: Option<PieceKind>) {
        self.board.load_grid(grid);
        self.score = score;
        if let Some(kind) = next {
            self.next = kind;
        }
        debug!(score, next = ?next, "applied sync snapshot");
    }

    /// Row the current piece would land on if dropped straight down.
    pub fn ghost_y(&self) -> Option<i8> {
        if self.game_over || !self.current.is_valid(&self.board) {
            return None;
        }
        let mut ghost = self.current;
        loop {
            let below = ghost.shifted(0, 1);
            if !below.is_valid(&self.board) {
                return Some(ghost.y);
            }
            ghost = below;
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access for setting up scenarios.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn current(&self) -> Tetromino {
        self.current
    }

    pub fn next(&self) -> PieceKind {
        self.next
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn spawn_counter(&self) -> u32 {
        self.spawn_counter
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn snapshot_into(&self, out: &mut EngineSnapshot) {
        self.board.write_grid(&mut out.board);
        out.current = ActiveSnapshot::from(self.current);
        out.ghost_y = self.ghost_y();
        out.next = self.next;
        out.seed = self.seed;
        out.spawn_counter = self.spawn_counter;
        out.score = self.score;
        out.lines = self.lines;
        out.game_over = self.game_over;
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        let mut s = EngineSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_row(engine: &mut Engine, row: i32) {
        for col in 0..BOARD_WIDTH as i32 {
            engine.board_mut().set_cell(row, col, 1);
        }
    }

    #[test]
    fn test_reset_spawns_first_piece() {
        let engine = Engine::new(7);
        assert_eq!(engine.spawn_counter(), 1);
        assert_eq!(engine.current().x, SPAWN_X);
        assert_eq!(engine.current().y, 0);
        assert_eq!(engine.current().rotation, Rotation::North);
        assert!(!engine.is_game_over());
        assert_eq!(engine.board().filled_count(), 0);
    }

    #[test]
    fn test_tick_falls_then_locks() {
        let mut engine = Engine::new(3);
        let mut falls = 0;
        let event = loop {
            match engine.tick() {
                TickOutcome::Fell => falls += 1,
                TickOutcome::Locked(event) => break event,
                TickOutcome::Ignored => panic!("fresh engine ignored a tick"),
            }
            assert!(falls < 40, "piece never locked");
        };

        assert!(falls >= 16);
        assert_eq!(event.lines(), 0);
        assert!(!event.game_over);
        assert_eq!(engine.board().filled_count(), 4);
        assert_eq!(engine.spawn_counter(), 2);
    }

    #[test]
    fn test_check_lines_rechecks_shifted_row() {
        let mut engine = Engine::new(1);
        fill_row(&mut engine, 19);
        fill_row(&mut engine, 18);
        fill_row(&mut engine, 16);
        engine.board_mut().set_cell(17, 4, 2);

        let cleared = engine.check_lines();
        assert_eq!(cleared.len(), 3);
        assert_eq!(engine.score(), 500);
        assert_eq!(engine.lines(), 3);
        assert_eq!(engine.board().get_cell(19, 4), 2);
        assert_eq!(engine.board().filled_count(), 1);
    }

    #[test]
    fn test_game_over_is_sticky() {
        let mut engine = Engine::new(5);
        for row in 0..4 {
            for col in 0..BOARD_WIDTH as i32 {
                if col != 0 {
                    engine.board_mut().set_cell(row, col, 6);
                }
            }
        }
        assert!(!engine.spawn_piece());
        assert!(engine.is_game_over());

        let before = engine.snapshot();
        assert!(!engine.move_piece(-1, 0));
        assert!(!engine.rotate());
        assert_eq!(engine.tick(), TickOutcome::Ignored);
        assert!(engine.lock_piece().is_none());
        assert_eq!(engine.snapshot(), before);

        engine.reset(Some(5));
        assert!(!engine.is_game_over());
        assert_eq!(engine.board().filled_count(), 0);
    }

    #[test]
    fn test_is_valid_position_checks_walls_and_cells() {
        let mut engine = Engine::new(2);
        let piece = engine.current();
        assert!(engine.is_valid_position(&piece));
        assert!(!engine.is_valid_position(&piece.shifted(-(SPAWN_X + 4), 0)));
        assert!(!engine.is_valid_position(&piece.shifted(0, BOARD_HEIGHT as i8)));

        let (x, y) = piece.blocks()[0];
        engine.board_mut().set_cell(y as i32, x as i32, 1);
        assert!(!engine.is_valid_position(&piece));
    }

    #[test]
    fn test_apply_sync_overwrites_wholesale() {
        let mut engine = Engine::new(9);
        let mut grid = EMPTY_GRID;
        grid[19] = [7; BOARD_WIDTH as usize];
        grid[19][0] = 0;

        engine.apply_sync(&grid, 1234, Some(PieceKind::Z));
        assert_eq!(engine.board().grid(), grid);
        assert_eq!(engine.score(), 1234);
        assert_eq!(engine.next(), PieceKind::Z);

        engine.apply_sync(&EMPTY_GRID, 0, None);
        assert_eq!(engine.next(), PieceKind::Z);
        assert_eq!(engine.board().filled_count(), 0);
    }

    #[test]
    fn test_ghost_y_reaches_floor_on_empty_board() {
        let engine = Engine::new(11);
        let ghost = engine.ghost_y().unwrap();
        let lowest = engine
            .current()
            .shape()
            .iter()
            .map(|&(_, dy)| dy)
            .max()
            .unwrap();
        assert_eq!(ghost + lowest, BOARD_HEIGHT as i8 - 1);
    }
}
