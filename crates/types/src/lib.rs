//! Shared types and constants for the duel engine.
//!
//! Everything in here is plain data with no dependencies, so it can be used by
//! the simulation core, the wire protocol, the session layer and any renderer.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19)
//! - **Spawn column**: `BOARD_WIDTH / 2 - 2` (= 3), row 0, rotation 0
//!
//! # Cell Encoding
//!
//! Board cells are stored as `u8`:
//!
//! | Value | Meaning |
//! |-------|---------|
//! | 0 | Empty |
//! | 1-7 | Locked cell of the given [`PieceKind`] (I, O, T, S, Z, J, L) |
//!
//! The same numbering is used on the wire (`NEXT:` and `BOARD:` fields).
//!
//! # Examples
//!
//! ```
//! use tetris_duel_types::{PieceKind, PlayerId, Rotation, BOARD_WIDTH, SPAWN_X};
//!
//! assert_eq!(PieceKind::from_id(3), Some(PieceKind::T));
//! assert_eq!(PieceKind::from_id(0), None);
//! assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
//! assert_eq!(PlayerId::One.other(), PlayerId::Two);
//! assert_eq!(SPAWN_X, BOARD_WIDTH as i8 / 2 - 2);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Number of cells in a board, row-major.
pub const BOARD_CELLS: usize = BOARD_WIDTH as usize * BOARD_HEIGHT as usize;

/// Spawn column of a new piece's bounding box.
pub const SPAWN_X: i8 = BOARD_WIDTH as i8 / 2 - 2;

/// Spawn row of a new piece's bounding box.
pub const SPAWN_Y: i8 = 0;

/// Highest value a board cell may hold.
pub const MAX_CELL: u8 = 7;

/// Sentinel returned by out-of-bounds cell reads.
pub const OUT_OF_BOUNDS: i8 = -1;

/// Frame interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Default gravity interval: one forced downward step per second.
pub const GRAVITY_MS: u32 = 1000;

/// Default TCP port for hosting a match.
pub const DEFAULT_PORT: u16 = 7777;

/// Longest display name carried on the wire.
pub const MAX_NAME_LEN: usize = 32;

/// A full board grid, `grid[row][col]`.
pub type Grid = [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];

/// Empty grid constant.
pub const EMPTY_GRID: Grid = [[0; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];

/// The seven tetromino piece kinds.
///
/// The discriminant doubles as the board cell value and the wire id, so the
/// order here is load-bearing: I=1, O=2, T=3, S=4, Z=5, J=6, L=7. The NONE
/// sentinel (0) is represented as `Option::<PieceKind>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    I = 1,
    O = 2,
    T = 3,
    S = 4,
    Z = 5,
    J = 6,
    L = 7,
}

impl PieceKind {
    /// All playable kinds in id order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Cell / wire id (1-7).
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Look up a kind by cell / wire id. `0` and anything above 7 yield `None`.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1..=7 => Some(Self::ALL[(id - 1) as usize]),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
        }
    }
}

/// Rotation states, clockwise from spawn.
///
/// - **North**: Spawn orientation (index 0)
/// - **East**: Rotated 90° clockwise (index 1)
/// - **South**: Rotated 180° (index 2)
/// - **West**: Rotated 270° clockwise (index 3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// ```
    /// use tetris_duel_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::East.rotate_cw(), Rotation::South);
    /// assert_eq!(Rotation::South.rotate_cw(), Rotation::West);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }
}

/// Local player actions accepted by the session layer.
///
/// Gravity is not an action; it is driven by the session's timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// One forced downward step (locks if the piece cannot descend)
    SoftDrop,
    /// Forced downward steps until the piece locks
    HardDrop,
}

/// Player slot in a match. The host is always player 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    /// Wire id (1 or 2).
    pub fn id(self) -> u8 {
        match self {
            PlayerId::One => 1,
            PlayerId::Two => 2,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(PlayerId::One),
            2 => Some(PlayerId::Two),
            _ => None,
        }
    }

    pub fn other(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }
}
