//! Pieces module - tetromino shape table
//!
//! Each (kind, rotation) maps to four block offsets `(dx, dy)` = (col, row)
//! relative to the top-left of the piece's bounding box. I uses a 4x4 box,
//! O a fixed 2x2 footprint inside a 4-wide box, everything else 3x3.
//!
//! The table is static data. Collision and lock behavior depend on every
//! entry, so do not reorder or normalize the offsets.

use crate::types::{PieceKind, Rotation};

/// Offset of a single block relative to piece origin
pub type BlockOffset = (i8, i8);

/// Shape of a piece - 4 block offsets from piece origin
pub type PieceShape = [BlockOffset; 4];

/// Get the shape (block offsets) for a piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    match kind {
        PieceKind::I => get_i_shape(rotation),
        PieceKind::O => get_o_shape(rotation),
        PieceKind::T => get_t_shape(rotation),
        PieceKind::S => get_s_shape(rotation),
        PieceKind::Z => get_z_shape(rotation),
        PieceKind::J => get_j_shape(rotation),
        PieceKind::L => get_l_shape(rotation),
    }
}

/// Offset of block `index` (taken mod 4) for the given kind and rotation.
pub fn get_block(kind: PieceKind, rotation: Rotation, index: usize) -> BlockOffset {
    get_shape(kind, rotation)[index % 4]
}

/// Width and height of the bounding box a kind is laid out in.
pub fn bounding_box(kind: PieceKind) -> (u8, u8) {
    match kind {
        PieceKind::I => (4, 4),
        PieceKind::O => (4, 2),
        _ => (3, 3),
    }
}

/// I piece shapes
fn get_i_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        // horizontal, row 1
        Rotation::North => [(0, 1), (1, 1), (2, 1), (3, 1)],
        // vertical, column 2
        Rotation::East => [(2, 0), (2, 1), (2, 2), (2, 3)],
        // horizontal, row 2
        Rotation::South => [(0, 2), (1, 2), (2, 2), (3, 2)],
        // vertical, column 1
        Rotation::West => [(1, 0), (1, 1), (1, 2), (1, 3)],
    }
}

/// O piece shapes (same for all rotations)
fn get_o_shape(_rotation: Rotation) -> PieceShape {
    [(1, 0), (2, 0), (1, 1), (2, 1)]
}

/// T piece shapes
fn get_t_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (1, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (1, 2)],
    }
}

/// S piece shapes
fn get_s_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (2, 0), (0, 1), (1, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (2, 2)],
        Rotation::South => [(1, 1), (2, 1), (0, 2), (1, 2)],
        Rotation::West => [(0, 0), (0, 1), (1, 1), (1, 2)],
    }
}

/// Z piece shapes
fn get_z_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (1, 0), (1, 1), (2, 1)],
        Rotation::East => [(2, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (1, 2), (2, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (0, 2)],
    }
}

/// J piece shapes
fn get_j_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (2, 0), (1, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (2, 2)],
        Rotation::West => [(1, 0), (1, 1), (0, 2), (1, 2)],
    }
}

/// L piece shapes
fn get_l_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(2, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (1, 2), (2, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (0, 2)],
        Rotation::West => [(0, 0), (1, 0), (1, 1), (1, 2)],
    }
}
