//! Shape catalog - static geometry and color for the seven tetrominoes
//!
//! Every shape lives in a square bounding box (4x4 for I and O, 3x3 for the rest). An
//! orientation is not a rotation of coordinates: it selects four cells of the box, numbered
//! row-major from the top-left:
//!
//! ```text
//! [0][1][2]    [ 0][ 1][ 2][ 3]
//! [3][4][5]    [ 4][ 5][ 6][ 7]
//! [6][7][8]    [ 8][ 9][10][11]
//!              [12][13][14][15]
//! ```

use crate::error::EngineError;
use crate::types::{Rgb, ShapeKind};

/// Four bounding-box cell indices making up one orientation
pub type Orientation = [u8; 4];

const I_ORIENTATIONS: [Orientation; 2] = [[4, 5, 6, 7], [2, 6, 10, 14]];
const O_ORIENTATIONS: [Orientation; 1] = [[5, 6, 9, 10]];
const J_ORIENTATIONS: [Orientation; 4] = [[3, 4, 5, 8], [1, 4, 7, 6], [3, 6, 7, 8], [1, 4, 7, 2]];
const L_ORIENTATIONS: [Orientation; 4] = [[3, 4, 5, 6], [1, 4, 7, 0], [5, 6, 7, 8], [1, 4, 7, 8]];
const T_ORIENTATIONS: [Orientation; 4] = [[3, 4, 5, 7], [1, 4, 7, 3], [4, 6, 7, 8], [1, 4, 7, 5]];
const S_ORIENTATIONS: [Orientation; 2] = [[6, 7, 4, 5], [0, 3, 4, 7]];
const Z_ORIENTATIONS: [Orientation; 2] = [[3, 4, 7, 8], [4, 7, 5, 2]];

/// Distinct orientations of a shape, in clockwise order starting from the spawn orientation.
pub fn orientations(kind: ShapeKind) -> &'static [Orientation] {
    match kind {
        ShapeKind::I => &I_ORIENTATIONS,
        ShapeKind::O => &O_ORIENTATIONS,
        ShapeKind::J => &J_ORIENTATIONS,
        ShapeKind::L => &L_ORIENTATIONS,
        ShapeKind::T => &T_ORIENTATIONS,
        ShapeKind::S => &S_ORIENTATIONS,
        ShapeKind::Z => &Z_ORIENTATIONS,
    }
}

/// Number of distinct orientations (I/S/Z: 2, O: 1, J/L/T: 4)
pub fn orientation_count(kind: ShapeKind) -> u8 {
    orientations(kind).len() as u8
}

/// Cells of the given 1-based orientation. Out-of-range orientations wrap cyclically.
pub fn orientation_cells(kind: ShapeKind, orientation: u8) -> Orientation {
    let table = orientations(kind);
    let slot = (orientation.max(1) as usize - 1) % table.len();
    table[slot]
}

/// Side length of the bounding box, in cells
pub fn box_size(kind: ShapeKind) -> u8 {
    match kind {
        ShapeKind::I | ShapeKind::O => 4,
        _ => 3,
    }
}

/// Fixed color of a shape
pub fn color(kind: ShapeKind) -> Rgb {
    match kind {
        ShapeKind::I => Rgb::new(0xFF, 0x00, 0x00),
        ShapeKind::J => Rgb::new(0x00, 0x00, 0xFF),
        ShapeKind::L => Rgb::new(0xEF, 0x79, 0x21),
        ShapeKind::O => Rgb::new(0xF7, 0xD3, 0x08),
        ShapeKind::T => Rgb::new(0x31, 0xC7, 0xEF),
        ShapeKind::S => Rgb::new(0xAD, 0x4D, 0x9C),
        ShapeKind::Z => Rgb::new(0x00, 0xFF, 0x00),
    }
}

/// Resolve a raw catalog id, failing on ids outside `0..7`.
pub fn shape_from_id(id: u8) -> Result<ShapeKind, EngineError> {
    ShapeKind::from_index(id).ok_or(EngineError::UnknownShape(id))
}
