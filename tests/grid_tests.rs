//! Grid tests - line clears, collision and spawn points

use tgm_tetris::core::{EngineError, Grid, Tetromino};
use tgm_tetris::types::{
    Rect, Rgb, ShapeKind, CELL_SIZE, GRID_HEIGHT, GRID_ORIGIN_X, GRID_ORIGIN_Y, GRID_WIDTH,
};

const GRAY: Rgb = Rgb::new(0x80, 0x80, 0x80);
const MARK: Rgb = Rgb::new(0x12, 0x34, 0x56);

fn standard() -> Grid {
    Grid::new(GRID_ORIGIN_X, GRID_ORIGIN_Y, CELL_SIZE, GRID_WIDTH, GRID_HEIGHT).unwrap()
}

fn fill_row(grid: &mut Grid, row: usize) {
    for col in 0..grid.width() {
        grid.fill(row, col, GRAY);
    }
}

#[test]
fn test_grid_rejects_bad_dimensions() {
    assert_eq!(
        Grid::new(0, 0, 20, 0, 20).unwrap_err(),
        EngineError::InvalidGridSize {
            width: 0,
            height: 20
        }
    );
    assert_eq!(
        Grid::new(0, 0, 0, 10, 20).unwrap_err(),
        EngineError::InvalidCellSize(0)
    );
}

#[test]
fn test_spawn_points_above_column_three() {
    let grid = standard();
    assert_eq!(grid.spawn_point(), (GRID_ORIGIN_X + 3 * CELL_SIZE, -CELL_SIZE));
    assert_eq!(
        grid.alt_spawn_point(),
        (GRID_ORIGIN_X + 3 * CELL_SIZE, -3 * CELL_SIZE)
    );
}

#[test]
fn test_single_clear_cascades_rows_above() {
    let mut grid = standard();
    fill_row(&mut grid, 19);
    grid.fill(18, 2, MARK);
    grid.fill(5, 7, MARK);
    let geometry = grid.cell(19, 2).unwrap().rect;

    assert_eq!(grid.clear_full_rows(), 1);

    let moved = grid.cell(19, 2).unwrap();
    assert!(moved.occupied);
    assert_eq!(moved.color, MARK);
    assert_eq!(moved.rect, geometry);
    assert!(grid.is_occupied(6, 7));
    assert!(!grid.is_occupied(18, 2));
    assert!(!grid.is_occupied(5, 7));
    assert!(grid.row(0).iter().all(|c| !c.occupied));
}

#[test]
fn test_split_clear_keeps_gap_row() {
    let mut grid = standard();
    fill_row(&mut grid, 17);
    fill_row(&mut grid, 19);
    grid.fill(18, 4, MARK);
    grid.fill(16, 0, MARK);

    assert_eq!(grid.clear_full_rows(), 2);

    assert!(grid.is_occupied(19, 4));
    assert!(grid.is_occupied(18, 0));
    let occupied = grid.cells().iter().filter(|c| c.occupied).count();
    assert_eq!(occupied, 2);
}

#[test]
fn test_clearing_everything_leaves_empty_grid() {
    let mut grid = standard();
    for row in 16..20 {
        fill_row(&mut grid, row);
    }
    assert_eq!(grid.clear_full_rows(), 4);
    assert!(grid.is_empty());
    assert_eq!(grid.clear_full_rows(), 0);
}

#[test]
fn test_walls_and_floor_but_open_top() {
    let grid = standard();
    let size = CELL_SIZE;
    let left = Rect::new(GRID_ORIGIN_X - size, 0, size, size);
    let right = Rect::new(GRID_ORIGIN_X + GRID_WIDTH as i32 * size, 0, size, size);
    let below = Rect::new(GRID_ORIGIN_X, GRID_HEIGHT as i32 * size, size, size);
    let above = Rect::new(GRID_ORIGIN_X, -3 * size, size, size);

    assert!(grid.is_outside(&left));
    assert!(grid.is_outside(&right));
    assert!(grid.is_outside(&below));
    assert!(!grid.is_outside(&above));
    assert!(!grid.collides(&[above]));
}

#[test]
fn test_overlap_is_area_based() {
    let mut grid = standard();
    grid.fill(5, 4, GRAY);
    let cell = grid.cell(5, 4).unwrap().rect;

    // exactly on top of the locked cell
    assert!(grid.overlaps_occupied(&cell));
    // the cell above only touches the edge
    let touching = Rect::new(cell.x, cell.y - CELL_SIZE, CELL_SIZE, CELL_SIZE);
    assert!(!grid.overlaps_occupied(&touching));
    // half a cell lower shares area
    let straddling = Rect::new(cell.x, cell.y - CELL_SIZE / 2, CELL_SIZE, CELL_SIZE);
    assert!(grid.overlaps_occupied(&straddling));
}

#[test]
fn test_piece_collision_matches_its_blocks() {
    let mut grid = standard();
    grid.fill(10, 5, GRAY);

    let mut piece = Tetromino::new(ShapeKind::T);
    piece.resize(CELL_SIZE);
    let (x, _) = grid.spawn_point();

    for row in 0..GRID_HEIGHT as i32 {
        for dx in -4..8 {
            piece.move_to(x + dx * CELL_SIZE, GRID_ORIGIN_Y + row * CELL_SIZE);
            let blocks = piece.blocks();
            let expected = blocks.iter().any(|b| grid.is_outside(b))
                || blocks.iter().any(|b| {
                    grid.cells()
                        .iter()
                        .any(|c| c.occupied && c.rect == *b)
                });
            assert_eq!(grid.collides(&blocks), expected, "row {row} dx {dx}");
        }
    }
}

#[test]
fn test_occupy_matching_requires_exact_cell() {
    let mut grid = standard();
    let cell = grid.cell(3, 3).unwrap().rect;

    let offset = Rect::new(cell.x + 1, cell.y, cell.w, cell.h);
    assert!(!grid.occupy_matching(&offset, GRAY));
    let spawn_row = Rect::new(cell.x, -CELL_SIZE, CELL_SIZE, CELL_SIZE);
    assert!(!grid.occupy_matching(&spawn_row, GRAY));

    assert!(grid.occupy_matching(&cell, GRAY));
    assert!(grid.is_occupied(3, 3));
    assert_eq!(grid.cells().iter().filter(|c| c.occupied).count(), 1);
}
