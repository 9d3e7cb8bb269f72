//! Placement enumeration: every legal (shape, rotation, offset) triple

use crate::board::{Board, Shape, ShapeGrid};
use serde::{Deserialize, Serialize};

/// One concrete way of putting a shape rotation onto the board.
///
/// Created by [`enumerate_placements`]; read-only afterwards except for
/// the single decision-variable assignment made during grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Placement identity, an increasing counter over the enumeration
    pub id: usize,
    pub shape_name: String,
    /// Index into the shape's deduplicated rotation list
    pub rotation: usize,
    /// Top-left offset of the rotation's bounding box
    pub row: usize,
    pub col: usize,
    /// The occupancy grid of this rotation
    pub grid: ShapeGrid,
    /// Flat indices of the covered board cells, ascending
    pub cells: Vec<usize>,
    /// Decision variable, set exactly once during grouping
    #[serde(skip)]
    pub variable: Option<i32>,
}

/// Enumerate all valid placements of the given shapes on the board.
///
/// For each shape, each rotation and each top-left offset whose bounding
/// box fits, the rotation's occupied cells are walked; offsets touching a
/// blocked cell are rejected. Offsets iterate row-major, then
/// column-major, so placement ids are deterministic.
pub fn enumerate_placements(board: &Board, shapes: &[Shape]) -> Vec<Placement> {
    let mut placements = Vec::new();
    let mut next_id = 0;

    for shape in shapes {
        for (rotation, grid) in shape.rotations().iter().enumerate() {
            if grid.height() > board.height || grid.width() > board.width {
                continue;
            }
            for row in 0..=board.height - grid.height() {
                for col in 0..=board.width - grid.width() {
                    if let Some(cells) = covered_cells(board, grid, row, col) {
                        placements.push(Placement {
                            id: next_id,
                            shape_name: shape.name().to_string(),
                            rotation,
                            row,
                            col,
                            grid: grid.clone(),
                            cells,
                            variable: None,
                        });
                        next_id += 1;
                    }
                }
            }
        }
    }

    placements
}

/// Absolute covered cells for one offset, or `None` if any occupied cell
/// lands on a blocked board cell. The row-major walk over the rotation
/// grid yields ascending flat indices.
fn covered_cells(board: &Board, grid: &ShapeGrid, row: usize, col: usize) -> Option<Vec<usize>> {
    let mut cells = Vec::with_capacity(grid.cell_count());
    for (r, c, _) in grid.occupied() {
        if board.is_blocked(row + r, col + c) {
            return None;
        }
        cells.push(board.index(row + r, col + c));
    }
    Some(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::io::pattern_to_grid;

    fn shape(name: &str, pattern: &[&str]) -> Shape {
        let rows: Vec<String> = pattern.iter().map(|s| s.to_string()).collect();
        Shape::new(name.to_string(), pattern_to_grid(&rows).unwrap()).unwrap()
    }

    #[test]
    fn test_unit_shape_fills_open_board() {
        let board = Board::new(2, 2).unwrap();
        let placements = enumerate_placements(&board, &[shape("dot", &["x"])]);

        assert_eq!(placements.len(), 4);
        assert_eq!(placements[0].cells, vec![0]);
        assert_eq!(placements[3].cells, vec![3]);
        // Ids follow the row-major enumeration order
        let ids: Vec<usize> = placements.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_blocked_cells_are_avoided() {
        let mut board = Board::new(3, 3).unwrap();
        board.block(1, 1).unwrap();

        let placements = enumerate_placements(&board, &[shape("dot", &["x"])]);
        assert_eq!(placements.len(), 8);
        assert!(placements.iter().all(|p| !p.cells.contains(&board.index(1, 1))));
    }

    #[test]
    fn test_bounding_box_must_fit() {
        let board = Board::new(2, 2).unwrap();
        let placements = enumerate_placements(&board, &[shape("square", &["oo", "oo"])]);

        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].cells, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_rotations_enumerate_separately() {
        let board = Board::new(3, 3).unwrap();
        let placements = enumerate_placements(&board, &[shape("bar", &["iii"])]);

        // Horizontal 1x3: one offset per row; vertical 3x1: one per column
        assert_eq!(placements.len(), 6);
        assert_eq!(placements.iter().filter(|p| p.rotation == 0).count(), 3);
        assert_eq!(placements.iter().filter(|p| p.rotation == 1).count(), 3);
        // All rotation-0 placements come before rotation-1 ones
        assert!(placements[2].rotation == 0 && placements[3].rotation == 1);
    }

    #[test]
    fn test_covered_cells_within_bounds() {
        let mut board = Board::new(4, 3).unwrap();
        board.block(0, 0).unwrap();
        board.block(2, 3).unwrap();

        let shapes = [shape("ell", &["l.", "ll"]), shape("bar", &["ii"])];
        let placements = enumerate_placements(&board, &shapes);

        assert!(!placements.is_empty());
        for placement in &placements {
            for &cell in &placement.cells {
                assert!(cell < board.width * board.height);
                assert!(!board.is_blocked_index(cell));
            }
            // Cells are ascending and unique
            assert!(placement.cells.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_oversized_shape_yields_nothing() {
        let board = Board::new(2, 2).unwrap();
        let placements = enumerate_placements(&board, &[shape("bar", &["iii"])]);
        assert!(placements.is_empty());
    }
}
