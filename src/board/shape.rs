//! Shape catalog entries and their rotation variants

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// One occupied cell of a shape pattern: a kind tag (the catalog
/// character) plus the cell's own quarter-turn orientation, incremented
/// each time the containing grid is rotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeCell {
    pub kind: char,
    pub orientation: u8,
}

/// A rectangular occupancy pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeGrid {
    cells: Vec<Vec<Option<ShapeCell>>>,
}

impl ShapeGrid {
    /// Build a grid from rows, verifying the pattern is rectangular
    pub fn from_rows(cells: Vec<Vec<Option<ShapeCell>>>) -> Result<Self> {
        if cells.is_empty() {
            anyhow::bail!("Shape pattern cannot be empty");
        }
        let width = cells[0].len();
        if width == 0 {
            anyhow::bail!("Shape pattern rows cannot be empty");
        }
        for (i, row) in cells.iter().enumerate() {
            if row.len() != width {
                anyhow::bail!(
                    "Shape pattern row {} has length {}, expected {}",
                    i,
                    row.len(),
                    width
                );
            }
        }
        Ok(Self { cells })
    }

    pub fn width(&self) -> usize {
        self.cells[0].len()
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<ShapeCell> {
        self.cells.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    /// All occupied positions with their cells, row-major
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, ShapeCell)> + '_ {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(c, cell)| cell.map(|cell| (r, c, cell)))
        })
    }

    /// Number of occupied cells
    pub fn cell_count(&self) -> usize {
        self.occupied().count()
    }

    /// Rotate the pattern 90 degrees clockwise, advancing each cell's
    /// orientation by one quarter turn
    pub fn rotated(&self) -> ShapeGrid {
        let height = self.height();
        let width = self.width();
        let mut rotated = vec![vec![None; height]; width];
        for (r, c, cell) in self.occupied() {
            rotated[c][height - 1 - r] = Some(ShapeCell {
                kind: cell.kind,
                orientation: (cell.orientation + 1) % 4,
            });
        }
        Self { cells: rotated }
    }

    /// Positional signature: the sorted occupied positions, ignoring cell
    /// kinds and orientations. Rotations that coincide positionally are
    /// considered the same variant.
    pub fn signature(&self) -> Vec<(usize, usize)> {
        let mut positions: Vec<(usize, usize)> =
            self.occupied().map(|(r, c, _)| (r, c)).collect();
        positions.sort_unstable();
        positions
    }
}

/// A catalog shape: name, base pattern, and its deduplicated 90-degree
/// rotation variants (between 1 and 4 grids). Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    name: String,
    base: ShapeGrid,
    rotations: Vec<ShapeGrid>,
}

impl Shape {
    pub fn new(name: String, base: ShapeGrid) -> Result<Self> {
        if base.cell_count() == 0 {
            anyhow::bail!("Shape '{}' has no occupied cells", name);
        }

        let mut rotations = Vec::with_capacity(4);
        let mut signatures = Vec::with_capacity(4);
        let mut grid = base.clone();
        for _ in 0..4 {
            let signature = grid.signature();
            if !signatures.contains(&signature) {
                signatures.push(signature);
                rotations.push(grid.clone());
            }
            grid = grid.rotated();
        }

        Ok(Self {
            name,
            base,
            rotations,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(&self) -> &ShapeGrid {
        &self.base
    }

    /// The unique rotation variants, in rotation order starting from the
    /// base pattern
    pub fn rotations(&self) -> &[ShapeGrid] {
        &self.rotations
    }

    /// Occupied cells per instance (identical across rotations)
    pub fn cell_count(&self) -> usize {
        self.base.cell_count()
    }
}
