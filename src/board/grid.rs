//! Board representation: a rectangular grid with permanently blocked cells

use anyhow::Result;
use std::collections::HashSet;

/// The playing field placements are packed onto.
///
/// Cells are addressed as zero-based `(row, col)` and flattened to
/// `row * width + col` wherever a dense index is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub width: usize,
    pub height: usize,
    blocked: HashSet<usize>,
}

impl Board {
    /// Create a new board with no blocked cells
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            anyhow::bail!("Board dimensions must be positive, got {}x{}", width, height);
        }
        Ok(Self {
            width,
            height,
            blocked: HashSet::new(),
        })
    }

    /// Convert 2D coordinates to the flat cell index
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// Check whether coordinates are inside the board
    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width
    }

    /// Mark a cell as permanently blocked
    pub fn block(&mut self, row: usize, col: usize) -> Result<()> {
        if !self.in_bounds(row, col) {
            anyhow::bail!(
                "Cell ({}, {}) out of bounds for {}x{} board",
                row,
                col,
                self.height,
                self.width
            );
        }
        self.blocked.insert(self.index(row, col));
        Ok(())
    }

    /// Check whether a cell is blocked
    pub fn is_blocked(&self, row: usize, col: usize) -> bool {
        self.blocked.contains(&self.index(row, col))
    }

    /// Check whether a flat cell index is blocked
    pub fn is_blocked_index(&self, cell: usize) -> bool {
        self.blocked.contains(&cell)
    }

    /// Number of blocked cells
    pub fn blocked_count(&self) -> usize {
        self.blocked.len()
    }

    /// Number of cells available for covering
    pub fn usable_cells(&self) -> usize {
        self.width * self.height - self.blocked.len()
    }

    /// All non-blocked flat cell indices in row-major order
    pub fn free_cells(&self) -> Vec<usize> {
        (0..self.width * self.height)
            .filter(|cell| !self.blocked.contains(cell))
            .collect()
    }
}
