//! Per-cell collision index over decision elements

use super::symmetry::SolveElement;
use crate::board::Board;

/// For every board cell, the decision variables of the elements covering
/// it. Drives both the shared collision clauses and the per-iteration
/// cell-coverage link clauses.
#[derive(Debug)]
pub struct CollisionIndex {
    buckets: Vec<Vec<i32>>,
}

impl CollisionIndex {
    pub fn build(board: &Board, elements: &[SolveElement]) -> Self {
        let mut buckets = vec![Vec::new(); board.width * board.height];
        for element in elements {
            let variable = element.variable();
            for &cell in element.cells() {
                let bucket = &mut buckets[cell];
                if !bucket.contains(&variable) {
                    bucket.push(variable);
                }
            }
        }
        Self { buckets }
    }

    /// Variables of the elements covering this flat cell index
    pub fn bucket(&self, cell: usize) -> &[i32] {
        &self.buckets[cell]
    }

    /// Buckets claimed by two or more elements, in cell order
    pub fn contested(&self) -> impl Iterator<Item = &[i32]> {
        self.buckets
            .iter()
            .filter(|bucket| bucket.len() >= 2)
            .map(|bucket| bucket.as_slice())
    }

    pub fn contested_count(&self) -> usize {
        self.buckets.iter().filter(|b| b.len() >= 2).count()
    }
}
