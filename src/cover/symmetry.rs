//! Symmetry-based grouping of placements into decision elements
//!
//! Placements that are images of one another under the selected
//! symmetry's generating transforms are merged into one decision element,
//! shrinking the CNF instance while forcing symmetric solutions. Orbits
//! whose members overlap cannot be selected as a unit; the soft policy
//! splits them back into independent placements, the hard policy drops
//! them entirely. Either way a structured warning is surfaced.

use super::placement::Placement;
use super::solution::SolveWarning;
use crate::board::Board;
use crate::config::SymmetryMode;
use crate::sat::VariableAllocator;
use std::collections::{HashMap, HashSet, VecDeque};

/// A generating point transform of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    Identity,
    ReflectHorizontal,
    ReflectVertical,
    Rotate180,
    Rotate90,
}

/// The generating transform set for a symmetry mode. Repeated BFS
/// application explores the full orbit, so `Rotate90` alone reaches the
/// 180 and 270 degree images.
pub fn generating_transforms(mode: SymmetryMode) -> &'static [Transform] {
    match mode {
        SymmetryMode::None => &[Transform::Identity],
        SymmetryMode::Horizontal => &[Transform::ReflectHorizontal],
        SymmetryMode::Vertical => &[Transform::ReflectVertical],
        SymmetryMode::Quadrants => &[Transform::ReflectHorizontal, Transform::ReflectVertical],
        SymmetryMode::Rotational180 => &[Transform::Rotate180],
        SymmetryMode::Rotational90 => &[Transform::Rotate90],
    }
}

impl Transform {
    /// Map a zero-based cell through this transform. Returns `None` when
    /// the image falls outside the board, which can only happen for the
    /// quarter rotation on non-square boards.
    pub fn apply(&self, board: &Board, row: usize, col: usize) -> Option<(usize, usize)> {
        let (width, height) = (board.width, board.height);
        match self {
            Transform::Identity => Some((row, col)),
            Transform::ReflectHorizontal => Some((height - 1 - row, col)),
            Transform::ReflectVertical => Some((row, width - 1 - col)),
            Transform::Rotate180 => Some((height - 1 - row, width - 1 - col)),
            Transform::Rotate90 => {
                // Rotate the cell centre 90 degrees clockwise about the
                // board's geometric centre, then floor back to a cell.
                let cx = width as f64 / 2.0;
                let cy = height as f64 / 2.0;
                let dx = (col as f64 + 0.5) - cx;
                let dy = (row as f64 + 0.5) - cy;
                let x = cx + dy;
                let y = cy - dx;
                if x < 0.0 || y < 0.0 {
                    return None;
                }
                let (new_row, new_col) = (y.floor() as usize, x.floor() as usize);
                if board.in_bounds(new_row, new_col) {
                    Some((new_row, new_col))
                } else {
                    None
                }
            }
        }
    }
}

/// Transform a placement's covered-cell set. Valid only if every image
/// cell is in-bounds and unblocked and the transform is a bijection on
/// the set (image count equals original count). Returns the sorted image.
pub fn transform_cells(board: &Board, cells: &[usize], transform: Transform) -> Option<Vec<usize>> {
    let mut image = Vec::with_capacity(cells.len());
    for &cell in cells {
        let (row, col) = (cell / board.width, cell % board.width);
        let (new_row, new_col) = transform.apply(board, row, col)?;
        if board.is_blocked(new_row, new_col) {
            return None;
        }
        image.push(board.index(new_row, new_col));
    }
    image.sort_unstable();
    image.dedup();
    if image.len() != cells.len() {
        return None;
    }
    Some(image)
}

/// An orbit of ≥2 placements selected together as one decision element.
/// Members' covered cells are pairwise disjoint; the union is cached.
#[derive(Debug, Clone)]
pub struct SymmetryGroup {
    variable: i32,
    members: Vec<Placement>,
    cells: Vec<usize>,
}

impl SymmetryGroup {
    /// Build a group from orbit members, allocating its decision variable
    /// only when the members are pairwise disjoint. Overlapping members
    /// are handed back for the inconsistency policy to deal with.
    fn try_from_members(
        mut members: Vec<Placement>,
        alloc: &mut VariableAllocator,
    ) -> Result<Self, Vec<Placement>> {
        if members.len() < 2 {
            return Err(members);
        }
        match disjoint_union(&members) {
            Some(cells) => {
                let variable = alloc.fresh();
                for member in &mut members {
                    member.variable = Some(variable);
                }
                Ok(Self {
                    variable,
                    members,
                    cells,
                })
            }
            None => Err(members),
        }
    }

    pub fn variable(&self) -> i32 {
        self.variable
    }

    pub fn members(&self) -> &[Placement] {
        &self.members
    }

    /// Union of all members' covered cells, ascending
    pub fn cells(&self) -> &[usize] {
        &self.cells
    }
}

/// Union of the members' cells if they are pairwise disjoint
fn disjoint_union(members: &[Placement]) -> Option<Vec<usize>> {
    let total: usize = members.iter().map(|p| p.cells.len()).sum();
    let mut cells: Vec<usize> = members
        .iter()
        .flat_map(|p| p.cells.iter().copied())
        .collect();
    cells.sort_unstable();
    cells.dedup();
    (cells.len() == total).then_some(cells)
}

/// Anything owning exactly one CNF decision variable
#[derive(Debug, Clone)]
pub enum SolveElement {
    Single { variable: i32, placement: Placement },
    Group(SymmetryGroup),
}

impl SolveElement {
    pub fn variable(&self) -> i32 {
        match self {
            SolveElement::Single { variable, .. } => *variable,
            SolveElement::Group(group) => group.variable(),
        }
    }

    /// The covered board cells this element would claim if selected
    pub fn cells(&self) -> &[usize] {
        match self {
            SolveElement::Single { placement, .. } => &placement.cells,
            SolveElement::Group(group) => group.cells(),
        }
    }

    /// All placements selected when this element's variable is true
    pub fn placements(&self) -> &[Placement] {
        match self {
            SolveElement::Single { placement, .. } => std::slice::from_ref(placement),
            SolveElement::Group(group) => group.members(),
        }
    }
}

/// Output of the grouping stage
#[derive(Debug)]
pub struct Grouping {
    pub elements: Vec<SolveElement>,
    pub warnings: Vec<SolveWarning>,
    /// Placements dropped by the hard inconsistency policy
    pub discarded: usize,
}

/// Partition placements into orbits under the symmetry mode's transforms,
/// allocating one decision variable per emitted element.
///
/// Orbits are discovered by BFS: the generating transforms are applied to
/// each reached placement's covered-cell set and the image looked up in a
/// canonical-key index over all placements. Consistent orbits of one
/// become singles, of two or more become groups; inconsistent orbits are
/// split (soft policy) or discarded (hard policy). A final pass drops
/// later elements whose footprint coincides with an earlier one.
pub fn group_placements(
    board: &Board,
    placements: Vec<Placement>,
    mode: SymmetryMode,
    soft_policy: bool,
    alloc: &mut VariableAllocator,
) -> Grouping {
    let transforms = generating_transforms(mode);

    // Canonical cell-set key -> indices of placements with that footprint
    let mut index: HashMap<&[usize], Vec<usize>> = HashMap::new();
    for (i, placement) in placements.iter().enumerate() {
        index.entry(&placement.cells).or_default().push(i);
    }

    let mut assigned = vec![false; placements.len()];
    let mut elements = Vec::new();
    let mut warnings = Vec::new();
    let mut discarded = 0;

    for seed in 0..placements.len() {
        if assigned[seed] {
            continue;
        }

        // BFS over the implicit symmetry graph
        let mut visited = HashSet::new();
        let mut orbit = Vec::new();
        let mut queue = VecDeque::new();
        visited.insert(seed);
        orbit.push(seed);
        queue.push_back(seed);
        while let Some(current) = queue.pop_front() {
            for &transform in transforms {
                let image = match transform_cells(board, &placements[current].cells, transform) {
                    Some(image) => image,
                    None => continue,
                };
                let Some(matches) = index.get(image.as_slice()) else {
                    continue;
                };
                for &next in matches {
                    if visited.insert(next) {
                        orbit.push(next);
                        queue.push_back(next);
                    }
                }
            }
        }

        for &i in &orbit {
            assigned[i] = true;
        }

        if orbit.len() == 1 {
            let mut placement = placements[seed].clone();
            let variable = alloc.fresh();
            placement.variable = Some(variable);
            elements.push(SolveElement::Single {
                variable,
                placement,
            });
            continue;
        }

        let members: Vec<Placement> = orbit.iter().map(|&i| placements[i].clone()).collect();
        match SymmetryGroup::try_from_members(members, alloc) {
            Ok(group) => elements.push(SolveElement::Group(group)),
            Err(members) => {
                let placement_ids: Vec<usize> = members.iter().map(|p| p.id).collect();
                if soft_policy {
                    warnings.push(SolveWarning::OrbitSplit {
                        placement_ids: placement_ids.clone(),
                    });
                    for mut placement in members {
                        let variable = alloc.fresh();
                        placement.variable = Some(variable);
                        elements.push(SolveElement::Single {
                            variable,
                            placement,
                        });
                    }
                } else {
                    discarded += members.len();
                    warnings.push(SolveWarning::OrbitDiscarded { placement_ids });
                }
            }
        }
    }

    // Degenerate orbits can collapse onto the same footprint; keep the
    // first element per footprint.
    let mut seen_footprints = HashSet::new();
    elements.retain(|element| seen_footprints.insert(element.cells().to_vec()));

    Grouping {
        elements,
        warnings,
        discarded,
    }
}
