//! File I/O for boards and the shape catalog

use super::{Board, Shape, ShapeCell, ShapeGrid};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Load a board from a text file.
/// Format: one line per row, `.` for a free cell and `#` for a blocked cell.
pub fn load_board_from_file<P: AsRef<Path>>(path: P) -> Result<Board> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read board file: {}", path.as_ref().display()))?;

    parse_board_from_string(&content)
        .with_context(|| format!("Failed to parse board from file: {}", path.as_ref().display()))
}

/// Parse a board from its text representation
pub fn parse_board_from_string(content: &str) -> Result<Board> {
    let lines: Vec<&str> = content
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        anyhow::bail!("Board file is empty or contains no valid rows");
    }

    let height = lines.len();
    let width = lines[0].len();
    let mut board = Board::new(width, height)?;

    for (row, line) in lines.iter().enumerate() {
        if line.len() != width {
            anyhow::bail!(
                "Row {} has length {}, expected {} (all rows must have the same length)",
                row,
                line.len(),
                width
            );
        }
        for (col, ch) in line.chars().enumerate() {
            match ch {
                '.' => {}
                '#' => board.block(row, col)?,
                _ => anyhow::bail!(
                    "Invalid character '{}' at position ({}, {}). Only '.' and '#' are allowed",
                    ch,
                    row,
                    col
                ),
            }
        }
    }

    Ok(board)
}

/// Convert a board to its text representation
pub fn board_to_string(board: &Board) -> String {
    let mut result = String::with_capacity(board.height * (board.width + 1));
    for row in 0..board.height {
        for col in 0..board.width {
            result.push(if board.is_blocked(row, col) { '#' } else { '.' });
        }
        result.push('\n');
    }
    result
}

/// Save a board to a text file
pub fn save_board_to_file<P: AsRef<Path>>(board: &Board, path: P) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(&path, board_to_string(board))
        .with_context(|| format!("Failed to write board file: {}", path.as_ref().display()))?;
    Ok(())
}

/// On-disk catalog format
#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    shapes: Vec<CatalogEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CatalogEntry {
    name: String,
    pattern: Vec<String>,
}

/// Parse a shape pattern: `.` is empty, any other character is an occupied
/// cell whose character becomes the cell's kind tag.
pub fn pattern_to_grid(pattern: &[String]) -> Result<ShapeGrid> {
    let rows = pattern
        .iter()
        .map(|line| {
            line.chars()
                .map(|ch| {
                    if ch == '.' {
                        None
                    } else {
                        Some(ShapeCell {
                            kind: ch,
                            orientation: 0,
                        })
                    }
                })
                .collect()
        })
        .collect();
    ShapeGrid::from_rows(rows)
}

/// Load the shape catalog from a YAML file
pub fn load_catalog_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<Shape>> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read shape catalog: {}", path.as_ref().display()))?;

    parse_catalog_from_string(&content)
        .with_context(|| format!("Failed to parse shape catalog: {}", path.as_ref().display()))
}

/// Parse the shape catalog from YAML text
pub fn parse_catalog_from_string(content: &str) -> Result<Vec<Shape>> {
    let file: CatalogFile =
        serde_yaml::from_str(content).context("Failed to parse catalog YAML")?;

    if file.shapes.is_empty() {
        anyhow::bail!("Shape catalog contains no shapes");
    }

    let mut shapes = Vec::with_capacity(file.shapes.len());
    for entry in file.shapes {
        let grid = pattern_to_grid(&entry.pattern)
            .with_context(|| format!("Invalid pattern for shape '{}'", entry.name))?;
        shapes.push(Shape::new(entry.name, grid)?);
    }

    // Duplicate names would make placements ambiguous
    for (i, shape) in shapes.iter().enumerate() {
        if shapes[..i].iter().any(|other| other.name() == shape.name()) {
            anyhow::bail!("Duplicate shape name '{}' in catalog", shape.name());
        }
    }

    Ok(shapes)
}

/// Create example input files for the setup command
pub fn create_example_inputs<P: AsRef<Path>>(directory: P) -> Result<()> {
    let directory = directory.as_ref();
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create directory: {}", directory.display()))?;

    let board = "\
........
........
...##...
...##...
........
........
";
    std::fs::write(directory.join("board.txt"), board)?;

    let catalog = "\
shapes:
  - name: square
    pattern:
      - \"oo\"
      - \"oo\"
  - name: bar
    pattern:
      - \"iiii\"
  - name: ell
    pattern:
      - \"l.\"
      - \"l.\"
      - \"ll\"
";
    std::fs::write(directory.join("shapes.yaml"), catalog)?;

    Ok(())
}
