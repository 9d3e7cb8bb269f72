//! Display and output formatting utilities

use crate::board::Board;
use crate::config::OutputFormat;
use crate::cover::Solution;
use anyhow::Result;
use std::path::Path;

/// Format solutions and boards for console output
pub struct SolutionFormatter;

impl SolutionFormatter {
    /// Format a bare board: `.` free, `#` blocked
    pub fn format_board(board: &Board) -> String {
        let mut output = String::new();
        for row in 0..board.height {
            for col in 0..board.width {
                output.push(if board.is_blocked(row, col) { '#' } else { '.' });
            }
            output.push('\n');
        }
        output
    }

    /// Render a solution onto its board: each placement gets a letter
    /// (cycling through the alphabet), blocked cells are `#`, uncovered
    /// cells are `·`
    pub fn format_solution_board(solution: &Solution, board: &Board) -> String {
        let mut cells = vec!['·'; board.width * board.height];
        for row in 0..board.height {
            for col in 0..board.width {
                if board.is_blocked(row, col) {
                    cells[board.index(row, col)] = '#';
                }
            }
        }
        for (i, placement) in solution.placements.iter().enumerate() {
            let letter = (b'a' + (i % 26) as u8) as char;
            for &cell in &placement.cells {
                cells[cell] = letter;
            }
        }

        let mut output = String::with_capacity(cells.len() + board.height);
        for row in 0..board.height {
            for col in 0..board.width {
                output.push(cells[row * board.width + col]);
            }
            output.push('\n');
        }
        output
    }

    /// Format a solution's placements as a summary table
    pub fn format_placement_table(solution: &Solution) -> String {
        let mut output = String::new();
        output.push_str("Placements:\n");
        output.push_str("  #   | Shape        | Rot | Offset  | Cells\n");
        output.push_str("  ----|--------------|-----|---------|------\n");
        for (i, placement) in solution.placements.iter().enumerate() {
            output.push_str(&format!(
                "  {:3} | {:12} | {:3} | ({:2},{:2}) | {}\n",
                i,
                placement.shape_name,
                placement.rotation,
                placement.row,
                placement.col,
                placement.cells.len()
            ));
        }
        output
    }

    /// Full text rendering of a solution
    pub fn format_solution(solution: &Solution, board: &Board) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "Coverage: {} of {} usable cells ({} placements)\n",
            solution.coverage,
            board.usable_cells(),
            solution.placements.len()
        ));
        output.push_str(&format!(
            "Solve time: {:.3}s\n\n",
            solution.solve_time.as_secs_f64()
        ));
        output.push_str(&Self::format_solution_board(solution, board));
        output.push('\n');
        output.push_str(&Self::format_placement_table(solution));
        output
    }

    /// Save a solution to the output directory in the configured format
    pub fn save_solution<P: AsRef<Path>>(
        solution: &Solution,
        board: &Board,
        output_dir: P,
        format: &OutputFormat,
    ) -> Result<()> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)?;

        match format {
            OutputFormat::Text => {
                let path = output_dir.join("solution.txt");
                std::fs::write(path, Self::format_solution(solution, board))?;
            }
            OutputFormat::Json => {
                let path = output_dir.join("solution.json");
                solution.save_to_file(path)?;
            }
        }

        Ok(())
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err()
            && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    /// Format success message
    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    /// Format error message
    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    /// Format warning message
    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    /// Format info message
    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::io::{parse_board_from_string, pattern_to_grid};
    use crate::cover::Placement;
    use std::time::Duration;

    fn sample_solution(board: &Board) -> Solution {
        let grid = pattern_to_grid(&["oo".to_string()]).unwrap();
        let placement = Placement {
            id: 0,
            shape_name: "bar".to_string(),
            rotation: 0,
            row: 0,
            col: 0,
            grid,
            cells: vec![0, 1],
            variable: None,
        };
        Solution::new(
            vec![placement],
            2,
            board.width,
            board.height,
            Duration::from_millis(10),
        )
    }

    #[test]
    fn test_board_rendering() {
        let board = parse_board_from_string(".#\n..\n").unwrap();
        assert_eq!(SolutionFormatter::format_board(&board), ".#\n..\n");
    }

    #[test]
    fn test_solution_rendering() {
        let board = parse_board_from_string("..\n.#\n").unwrap();
        let rendered = SolutionFormatter::format_solution_board(&sample_solution(&board), &board);
        assert_eq!(rendered, "aa\n·#\n");
    }

    #[test]
    fn test_placement_table_lists_all() {
        let board = parse_board_from_string("..\n..\n").unwrap();
        let table = SolutionFormatter::format_placement_table(&sample_solution(&board));
        assert!(table.contains("bar"));
        assert!(table.contains("( 0, 0)"));
    }

    #[test]
    fn test_save_solution_text() {
        let dir = tempfile::tempdir().unwrap();
        let board = parse_board_from_string("..\n..\n").unwrap();
        let solution = sample_solution(&board);

        SolutionFormatter::save_solution(&solution, &board, dir.path(), &OutputFormat::Text)
            .unwrap();
        assert!(dir.path().join("solution.txt").exists());

        SolutionFormatter::save_solution(&solution, &board, dir.path(), &OutputFormat::Json)
            .unwrap();
        let json = std::fs::read_to_string(dir.path().join("solution.json")).unwrap();
        assert!(json.contains("\"coverage\""));
    }

    #[test]
    fn test_color_output() {
        let colored = ColorOutput::colored("test", Color::Red);
        assert!(colored.contains("test"));

        let success = ColorOutput::success("OK");
        assert!(success.contains("OK"));
    }
}
