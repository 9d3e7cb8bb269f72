//! Configuration settings for the cover solver

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub board: BoardConfig,
    pub shapes: ShapesConfig,
    pub symmetry: SymmetryConfig,
    pub oracle: OracleConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    pub layout_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapesConfig {
    pub catalog_file: PathBuf,
    /// Restrict the solve to these catalog shapes; `None` enables all
    pub enabled: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymmetryConfig {
    pub mode: SymmetryMode,
    /// When a symmetry orbit is internally inconsistent (members overlap),
    /// `true` splits it into independent singletons, `false` discards it
    pub soft_policy: bool,
}

/// Which symmetry relation groups placements into single decision elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymmetryMode {
    None,
    Horizontal,
    Vertical,
    Quadrants,
    Rotational180,
    Rotational90,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// SAT solver binary; anything speaking DIMACS on stdin/stdout works
    pub binary: PathBuf,
    pub args: Vec<String>,
    /// Per-invocation timeout; 0 waits indefinitely
    pub timeout_seconds: u64,
}

impl OracleConfig {
    pub fn timeout(&self) -> Option<Duration> {
        if self.timeout_seconds == 0 {
            None
        } else {
            Some(Duration::from_secs(self.timeout_seconds))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub output_directory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board: BoardConfig {
                layout_file: PathBuf::from("input/board.txt"),
            },
            shapes: ShapesConfig {
                catalog_file: PathBuf::from("input/shapes.yaml"),
                enabled: None,
            },
            symmetry: SymmetryConfig {
                mode: SymmetryMode::None,
                soft_policy: false,
            },
            oracle: OracleConfig {
                binary: PathBuf::from("kissat"),
                args: Vec::new(),
                timeout_seconds: 300,
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                output_directory: PathBuf::from("output/solutions"),
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if !self.board.layout_file.exists() {
            anyhow::bail!(
                "Board layout file does not exist: {}",
                self.board.layout_file.display()
            );
        }

        if !self.shapes.catalog_file.exists() {
            anyhow::bail!(
                "Shape catalog file does not exist: {}",
                self.shapes.catalog_file.display()
            );
        }

        if let Some(enabled) = &self.shapes.enabled {
            if enabled.is_empty() {
                anyhow::bail!("Enabled shape list is empty; omit it to enable all shapes");
            }
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(ref board_file) = cli_overrides.board_file {
            self.board.layout_file = board_file.clone();
        }
        if let Some(ref catalog_file) = cli_overrides.catalog_file {
            self.shapes.catalog_file = catalog_file.clone();
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.output_directory = output_dir.clone();
        }
        if let Some(ref binary) = cli_overrides.oracle_binary {
            self.oracle.binary = binary.clone();
        }
        if let Some(timeout) = cli_overrides.timeout_seconds {
            self.oracle.timeout_seconds = timeout;
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub board_file: Option<PathBuf>,
    pub catalog_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub oracle_binary: Option<PathBuf>,
    pub timeout_seconds: Option<u64>,
}
