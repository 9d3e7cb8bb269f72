//! Configuration management for the cover solver

pub mod settings;

pub use settings::{
    BoardConfig, CliOverrides, OracleConfig, OutputConfig, OutputFormat, Settings, ShapesConfig,
    SymmetryConfig, SymmetryMode,
};
