//! Main CLI application for the cover solver

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use polycover::{
    board::io::create_example_inputs,
    config::{CliOverrides, Settings, SymmetryMode},
    cover::{CoverProblem, SolutionValidator, SolveParameters},
    sat::{oracle::resolve_binary, SatOracle},
    utils::{ColorOutput, SolutionFormatter},
};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "polycover")]
#[command(about = "Maximum-coverage shape packing via an external SAT solver")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a cover problem
    Solve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Board layout file (overrides config)
        #[arg(short, long)]
        board: Option<PathBuf>,

        /// Shape catalog file (overrides config)
        #[arg(short, long)]
        shapes: Option<PathBuf>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// SAT solver binary (overrides config)
        #[arg(long)]
        oracle: Option<PathBuf>,

        /// Oracle timeout in seconds, 0 for none (overrides config)
        #[arg(long)]
        timeout: Option<u64>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Create example configuration and input files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Analyze a board and catalog without invoking the solver
    Analyze {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Board layout file (overrides config)
        #[arg(short, long)]
        board: Option<PathBuf>,

        /// Shape catalog file (overrides config)
        #[arg(short, long)]
        shapes: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            config,
            board,
            shapes,
            output,
            oracle,
            timeout,
            verbose,
        } => solve_command(config, board, shapes, output, oracle, timeout, verbose),
        Commands::Setup { directory, force } => setup_command(directory, force),
        Commands::Analyze {
            config,
            board,
            shapes,
        } => analyze_command(config, board, shapes),
    }
}

fn load_settings(config_path: &PathBuf, overrides: CliOverrides) -> Result<Settings> {
    let mut settings = if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        println!(
            "{}",
            ColorOutput::warning(&format!(
                "Config file {} not found, using defaults",
                config_path.display()
            ))
        );
        Settings::default()
    };
    settings.merge_with_cli(&overrides);
    Ok(settings)
}

fn solve_command(
    config_path: PathBuf,
    board_file: Option<PathBuf>,
    catalog_file: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    oracle_binary: Option<PathBuf>,
    timeout_seconds: Option<u64>,
    verbose: bool,
) -> Result<()> {
    println!("{}", ColorOutput::info("Starting cover solver"));

    let settings = load_settings(
        &config_path,
        CliOverrides {
            board_file,
            catalog_file,
            output_dir,
            oracle_binary,
            timeout_seconds,
        },
    )?;

    settings
        .validate()
        .context("Configuration validation failed")?;

    let params = SolveParameters::from_settings(&settings)?;
    let problem = CoverProblem::new(params);
    let board = problem.board().clone();

    if verbose {
        println!("Board:");
        println!("{}", SolutionFormatter::format_board(&board));
        println!("{}", problem.analyze());
    }

    let oracle = SatOracle::new(
        resolve_binary(settings.oracle.binary.clone()),
        settings.oracle.args.clone(),
        settings.oracle.timeout(),
    );

    let start_time = Instant::now();
    let outcome = problem.solve(&oracle);

    for warning in &outcome.warnings {
        println!("{}", ColorOutput::warning(&format!("Warning: {}", warning)));
    }

    if !outcome.success {
        println!("{}", ColorOutput::error(&outcome.message));
        return Ok(());
    }

    println!(
        "{}",
        ColorOutput::success(&format!(
            "{} in {:.3}s",
            outcome.message,
            start_time.elapsed().as_secs_f64()
        ))
    );

    let Some(solution) = outcome.solution else {
        anyhow::bail!("Solver reported success without a solution");
    };

    println!("\n{}", SolutionFormatter::format_solution(&solution, &board));

    // Independent re-check of the returned arrangement
    let validation = SolutionValidator::new(board.clone()).validate(&solution);
    if validation.is_valid {
        if verbose {
            println!("{}", validation);
        }
    } else {
        println!(
            "{}",
            ColorOutput::error(&format!(
                "Solution failed validation: {}",
                validation
                    .error_message
                    .unwrap_or_else(|| "Unknown error".to_string())
            ))
        );
    }

    SolutionFormatter::save_solution(
        &solution,
        &board,
        &settings.output.output_directory,
        &settings.output.format,
    )
    .context("Failed to save solution")?;

    println!(
        "{}",
        ColorOutput::success(&format!(
            "Solution saved to {}",
            settings.output.output_directory.display()
        ))
    );

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up project structure"));

    let config_dir = directory.join("config");
    let input_dir = directory.join("input");
    let output_dir = directory.join("output/solutions");

    for dir in [&config_dir, &input_dir, &output_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        let mut default_settings = Settings::default();
        default_settings.board.layout_file = input_dir.join("board.txt");
        default_settings.shapes.catalog_file = input_dir.join("shapes.yaml");
        default_settings.output.output_directory = output_dir.clone();
        default_settings
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    // A variant that exercises the symmetry machinery
    let symmetric_path = config_dir.join("symmetric.yaml");
    if !symmetric_path.exists() || force {
        let mut symmetric = Settings::default();
        symmetric.board.layout_file = input_dir.join("board.txt");
        symmetric.shapes.catalog_file = input_dir.join("shapes.yaml");
        symmetric.output.output_directory = output_dir;
        symmetric.symmetry.mode = SymmetryMode::Rotational180;
        symmetric.symmetry.soft_policy = true;
        symmetric.to_file(&symmetric_path)?;
        println!("Created: {}", symmetric_path.display());
    }

    create_example_inputs(&input_dir).context("Failed to create example inputs")?;
    println!("Created example inputs in: {}", input_dir.display());

    println!("\n{}", ColorOutput::success("Setup complete"));
    println!("\nNext steps:");
    println!("1. Edit the board and shapes in {}", input_dir.display());
    println!(
        "2. Point the oracle binary in {} at a DIMACS SAT solver",
        config_path.display()
    );
    println!("3. Run: cargo run -- solve --config config/default.yaml");

    Ok(())
}

fn analyze_command(
    config_path: PathBuf,
    board_file: Option<PathBuf>,
    catalog_file: Option<PathBuf>,
) -> Result<()> {
    println!("{}", ColorOutput::info("Analyzing problem"));

    let settings = load_settings(
        &config_path,
        CliOverrides {
            board_file,
            catalog_file,
            ..Default::default()
        },
    )?;

    let params = SolveParameters::from_settings(&settings)?;
    let problem = CoverProblem::new(params);
    let board = problem.board().clone();

    println!("Board:");
    println!("{}", SolutionFormatter::format_board(&board));

    let stats = problem.analyze();
    println!("{}", stats);

    for warning in &stats.warnings {
        println!("{}", ColorOutput::warning(&format!("Warning: {}", warning)));
    }

    Ok(())
}
