//! Command line host for the Game of Life engine

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use life_engine::{
    config::{CliOverrides, ConfigFile, WorldInit},
    engine::{Engine, Generation},
    utils::{ColorOutput, WorldFormatter},
};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(name = "life-engine")]
#[command(about = "Timed Game of Life engine")]
#[command(version = "0.1.0")]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the engine until a number of generations has been observed
    Run {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Number of rows (overrides config)
        #[arg(long)]
        rows: Option<usize>,

        /// Number of columns (overrides config)
        #[arg(long)]
        cols: Option<usize>,

        /// Wrap edges toroidally (overrides config)
        #[arg(long, conflicts_with = "no_wrap")]
        wrap: bool,

        /// Treat cells beyond the edges as dead (overrides config)
        #[arg(long)]
        no_wrap: bool,

        /// How the first generation is populated (overrides config)
        #[arg(long, value_enum)]
        init: Option<InitArg>,

        /// Seed for the random initial world (overrides config)
        #[arg(long)]
        seed: Option<u64>,

        /// Transition rule such as B3/S23 (overrides config)
        #[arg(long)]
        rule: Option<String>,

        /// Stop after this generation has been published
        #[arg(short, long, default_value_t = 10)]
        generations: u64,

        /// Cycle the speed ladder this many times before starting
        #[arg(short, long, default_value_t = 0)]
        speed_cycles: u32,

        /// Output format for the final generation
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Create a default configuration file
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InitArg {
    Random,
    Empty,
    Custom,
}

impl From<InitArg> for WorldInit {
    fn from(arg: InitArg) -> Self {
        match arg {
            InitArg::Random => WorldInit::Random,
            InitArg::Empty => WorldInit::Empty,
            InitArg::Custom => WorldInit::Custom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

struct RunOptions {
    config: PathBuf,
    overrides: CliOverrides,
    generations: u64,
    speed_cycles: u32,
    format: OutputFormat,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&cli.log_level))?;
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Run {
            config,
            rows,
            cols,
            wrap,
            no_wrap,
            init,
            seed,
            rule,
            generations,
            speed_cycles,
            format,
        } => {
            let wrap_edges = match (wrap, no_wrap) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let overrides = CliOverrides {
                rows,
                cols,
                init: init.map(WorldInit::from),
                wrap_edges,
                seed,
                rule,
            };
            run_command(RunOptions {
                config,
                overrides,
                generations,
                speed_cycles,
                format,
            })
        }
        Commands::Setup { directory, force } => setup_command(directory, force),
    }
}

fn run_command(options: RunOptions) -> Result<()> {
    let mut config = if options.config.exists() {
        ConfigFile::from_file(&options.config)
            .with_context(|| format!("Failed to load config from {}", options.config.display()))?
    } else {
        warn!(path = %options.config.display(), "config file not found, using defaults");
        ConfigFile::default()
    };
    config.merge_with_cli(&options.overrides);
    config.validate().context("Configuration validation failed")?;

    let settings = config.to_settings()?;
    let engine = Engine::with_rule(settings, config.rule()?).context("Failed to create engine")?;

    engine.settings().speed().set_observer(|multiplier| {
        info!(multiplier, "speed changed");
    });
    for _ in 0..options.speed_cycles {
        engine.settings().cycle_speed();
    }

    let last = if options.generations == 0 {
        engine.current()
    } else {
        observe_until(&engine, options.generations)?
    };

    match options.format {
        OutputFormat::Text => {
            println!("{}", ColorOutput::success(&WorldFormatter::format_summary(&last)));
            print!("{}", WorldFormatter::format_compact(&last.world));
        }
        OutputFormat::Json => println!("{}", WorldFormatter::format_json(&last)?),
    }

    Ok(())
}

/// Play the engine until generation `target` is published, then pause it
fn observe_until(engine: &Engine, target: u64) -> Result<Generation> {
    let (tx, rx) = mpsc::channel();
    let tx = Mutex::new(tx);
    engine.set_observer(move |generation: &Generation| {
        // The receiver is gone once the host has what it needs
        let _ = tx.lock().send(generation.clone());
    });

    let started = Instant::now();
    engine.toggle_play()?;

    let last = loop {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(generation) if generation.index >= target => break generation,
            Ok(_) => {}
            Err(RecvTimeoutError::Timeout) => {
                if let Some(reason) = engine.failure() {
                    bail!("Engine halted: {}", reason);
                }
            }
            Err(RecvTimeoutError::Disconnected) => bail!("Engine stopped publishing"),
        }
    };

    engine.stop();
    engine.clear_observer();
    info!(
        generations = last.index,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "run finished"
    );
    Ok(last)
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up configuration..."));

    let config_dir = directory.join("config");
    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create directory {}", config_dir.display()))?;

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        ConfigFile::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    // A small bounded world with a fixed seed, handy for trying rules
    let examples_dir = config_dir.join("examples");
    let mut small = ConfigFile::default();
    small.world.rows = 40;
    small.world.cols = 60;
    small.world.wrap_edges = false;
    small.world.seed = Some(7);
    small.to_file(examples_dir.join("small.yaml"))?;

    let mut highlife = ConfigFile::default();
    highlife.world.rows = 100;
    highlife.world.cols = 100;
    highlife.rule = "B36/S23".to_string();
    highlife.to_file(examples_dir.join("highlife.yaml"))?;

    println!("Created example configurations in: {}", examples_dir.display());
    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit {}", config_path.display());
    println!("2. Run: cargo run -- run --config {}", config_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "life-engine",
            "run",
            "--config",
            "test.yaml",
            "--rows",
            "20",
            "--no-wrap",
            "--init",
            "empty",
            "--generations",
            "5",
            "--format",
            "json",
        ]);

        match cli.unwrap().command {
            Commands::Run {
                rows,
                no_wrap,
                init,
                generations,
                format,
                ..
            } => {
                assert_eq!(rows, Some(20));
                assert!(no_wrap);
                assert_eq!(init, Some(InitArg::Empty));
                assert_eq!(generations, 5);
                assert_eq!(format, OutputFormat::Json);
            }
            Commands::Setup { .. } => panic!("expected run"),
        }
    }

    #[test]
    fn test_wrap_flags_conflict() {
        let cli = Cli::try_parse_from(["life-engine", "run", "--wrap", "--no-wrap"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_setup_command() {
        let temp_dir = tempdir().unwrap();
        let result = setup_command(temp_dir.path().to_path_buf(), false);

        assert!(result.is_ok());
        let config_path = temp_dir.path().join("config/default.yaml");
        assert_eq!(ConfigFile::from_file(&config_path).unwrap(), ConfigFile::default());
        assert!(temp_dir.path().join("config/examples/highlife.yaml").exists());
    }

    #[test]
    fn test_run_small_world() {
        let temp_dir = tempdir().unwrap();
        let options = RunOptions {
            config: temp_dir.path().join("missing.yaml"),
            overrides: CliOverrides {
                rows: Some(12),
                cols: Some(12),
                seed: Some(3),
                ..CliOverrides::default()
            },
            generations: 3,
            speed_cycles: 7,
            format: OutputFormat::Text,
        };
        assert!(run_command(options).is_ok());
    }

    #[test]
    fn test_run_rejects_custom_init() {
        let temp_dir = tempdir().unwrap();
        let options = RunOptions {
            config: temp_dir.path().join("missing.yaml"),
            overrides: CliOverrides {
                init: Some(WorldInit::Custom),
                ..CliOverrides::default()
            },
            generations: 1,
            speed_cycles: 0,
            format: OutputFormat::Text,
        };
        assert!(run_command(options).is_err());
    }
}
